//! Drag Session State Machine
//!
//! Pure gesture bookkeeping: which element is dragged, which droppable is
//! under the pointer, and which synthetic events each transition emits.
//! The DOM layer in `engine` feeds pointer input in and dispatches what
//! comes out.

use thiserror::Error;

use crate::geometry::{Point, Rect};

/// Synthetic drag lifecycle event kinds
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DragEventKind {
    DragStart,
    Drag,
    DragEnter,
    DragLeave,
    Drop,
    DragEnd,
}

impl DragEventKind {
    /// DOM event type string
    pub const fn event_type(self) -> &'static str {
        match self {
            DragEventKind::DragStart => "dragstart",
            DragEventKind::Drag => "drag",
            DragEventKind::DragEnter => "dragenter",
            DragEventKind::DragLeave => "dragleave",
            DragEventKind::Drop => "drop",
            DragEventKind::DragEnd => "dragend",
        }
    }
}

/// One event to dispatch on `target`
#[derive(Clone, Debug, PartialEq)]
pub struct Emitted<E> {
    pub kind: DragEventKind,
    pub target: E,
    pub point: Point,
}

/// Reasons a pointer-down does not start a gesture
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DragError {
    #[error("a drag session is already active")]
    SessionActive,
    #[error("pointer-down did not land on a drag trigger inside a draggable")]
    NoTrigger,
    #[error("drag trigger must have `touch-action: none`, found `{0}`")]
    TouchActionNotNone(String),
    #[error("draggable is still animating")]
    StillAnimating,
}

/// State of one active gesture
#[derive(Clone, Debug)]
pub struct DragSession<E> {
    pub dragged: E,
    pub drop_target: Option<E>,
    /// Pointer position relative to the draggable's top-left at grab time
    pub grab_offset: Point,
    pub last_pointer: Point,
    /// Pointer position when the current drop target was entered
    pub entered_at: Option<Point>,
}

impl<E> DragSession<E> {
    fn new(dragged: E, pointer: Point, rect: Rect) -> Self {
        Self {
            dragged,
            drop_target: None,
            grab_offset: pointer.offset_from(rect.origin()),
            last_pointer: pointer,
            entered_at: None,
        }
    }

    /// Where the moving element's top-left belongs for the last pointer position
    pub fn element_origin(&self) -> Point {
        self.last_pointer.offset_from(self.grab_offset)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragPhase {
    Idle,
    Dragging,
    Hovering,
}

/// A finished gesture: the session it closed and its final events
#[derive(Debug)]
pub struct Released<E> {
    pub session: DragSession<E>,
    pub events: Vec<Emitted<E>>,
}

/// Owns at most one `DragSession`; each gesture gets a fresh one
#[derive(Debug)]
pub struct DragMachine<E> {
    session: Option<DragSession<E>>,
}

impl<E> Default for DragMachine<E> {
    fn default() -> Self {
        Self { session: None }
    }
}

impl<E: Clone + PartialEq> DragMachine<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> DragPhase {
        match &self.session {
            None => DragPhase::Idle,
            Some(s) if s.drop_target.is_some() => DragPhase::Hovering,
            Some(_) => DragPhase::Dragging,
        }
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&DragSession<E>> {
        self.session.as_ref()
    }

    /// Idle -> Dragging
    pub fn start(&mut self, dragged: E, pointer: Point, rect: Rect) -> Result<Vec<Emitted<E>>, DragError> {
        if self.session.is_some() {
            return Err(DragError::SessionActive);
        }
        let event = Emitted { kind: DragEventKind::DragStart, target: dragged.clone(), point: pointer };
        self.session = Some(DragSession::new(dragged, pointer, rect));
        Ok(vec![event])
    }

    /// Track the pointer; emits `drag` on the dragged element
    pub fn pointer_move(&mut self, pointer: Point) -> Vec<Emitted<E>> {
        match self.session.as_mut() {
            Some(session) => {
                session.last_pointer = pointer;
                vec![Emitted { kind: DragEventKind::Drag, target: session.dragged.clone(), point: pointer }]
            }
            None => Vec::new(),
        }
    }

    /// Apply the result of a hit test. Edge-triggered: hovering the same
    /// droppable again emits nothing.
    pub fn hover(&mut self, topmost: Option<E>) -> Vec<Emitted<E>> {
        let Some(session) = self.session.as_mut() else {
            return Vec::new();
        };
        if session.drop_target == topmost {
            return Vec::new();
        }

        let point = session.last_pointer;
        let mut events = Vec::new();
        if let Some(previous) = session.drop_target.take() {
            events.push(Emitted { kind: DragEventKind::DragLeave, target: previous, point });
        }
        if let Some(next) = topmost {
            events.push(Emitted { kind: DragEventKind::DragEnter, target: next.clone(), point });
            session.drop_target = Some(next);
            session.entered_at = Some(point);
        } else {
            session.entered_at = None;
        }
        events
    }

    /// Pointer released: `drop` on the current target (if any), then `dragend`
    pub fn release(&mut self, pointer: Point) -> Option<Released<E>> {
        let mut session = self.session.take()?;
        session.last_pointer = pointer;

        let mut events = Vec::new();
        if let Some(target) = &session.drop_target {
            events.push(Emitted { kind: DragEventKind::Drop, target: target.clone(), point: pointer });
        }
        events.push(Emitted { kind: DragEventKind::DragEnd, target: session.dragged.clone(), point: pointer });
        Some(Released { session, events })
    }

    /// Gesture aborted (pointercancel): leave the current target, no drop
    pub fn cancel(&mut self, pointer: Point) -> Option<Released<E>> {
        let mut session = self.session.take()?;
        session.last_pointer = pointer;

        let mut events = Vec::new();
        if let Some(target) = session.drop_target.take() {
            events.push(Emitted { kind: DragEventKind::DragLeave, target, point: pointer });
        }
        events.push(Emitted { kind: DragEventKind::DragEnd, target: session.dragged.clone(), point: pointer });
        Some(Released { session, events })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(events: &[Emitted<&'static str>]) -> Vec<(DragEventKind, &'static str)> {
        events.iter().map(|e| (e.kind, e.target)).collect()
    }

    fn started() -> (DragMachine<&'static str>, Vec<Emitted<&'static str>>) {
        let mut machine = DragMachine::new();
        let events = machine
            .start("card-a", Point::new(120.0, 80.0), Rect::new(100.0, 50.0, 200.0, 150.0))
            .unwrap();
        (machine, events)
    }

    #[test]
    fn test_start_records_grab_offset() {
        let (machine, events) = started();
        assert_eq!(kinds(&events), vec![(DragEventKind::DragStart, "card-a")]);
        assert_eq!(machine.phase(), DragPhase::Dragging);

        let session = machine.session().unwrap();
        assert_eq!(session.grab_offset, Point::new(20.0, 30.0));
        assert_eq!(session.element_origin(), Point::new(100.0, 50.0));
    }

    #[test]
    fn test_second_start_is_refused() {
        let (mut machine, _) = started();
        let err = machine.start("card-b", Point::default(), Rect::default()).unwrap_err();
        assert_eq!(err, DragError::SessionActive);
        assert_eq!(machine.session().unwrap().dragged, "card-a");
    }

    #[test]
    fn test_exactly_one_start_and_end() {
        let (mut machine, mut all) = started();
        for i in 0..25 {
            all.extend(machine.pointer_move(Point::new(120.0 + i as f64, 80.0)));
        }
        all.extend(machine.release(Point::new(150.0, 80.0)).unwrap().events);

        let starts = all.iter().filter(|e| e.kind == DragEventKind::DragStart).count();
        let ends = all.iter().filter(|e| e.kind == DragEventKind::DragEnd).count();
        let drags = all.iter().filter(|e| e.kind == DragEventKind::Drag).count();
        assert_eq!((starts, ends, drags), (1, 1, 25));
        assert_eq!(all.first().unwrap().kind, DragEventKind::DragStart);
        assert_eq!(all.last().unwrap().kind, DragEventKind::DragEnd);
        assert_eq!(machine.phase(), DragPhase::Idle);
    }

    #[test]
    fn test_move_updates_element_origin() {
        let (mut machine, _) = started();
        machine.pointer_move(Point::new(300.0, 400.0));
        assert_eq!(machine.session().unwrap().element_origin(), Point::new(280.0, 370.0));
    }

    #[test]
    fn test_dragenter_is_edge_triggered() {
        let (mut machine, _) = started();
        machine.pointer_move(Point::new(400.0, 90.0));

        let first = machine.hover(Some("card-b"));
        assert_eq!(kinds(&first), vec![(DragEventKind::DragEnter, "card-b")]);
        assert_eq!(machine.phase(), DragPhase::Hovering);
        assert_eq!(machine.session().unwrap().entered_at, Some(Point::new(400.0, 90.0)));

        for _ in 0..10 {
            machine.pointer_move(Point::new(410.0, 95.0));
            assert!(machine.hover(Some("card-b")).is_empty());
        }
        // Entry point stays where the pointer first crossed in
        assert_eq!(machine.session().unwrap().entered_at, Some(Point::new(400.0, 90.0)));
    }

    #[test]
    fn test_switching_targets_leaves_then_enters() {
        let (mut machine, _) = started();
        machine.hover(Some("card-b"));

        let events = machine.hover(Some("card-c"));
        assert_eq!(
            kinds(&events),
            vec![(DragEventKind::DragLeave, "card-b"), (DragEventKind::DragEnter, "card-c")]
        );

        let events = machine.hover(None);
        assert_eq!(kinds(&events), vec![(DragEventKind::DragLeave, "card-c")]);
        assert_eq!(machine.phase(), DragPhase::Dragging);
        assert_eq!(machine.session().unwrap().entered_at, None);
    }

    #[test]
    fn test_release_drops_on_target_before_dragend() {
        let (mut machine, _) = started();
        machine.hover(Some("card-b"));

        let released = machine.release(Point::new(10.0, 10.0)).unwrap();
        assert_eq!(
            kinds(&released.events),
            vec![(DragEventKind::Drop, "card-b"), (DragEventKind::DragEnd, "card-a")]
        );
        assert_eq!(released.session.drop_target, Some("card-b"));
        assert!(machine.release(Point::default()).is_none());
    }

    #[test]
    fn test_release_without_target_only_ends() {
        let (mut machine, _) = started();
        let released = machine.release(Point::new(10.0, 10.0)).unwrap();
        assert_eq!(kinds(&released.events), vec![(DragEventKind::DragEnd, "card-a")]);
    }

    #[test]
    fn test_cancel_leaves_without_drop() {
        let (mut machine, _) = started();
        machine.hover(Some("card-b"));
        let released = machine.cancel(Point::new(10.0, 10.0)).unwrap();
        assert_eq!(
            kinds(&released.events),
            vec![(DragEventKind::DragLeave, "card-b"), (DragEventKind::DragEnd, "card-a")]
        );
    }

    #[test]
    fn test_new_gesture_gets_fresh_session() {
        let (mut machine, _) = started();
        machine.hover(Some("card-b"));
        machine.release(Point::default());

        machine.start("card-c", Point::new(5.0, 5.0), Rect::new(0.0, 0.0, 10.0, 10.0)).unwrap();
        let session = machine.session().unwrap();
        assert_eq!(session.dragged, "card-c");
        assert_eq!(session.drop_target, None);
        assert_eq!(session.entered_at, None);
    }

    #[test]
    fn test_idle_machine_ignores_input() {
        let mut machine: DragMachine<&str> = DragMachine::new();
        assert!(machine.pointer_move(Point::new(1.0, 1.0)).is_empty());
        assert!(machine.hover(Some("x")).is_empty());
        assert!(machine.release(Point::default()).is_none());
        assert!(machine.cancel(Point::default()).is_none());
    }
}
