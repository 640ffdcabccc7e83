//! Child Reconciliation
//!
//! Pure planning for animated list updates. Given the previously rendered
//! children, their measured rects and the next children, work out who moved,
//! who changed visibility, who enters and who exits. The component layer
//! measures the DOM and plays the result.

use std::collections::HashSet;

use leptos_dragdrop::Rect;
use thiserror::Error;

/// A child the reconciler can track across updates
pub trait Reconcilable {
    /// Explicit list key
    fn key(&self) -> Option<&str>;

    /// Stable DOM id of the rendered element
    fn element_id(&self) -> Option<&str> {
        None
    }

    fn same_identity(&self, other: &Self) -> bool;

    /// Soft visibility flag; hidden children stay mounted
    fn displayed(&self) -> bool {
        true
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReconcileError {
    #[error("child at index {index} has no key")]
    MissingKey { index: usize },
    #[error("duplicate key `{key}`")]
    DuplicateKey { key: String },
}

/// Every child must carry a key, and keys must be unique
pub fn check_keys<T: Reconcilable>(children: &[T]) -> Result<(), ReconcileError> {
    let mut seen = HashSet::new();
    for (index, child) in children.iter().enumerate() {
        let key = child.key().ok_or(ReconcileError::MissingKey { index })?;
        if !seen.insert(key) {
            return Err(ReconcileError::DuplicateKey { key: key.to_string() });
        }
    }
    Ok(())
}

/// The only element of `previous` satisfying `matches`
fn unique<T>(previous: &[T], matches: impl Fn(&T) -> bool) -> Option<usize> {
    let mut found = previous.iter().enumerate().filter(|&(_, p)| matches(p)).map(|(i, _)| i);
    match (found.next(), found.next()) {
        (Some(i), None) => Some(i),
        _ => None,
    }
}

/// Index of `child` in `previous`: by key, then DOM id, then identity.
/// A level with no candidate or several candidates falls through to the next.
pub fn find_previous<T: Reconcilable>(previous: &[T], child: &T) -> Option<usize> {
    let levels: [Box<dyn Fn(&T) -> bool + '_>; 3] = [
        Box::new(|p: &T| child.key().is_some_and(|k| p.key() == Some(k))),
        Box::new(|p: &T| child.element_id().is_some_and(|id| p.element_id() == Some(id))),
        Box::new(|p: &T| p.same_identity(child)),
    ];
    levels.into_iter().find_map(|matches| unique(previous, matches))
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Move {
    /// Index in the next list
    pub index: usize,
    pub from_index: usize,
    pub from: Rect,
    /// Predicted destination; unknown when the list grew past every
    /// measured slot
    pub to: Option<Rect>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fade {
    In,
    Out,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VisibilityChange {
    pub index: usize,
    pub fade: Fade,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Plan {
    /// Previous index for each next child
    pub matches: Vec<Option<usize>>,
    pub moves: Vec<Move>,
    pub visibility: Vec<VisibilityChange>,
    /// Next indices with no previous counterpart
    pub entering: Vec<usize>,
    /// Previous indices nobody matched
    pub exiting: Vec<usize>,
}

/// Last known rect of each list slot
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PositionCache {
    slots: Vec<Option<Rect>>,
}

impl PositionCache {
    /// Remember measured slots; slots past the current list keep their rect
    pub fn record(&mut self, rects: &[Option<Rect>]) {
        if self.slots.len() < rects.len() {
            self.slots.resize(rects.len(), None);
        }
        for (slot, rect) in self.slots.iter_mut().zip(rects) {
            if rect.is_some() {
                *slot = *rect;
            }
        }
    }

    pub fn get(&self, index: usize) -> Option<Rect> {
        self.slots.get(index).copied().flatten()
    }
}

/// Plan the transition from `previous` (measured at `previous_rects`) to `next`
pub fn plan<T: Reconcilable>(
    previous: &[T],
    previous_rects: &[Option<Rect>],
    next: &[T],
    cache: &PositionCache,
) -> Result<Plan, ReconcileError> {
    check_keys(previous)?;
    check_keys(next)?;

    let matches: Vec<Option<usize>> = next.iter().map(|child| find_previous(previous, child)).collect();
    let mut plan = Plan::default();

    for (index, (child, matched)) in next.iter().zip(&matches).enumerate() {
        let Some(from_index) = *matched else {
            plan.entering.push(index);
            continue;
        };

        if from_index != index {
            let from = previous_rects.get(from_index).copied().flatten();
            let to = previous_rects.get(index).copied().flatten().or_else(|| cache.get(index));
            if let Some(from) = from {
                if to != Some(from) {
                    plan.moves.push(Move { index, from_index, from, to });
                }
            }
        }

        match (previous[from_index].displayed(), child.displayed()) {
            (true, false) => plan.visibility.push(VisibilityChange { index, fade: Fade::Out }),
            (false, true) => plan.visibility.push(VisibilityChange { index, fade: Fade::In }),
            _ => {}
        }
    }

    let matched: HashSet<usize> = matches.iter().flatten().copied().collect();
    plan.exiting = (0..previous.len()).filter(|i| !matched.contains(i)).collect();
    plan.matches = matches;
    Ok(plan)
}

/// Visibility of a mounted child
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Visibility {
    #[default]
    Visible,
    FadingOut,
    Hidden,
    FadingIn,
}

impl Visibility {
    pub fn initial(displayed: bool) -> Self {
        if displayed {
            Self::Visible
        } else {
            Self::Hidden
        }
    }

    pub fn hide(self) -> Self {
        match self {
            Self::Visible | Self::FadingIn => Self::FadingOut,
            other => other,
        }
    }

    pub fn show(self) -> Self {
        match self {
            Self::Hidden | Self::FadingOut => Self::FadingIn,
            other => other,
        }
    }

    /// Called when the running fade completes
    pub fn settle(self) -> Self {
        match self {
            Self::FadingOut => Self::Hidden,
            Self::FadingIn => Self::Visible,
            other => other,
        }
    }

    pub fn toward(self, displayed: bool) -> Self {
        if displayed {
            self.show()
        } else {
            self.hide()
        }
    }

    /// Focusable and clickable
    pub fn is_interactive(self) -> bool {
        matches!(self, Self::Visible | Self::FadingIn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Child {
        key: Option<&'static str>,
        id: Option<&'static str>,
        value: u32,
        shown: bool,
    }

    impl Reconcilable for Child {
        fn key(&self) -> Option<&str> {
            self.key
        }
        fn element_id(&self) -> Option<&str> {
            self.id
        }
        fn same_identity(&self, other: &Self) -> bool {
            self.value == other.value
        }
        fn displayed(&self) -> bool {
            self.shown
        }
    }

    fn keyed(key: &'static str) -> Child {
        Child { key: Some(key), id: None, value: 0, shown: true }
    }

    fn bare(value: u32) -> Child {
        Child { key: None, id: None, value, shown: true }
    }

    fn slot(i: usize) -> Option<Rect> {
        Some(Rect::new(i as f64 * 100.0, 0.0, 90.0, 90.0))
    }

    #[test]
    fn test_rotation_moves_every_child() {
        let prev = [keyed("A"), keyed("B"), keyed("C")];
        let next = [keyed("C"), keyed("A"), keyed("B")];
        let rects = [slot(0), slot(1), slot(2)];

        let plan = plan(&prev, &rects, &next, &PositionCache::default()).unwrap();
        assert_eq!(plan.matches, [Some(2), Some(0), Some(1)]);
        assert_eq!(plan.moves.len(), 3);
        assert_eq!(plan.moves[0], Move { index: 0, from_index: 2, from: Rect::new(200.0, 0.0, 90.0, 90.0), to: slot(0) });
        assert!(plan.entering.is_empty());
        assert!(plan.exiting.is_empty());
    }

    #[test]
    fn test_unchanged_list_plans_nothing() {
        let prev = [keyed("A"), keyed("B")];
        let plan = plan(&prev, &[slot(0), slot(1)], &prev, &PositionCache::default()).unwrap();
        assert!(plan.moves.is_empty());
        assert!(plan.visibility.is_empty());
    }

    #[test]
    fn test_enter_and_exit() {
        let prev = [keyed("A"), keyed("B")];
        let next = [keyed("B"), keyed("C")];
        let plan = plan(&prev, &[slot(0), slot(1)], &next, &PositionCache::default()).unwrap();
        assert_eq!(plan.entering, [1]);
        assert_eq!(plan.exiting, [0]);
        assert_eq!(plan.moves.len(), 1);
        assert_eq!(plan.moves[0].from_index, 1);
    }

    #[test]
    fn test_growing_list_uses_cached_slot() {
        let mut cache = PositionCache::default();
        cache.record(&[slot(0), slot(1), slot(2)]);

        // list shrank to one, then the missing child comes back at index 2
        let prev = [keyed("A"), keyed("B")];
        let next = [keyed("C"), keyed("B"), keyed("A")];
        let plan = plan(&prev, &[slot(0), slot(1)], &next, &cache).unwrap();
        let a = plan.moves.iter().find(|m| m.index == 2).unwrap();
        assert_eq!(a.to, slot(2));
        assert_eq!(plan.entering, [0]);
    }

    #[test]
    fn test_move_without_measurement_is_skipped() {
        let prev = [keyed("A"), keyed("B")];
        let next = [keyed("B"), keyed("A")];
        let plan = plan(&prev, &[None, slot(1)], &next, &PositionCache::default()).unwrap();
        assert_eq!(plan.moves.len(), 1);
        assert_eq!(plan.moves[0].from_index, 1);
    }

    #[test]
    fn test_coinciding_rects_do_not_move() {
        let prev = [keyed("A"), keyed("B")];
        let next = [keyed("B"), keyed("A")];
        // both wrap onto the same spot, e.g. zero-size hidden cards
        let plan = plan(&prev, &[slot(0), slot(0)], &next, &PositionCache::default()).unwrap();
        assert!(plan.moves.is_empty());
    }

    #[test]
    fn test_visibility_changes() {
        let prev = [keyed("A"), Child { shown: false, ..keyed("B") }];
        let next = [Child { shown: false, ..keyed("A") }, keyed("B")];
        let plan = plan(&prev, &[slot(0), slot(1)], &next, &PositionCache::default()).unwrap();
        assert_eq!(
            plan.visibility,
            [VisibilityChange { index: 0, fade: Fade::Out }, VisibilityChange { index: 1, fade: Fade::In }]
        );
    }

    #[test]
    fn test_key_problems_are_reported() {
        assert_eq!(check_keys(&[keyed("A"), bare(1)]), Err(ReconcileError::MissingKey { index: 1 }));
        assert_eq!(
            check_keys(&[keyed("A"), keyed("A")]),
            Err(ReconcileError::DuplicateKey { key: "A".to_string() })
        );
        assert!(plan(&[keyed("A")], &[slot(0)], &[keyed("A"), keyed("A")], &PositionCache::default()).is_err());
    }

    #[test]
    fn test_match_priority() {
        let prev = [
            Child { key: None, id: Some("x"), value: 1, shown: true },
            Child { key: None, id: None, value: 2, shown: true },
        ];
        // id beats identity
        let child = Child { key: None, id: Some("x"), value: 2, shown: true };
        assert_eq!(find_previous(&prev, &child), Some(0));
        // no id candidate: falls through to identity
        assert_eq!(find_previous(&prev, &bare(2)), Some(1));
        assert_eq!(find_previous(&prev, &bare(3)), None);
    }

    #[test]
    fn test_ambiguous_level_falls_through() {
        let prev = [
            Child { key: None, id: Some("dup"), value: 1, shown: true },
            Child { key: None, id: Some("dup"), value: 2, shown: true },
        ];
        // two id candidates: identity decides
        let child = Child { key: None, id: Some("dup"), value: 2, shown: true };
        assert_eq!(find_previous(&prev, &child), Some(1));
        // ambiguous on every level
        assert_eq!(find_previous(&[bare(5), bare(5)], &bare(5)), None);
    }

    #[test]
    fn test_cache_keeps_slots_past_current_length() {
        let mut cache = PositionCache::default();
        cache.record(&[slot(0), slot(1), slot(2)]);
        cache.record(&[slot(5), None]);
        assert_eq!(cache.get(0), slot(5));
        assert_eq!(cache.get(1), slot(1));
        assert_eq!(cache.get(2), slot(2));
        assert_eq!(cache.get(3), None);
    }

    #[test]
    fn test_visibility_round_trip() {
        let hidden = Visibility::Visible.hide().settle();
        assert_eq!(hidden, Visibility::Hidden);
        assert!(!hidden.is_interactive());
        let back = hidden.show().settle();
        assert_eq!(back, Visibility::Visible);
    }

    #[test]
    fn test_visibility_reversal_mid_fade() {
        assert_eq!(Visibility::FadingOut.show(), Visibility::FadingIn);
        assert_eq!(Visibility::FadingIn.hide(), Visibility::FadingOut);
        assert_eq!(Visibility::Visible.show(), Visibility::Visible);
        assert_eq!(Visibility::Hidden.hide(), Visibility::Hidden);
        assert_eq!(Visibility::initial(false).toward(true), Visibility::FadingIn);
        assert!(Visibility::FadingIn.is_interactive());
    }
}
