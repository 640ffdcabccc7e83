//! Drag-Over Swap Detection
//!
//! Listens for the synthetic drag lifecycle on a container and reports a
//! swap once per droppable entry, after the pointer has travelled far
//! enough into it.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_events::EventListener;
use leptos::html::ElementType;
use leptos::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, HtmlElement};

use crate::config::DragOverConfig;
use crate::events::pointer_of;
use crate::geometry::Rect;
use crate::session::DragEventKind;
use crate::swap::SwapTracker;

struct DragOverState {
    dragged: Option<HtmlElement>,
    tracker: SwapTracker<HtmlElement>,
}

type Shared = Rc<RefCell<DragOverState>>;

/// Swap detector bound to one container; dropping it unbinds
pub struct DragOverBinding {
    _listeners: Vec<EventListener>,
}

fn event_element(event: &Event) -> Option<HtmlElement> {
    event.target().and_then(|t| t.dyn_into::<HtmlElement>().ok())
}

fn listen<H>(container: &HtmlElement, kind: DragEventKind, state: &Shared, handler: H) -> EventListener
where
    H: Fn(&Shared, &Event) + 'static,
{
    let state = state.clone();
    EventListener::new(container, kind.event_type(), move |event| handler(&state, event))
}

/// Bind the swap detector. `on_swap` receives `(dragged, target)`.
pub fn bind_drag_over<F>(container: &HtmlElement, config: DragOverConfig, on_swap: F) -> DragOverBinding
where
    F: Fn(HtmlElement, HtmlElement) + 'static,
{
    let state: Shared = Rc::new(RefCell::new(DragOverState {
        dragged: None,
        tracker: SwapTracker::new(config.threshold),
    }));

    let listeners = vec![
        listen(container, DragEventKind::DragStart, &state, |state, event| {
            let mut s = state.borrow_mut();
            s.dragged = event_element(event);
            s.tracker.reset();
        }),
        listen(container, DragEventKind::DragEnter, &state, |state, event| {
            let (Some(target), Some(at)) = (event_element(event), pointer_of(event)) else { return };
            let rect = Rect::from(target.get_bounding_client_rect());
            state.borrow_mut().tracker.enter(target, at, rect);
        }),
        listen(container, DragEventKind::DragLeave, &state, |state, event| {
            if let Some(target) = event_element(event) {
                state.borrow_mut().tracker.leave(&target);
            }
        }),
        listen(container, DragEventKind::Drag, &state, move |state, event| {
            let Some(at) = pointer_of(event) else { return };
            let swap = {
                let mut s = state.borrow_mut();
                let target = s.tracker.pointer_move(at);
                target.zip(s.dragged.clone())
            };
            // Borrow released: the callback may reorder the list
            if let Some((target, dragged)) = swap {
                log::debug!("[DND] swap threshold crossed");
                on_swap(dragged, target);
            }
        }),
        listen(container, DragEventKind::Drop, &state, |state, _| {
            state.borrow_mut().tracker.reset();
        }),
        listen(container, DragEventKind::DragEnd, &state, |state, _| {
            let mut s = state.borrow_mut();
            s.tracker.reset();
            s.dragged = None;
        }),
    ];

    DragOverBinding { _listeners: listeners }
}

/// Bind the swap detector to a node ref once it mounts; unbinds on cleanup
pub fn use_drag_over<E, F>(container: NodeRef<E>, config: DragOverConfig, on_swap: F)
where
    E: ElementType,
    E::Output: JsCast + Clone + 'static,
    F: Fn(HtmlElement, HtmlElement) + Clone + 'static,
{
    let binding = StoredValue::new_local(None::<DragOverBinding>);

    Effect::new(move |_| {
        let Some(el) = container.get() else { return };
        let Some(el) = el.dyn_ref::<HtmlElement>() else { return };
        if binding.with_value(|b| b.is_some()) {
            return;
        }
        let bound = bind_drag_over(el, config, on_swap.clone());
        binding.update_value(|b| *b = Some(bound));
    });

    on_cleanup(move || binding.update_value(|b| *b = None));
}
