//! Pointer Drag Engine
//!
//! Turns press-and-move pointer gestures inside a container into the
//! synthetic drag lifecycle (`dragstart`, `drag`, `dragenter`, `dragleave`,
//! `drop`, `dragend`).
//!
//! Gesture bookkeeping lives in [`DragMachine`]; this module owns the DOM
//! side: lifting the draggable (or its drag image), following the pointer,
//! hit-testing droppables one frame after each move, and putting everything
//! back on release.
//!
//! A gesture cannot start on a draggable that is still animating, and a
//! droppable that is mid-animation is skipped by hit testing until it
//! settles, so a card gliding under the pointer never triggers a swap.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_events::{EventListener, EventListenerOptions};
use gloo_render::{request_animation_frame, AnimationFrame};
use leptos::html::ElementType;
use leptos::prelude::*;
use serde::Serialize;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement, PointerEvent};

use crate::animation;
use crate::config::DragConfig;
use crate::events::dispatch_all;
use crate::geometry::{Point, Rect};
use crate::hit::{self, Candidate};
use crate::session::{DragError, DragMachine, Released};

/// Marks a container that already has an engine bound
const BOUND_ATTR: &str = "data-drag-bound";
const PLACEHOLDER_CLASS: &str = "drag-placeholder";
const SETTLE_MS: f64 = 180.0;

/// DOM resources held for one gesture, released together
struct Gesture {
    dragged: HtmlElement,
    /// Element following the pointer: the drag image, or the draggable itself
    moving: HtmlElement,
    drag_image: Option<HtmlElement>,
    placeholder: Option<Element>,
    /// Inline `style` of the draggable before it was lifted
    saved_style: Option<String>,
    listeners: Vec<EventListener>,
    pending_frame: Option<AnimationFrame>,
}

struct EngineState {
    machine: DragMachine<HtmlElement>,
    gesture: Option<Gesture>,
}

type Shared = Rc<RefCell<EngineState>>;

/// Engine bound to one container; dropping it unbinds every listener
pub struct DragBinding {
    container: HtmlElement,
    state: Shared,
    _pointerdown: EventListener,
}

impl Drop for DragBinding {
    fn drop(&mut self) {
        let _ = self.container.remove_attribute(BOUND_ATTR);
        if let Ok(mut state) = self.state.try_borrow_mut() {
            if let Some(gesture) = state.gesture.take() {
                restore(&gesture);
                if let Some(image) = &gesture.drag_image {
                    image.remove();
                }
            }
            state.machine = DragMachine::new();
        }
    }
}

/// Bind the engine to `container`. Returns `None` when an engine is
/// already bound there.
pub fn bind(container: &HtmlElement, config: DragConfig) -> Option<DragBinding> {
    if container.has_attribute(BOUND_ATTR) {
        log::debug!("[DND] container already bound, skipping");
        return None;
    }
    let _ = container.set_attribute(BOUND_ATTR, "");

    let state: Shared = Rc::new(RefCell::new(EngineState { machine: DragMachine::new(), gesture: None }));
    let config = Rc::new(config);

    let pointerdown = {
        let target = container.clone();
        let container = container.clone();
        let state = state.clone();
        EventListener::new_with_options(
            &target,
            "pointerdown",
            EventListenerOptions::enable_prevent_default(),
            move |event| {
                let Some(ev) = event.dyn_ref::<PointerEvent>() else { return };
                match try_start(&container, &config, &state, ev) {
                    Ok(()) => {}
                    Err(DragError::NoTrigger) => {}
                    Err(err) => log::debug!("[DND] drag not started: {}", err),
                }
            },
        )
    };

    Some(DragBinding { container: container.clone(), state, _pointerdown: pointerdown })
}

/// Bind the engine to a node ref once it mounts; unbinds on cleanup
pub fn use_draggable<E>(container: NodeRef<E>, config: DragConfig)
where
    E: ElementType,
    E::Output: JsCast + Clone + 'static,
{
    let binding = StoredValue::new_local(None::<DragBinding>);

    Effect::new(move |_| {
        let Some(el) = container.get() else { return };
        let Some(el) = el.dyn_ref::<HtmlElement>() else { return };
        if binding.with_value(|b| b.is_some()) {
            return;
        }
        let bound = bind(el, config.clone());
        binding.update_value(|b| *b = bound);
    });

    on_cleanup(move || binding.update_value(|b| *b = None));
}

fn pointer(ev: &PointerEvent) -> Point {
    Point::new(ev.client_x() as f64, ev.client_y() as f64)
}

fn computed_property(el: &Element, name: &str) -> String {
    web_sys::window()
        .and_then(|w| w.get_computed_style(el).ok().flatten())
        .and_then(|style| style.get_property_value(name).ok())
        .unwrap_or_default()
}

/// Resolve the draggable a pointer-down should lift
fn find_draggable(container: &HtmlElement, config: &DragConfig, ev: &PointerEvent) -> Result<HtmlElement, DragError> {
    let target = ev
        .target()
        .and_then(|t| t.dyn_into::<Element>().ok())
        .ok_or(DragError::NoTrigger)?;
    let trigger = target
        .closest(&config.drag_trigger)
        .ok()
        .flatten()
        .ok_or(DragError::NoTrigger)?;
    let draggable = trigger
        .closest(&config.draggable)
        .ok()
        .flatten()
        .filter(|d| container.contains(Some(d.unchecked_ref())))
        .ok_or(DragError::NoTrigger)?;

    let touch_action = computed_property(&trigger, "touch-action");
    if touch_action.trim() != "none" {
        return Err(DragError::TouchActionNotNone(touch_action));
    }
    draggable.dyn_into::<HtmlElement>().map_err(|_| DragError::NoTrigger)
}

fn try_start(container: &HtmlElement, config: &Rc<DragConfig>, state: &Shared, ev: &PointerEvent) -> Result<(), DragError> {
    if ev.button() != 0 || !ev.is_primary() {
        return Err(DragError::NoTrigger);
    }
    if state.borrow().machine.is_active() {
        return Err(DragError::SessionActive);
    }
    let dragged = find_draggable(container, config, ev)?;
    if animation::is_animating(&dragged) {
        return Err(DragError::StillAnimating);
    }

    let at = pointer(ev);
    let rect = Rect::from(dragged.get_bounding_client_rect());
    let events = state.borrow_mut().machine.start(dragged.clone(), at, rect)?;
    ev.prevent_default();

    let mut gesture = lift(&dragged, rect, config);
    gesture.listeners = gesture_listeners(config, state);
    state.borrow_mut().gesture = Some(gesture);

    log::debug!("[DND] dragstart at ({}, {})", at.x, at.y);
    dispatch_all(&events);
    Ok(())
}

/// Pin an element at `rect` in fixed positioning
fn pin(el: &HtmlElement, rect: Rect) {
    let style = el.style();
    let _ = style.set_property("position", "fixed");
    let _ = style.set_property("left", &format!("{}px", rect.x));
    let _ = style.set_property("top", &format!("{}px", rect.y));
    let _ = style.set_property("width", &format!("{}px", rect.width));
    let _ = style.set_property("height", &format!("{}px", rect.height));
    let _ = style.set_property("margin", "0");
    let _ = style.set_property("box-sizing", "border-box");
    let _ = style.set_property("pointer-events", "none");
    let _ = style.set_property("z-index", "1000");
}

fn place(el: &HtmlElement, origin: Point) {
    let style = el.style();
    let _ = style.set_property("left", &format!("{}px", origin.x));
    let _ = style.set_property("top", &format!("{}px", origin.y));
}

fn lift(dragged: &HtmlElement, rect: Rect, config: &DragConfig) -> Gesture {
    let document = web_sys::window().and_then(|w| w.document());

    if let Some(image) = config.make_drag_image.as_ref().and_then(|make| make(dragged)) {
        let _ = dragged.class_list().add_1(&config.dragged_class);
        pin(&image, rect);
        if let Some(body) = document.as_ref().and_then(|d| d.body()) {
            let _ = body.append_child(&image);
        }
        return Gesture {
            dragged: dragged.clone(),
            moving: image.clone(),
            drag_image: Some(image),
            placeholder: None,
            saved_style: None,
            listeners: Vec::new(),
            pending_frame: None,
        };
    }

    let saved_style = dragged.get_attribute("style");
    let placeholder = document.and_then(|d| d.create_element("div").ok()).map(|p| {
        let _ = p.set_attribute("class", PLACEHOLDER_CLASS);
        let _ = p.set_attribute("style", &format!("width: {}px; height: {}px;", rect.width, rect.height));
        if let Some(parent) = dragged.parent_node() {
            let _ = parent.insert_before(&p, Some(dragged.unchecked_ref()));
        }
        p
    });
    let _ = dragged.class_list().add_1(&config.dragged_class);
    pin(dragged, rect);

    Gesture {
        dragged: dragged.clone(),
        moving: dragged.clone(),
        drag_image: None,
        placeholder,
        saved_style,
        listeners: Vec::new(),
        pending_frame: None,
    }
}

/// Put the draggable back where it was lifted from
fn restore(gesture: &Gesture) {
    if gesture.drag_image.is_some() {
        return;
    }
    match &gesture.saved_style {
        Some(style) => {
            let _ = gesture.dragged.set_attribute("style", style);
        }
        None => {
            let _ = gesture.dragged.remove_attribute("style");
        }
    }
    if let Some(placeholder) = &gesture.placeholder {
        placeholder.remove();
    }
}

/// Listeners that only live for one gesture
fn gesture_listeners(config: &Rc<DragConfig>, state: &Shared) -> Vec<EventListener> {
    let Some(window) = web_sys::window() else {
        return Vec::new();
    };

    let on_move = {
        let config = config.clone();
        let state = state.clone();
        EventListener::new(&window, "pointermove", move |event| {
            if let Some(ev) = event.dyn_ref::<PointerEvent>() {
                on_pointer_move(&config, &state, pointer(ev));
            }
        })
    };
    let on_up = {
        let config = config.clone();
        let state = state.clone();
        EventListener::new(&window, "pointerup", move |event| {
            if let Some(ev) = event.dyn_ref::<PointerEvent>() {
                finish(&config, &state, pointer(ev), false);
            }
        })
    };
    let on_cancel = {
        let config = config.clone();
        let state = state.clone();
        EventListener::new(&window, "pointercancel", move |event| {
            if let Some(ev) = event.dyn_ref::<PointerEvent>() {
                finish(&config, &state, pointer(ev), true);
            }
        })
    };
    vec![on_move, on_up, on_cancel]
}

fn on_pointer_move(config: &Rc<DragConfig>, state: &Shared, at: Point) {
    let (events, moving, origin) = {
        let mut s = state.borrow_mut();
        let events = s.machine.pointer_move(at);
        let origin = s.machine.session().map(|session| session.element_origin());
        let moving = s.gesture.as_ref().map(|g| g.moving.clone());
        (events, moving, origin)
    };
    if events.is_empty() {
        return;
    }
    if let (Some(moving), Some(origin)) = (moving, origin) {
        place(&moving, origin);
    }
    dispatch_all(&events);

    // Hit-test after layout has caught up with the move
    let frame = {
        let config = config.clone();
        let state = state.clone();
        request_animation_frame(move |_| hover_pass(&config, &state))
    };
    if let Some(gesture) = state.borrow_mut().gesture.as_mut() {
        gesture.pending_frame = Some(frame);
    }
}

fn is_inert(el: &Element) -> bool {
    el.closest("[inert]").ok().flatten().is_some()
        || el.matches(":disabled").unwrap_or(false)
        || el.get_attribute("aria-disabled").as_deref() == Some("true")
}

/// Measure every droppable outside the dragged element (and its image)
fn collect_droppables(selector: &str, dragged: &HtmlElement, image: Option<&HtmlElement>) -> Vec<Candidate<HtmlElement>> {
    let Some(list) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.query_selector_all(selector).ok())
    else {
        return Vec::new();
    };

    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
        .filter(|el| {
            let node = Some(el.unchecked_ref());
            !dragged.contains(node) && !image.is_some_and(|img| img.contains(node))
        })
        .map(|el| Candidate {
            rect: Rect::from(el.get_bounding_client_rect()),
            z_index: hit::parse_z_index(&computed_property(&el, "z-index")),
            inert: is_inert(&el),
            animating: animation::is_animating(&el),
            element: el,
        })
        .collect()
}

fn hover_pass(config: &DragConfig, state: &Shared) {
    let (at, dragged, image) = {
        let s = state.borrow();
        let (Some(session), Some(gesture)) = (s.machine.session(), s.gesture.as_ref()) else {
            return;
        };
        (session.last_pointer, session.dragged.clone(), gesture.drag_image.clone())
    };

    let candidates = collect_droppables(&config.droppable, &dragged, image.as_ref());
    let top = hit::topmost(&candidates, at, std::slice::from_ref(&dragged));
    let events = state.borrow_mut().machine.hover(top);
    dispatch_all(&events);
}

#[derive(Serialize)]
struct GlideFrame {
    transform: String,
}

#[derive(Serialize)]
struct GlideTiming {
    duration: f64,
    easing: &'static str,
    fill: &'static str,
}

/// Slide the drag image from where it was released onto its resting rect, then remove it
fn glide_home(image: HtmlElement, home: Rect) {
    let from = Rect::from(image.get_bounding_client_rect());
    let delta = home.origin().offset_from(from.origin());
    let frames = [
        GlideFrame { transform: "translate(0px, 0px)".to_string() },
        GlideFrame { transform: format!("translate({}px, {}px)", delta.x, delta.y) },
    ];
    let timing = GlideTiming { duration: SETTLE_MS, easing: "ease-out", fill: "forwards" };

    match animation::play(&image, &frames, &timing) {
        Some(handle) => wasm_bindgen_futures::spawn_local(async move {
            handle.finished().await;
            image.remove();
        }),
        None => image.remove(),
    }
}

/// Animate a restored draggable from where it was released into its slot
fn glide_back(dragged: &HtmlElement, released_at: Rect) {
    let home = Rect::from(dragged.get_bounding_client_rect());
    let delta = released_at.origin().offset_from(home.origin());
    let frames = [
        GlideFrame { transform: format!("translate({}px, {}px)", delta.x, delta.y) },
        GlideFrame { transform: "translate(0px, 0px)".to_string() },
    ];
    let timing = GlideTiming { duration: SETTLE_MS, easing: "ease-out", fill: "backwards" };
    let _ = animation::play(dragged, &frames, &timing);
}

fn settle(config: &DragConfig, gesture: Gesture, dropped: bool) {
    let _ = gesture.dragged.class_list().remove_1(&config.dragged_class);
    let animate = if dropped { config.animate_drop } else { config.animate_cancel };

    match &gesture.drag_image {
        Some(image) if animate => {
            let home = Rect::from(gesture.dragged.get_bounding_client_rect());
            glide_home(image.clone(), home);
        }
        Some(image) => image.remove(),
        None => {
            let released_at = Rect::from(gesture.dragged.get_bounding_client_rect());
            restore(&gesture);
            if animate {
                glide_back(&gesture.dragged, released_at);
            }
        }
    }
}

/// Pointer released or cancelled: tear down the gesture, then emit the final events
fn finish(config: &DragConfig, state: &Shared, at: Point, cancelled: bool) {
    let (released, gesture) = {
        let mut s = state.borrow_mut();
        let released: Option<Released<HtmlElement>> = if cancelled { s.machine.cancel(at) } else { s.machine.release(at) };
        let Some(released) = released else { return };
        (released, s.gesture.take())
    };

    if let Some(mut gesture) = gesture {
        gesture.pending_frame = None;
        // This runs inside one of these listeners; drop them after it returns
        let listeners = std::mem::take(&mut gesture.listeners);
        wasm_bindgen_futures::spawn_local(async move { drop(listeners) });
        settle(config, gesture, released.session.drop_target.is_some());
    }

    log::debug!(
        "[DND] dragend at ({}, {}), dropped={}",
        at.x,
        at.y,
        released.session.drop_target.is_some() && !cancelled
    );
    dispatch_all(&released.events);
}
