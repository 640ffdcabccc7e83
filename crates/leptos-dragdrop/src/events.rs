//! Synthetic Drag Events
//!
//! Bubbling `CustomEvent`s carrying the originating pointer coordinates.

use serde::{Deserialize, Serialize};
use wasm_bindgen::JsCast;
use web_sys::{CustomEvent, CustomEventInit, Event, EventTarget};

use crate::geometry::Point;
use crate::session::{DragEventKind, Emitted};

/// `detail` payload of every synthetic drag event
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointerDetail {
    pub client_x: f64,
    pub client_y: f64,
}

impl From<Point> for PointerDetail {
    fn from(p: Point) -> Self {
        Self { client_x: p.x, client_y: p.y }
    }
}

impl From<PointerDetail> for Point {
    fn from(d: PointerDetail) -> Self {
        Point::new(d.client_x, d.client_y)
    }
}

pub fn dispatch(target: &EventTarget, kind: DragEventKind, point: Point) {
    let init = CustomEventInit::new();
    init.set_bubbles(true);
    match serde_wasm_bindgen::to_value(&PointerDetail::from(point)) {
        Ok(detail) => init.set_detail(&detail),
        Err(e) => log::warn!("[DND] detail not serializable: {}", e),
    }
    match CustomEvent::new_with_event_init_dict(kind.event_type(), &init) {
        Ok(event) => {
            let _ = target.dispatch_event(&event);
        }
        Err(err) => log::warn!("[DND] cannot create {} event: {:?}", kind.event_type(), err),
    }
}

/// Dispatch in order; callers must not hold engine borrows across this
pub fn dispatch_all<E: AsRef<EventTarget>>(events: &[Emitted<E>]) {
    for event in events {
        dispatch(event.target.as_ref(), event.kind, event.point);
    }
}

/// Pointer position of a synthetic drag event; `None` for native events
pub fn pointer_of(event: &Event) -> Option<Point> {
    let custom = event.dyn_ref::<CustomEvent>()?;
    serde_wasm_bindgen::from_value::<PointerDetail>(custom.detail()).ok().map(Point::from)
}
