//! Drag Configuration

use std::fmt;
use std::rc::Rc;

use web_sys::HtmlElement;

use crate::swap::DEFAULT_THRESHOLD;

/// Builds the stand-in that follows the pointer; `None` lifts the draggable itself
pub type DragImageFn = Rc<dyn Fn(&HtmlElement) -> Option<HtmlElement>>;

/// Drag engine options
#[derive(Clone)]
pub struct DragConfig {
    /// Selector for elements that can be dragged
    pub draggable: String,
    /// Selector for the handle that must receive the pointer-down
    pub drag_trigger: String,
    /// Selector for elements that can receive a drop
    pub droppable: String,
    /// Class added to the draggable for the duration of the gesture
    pub dragged_class: String,
    /// Glide the drag image back to rest after a drop
    pub animate_drop: bool,
    /// Glide the drag image back to rest after a release outside any droppable
    pub animate_cancel: bool,
    /// Stand-in factory; without one the draggable itself is lifted
    pub make_drag_image: Option<DragImageFn>,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            draggable: "[data-draggable]".to_string(),
            drag_trigger: "[data-drag-trigger]".to_string(),
            droppable: "[data-droppable]".to_string(),
            dragged_class: "dragging".to_string(),
            animate_drop: true,
            animate_cancel: true,
            make_drag_image: None,
        }
    }
}

impl fmt::Debug for DragConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DragConfig")
            .field("draggable", &self.draggable)
            .field("drag_trigger", &self.drag_trigger)
            .field("droppable", &self.droppable)
            .field("dragged_class", &self.dragged_class)
            .field("animate_drop", &self.animate_drop)
            .field("animate_cancel", &self.animate_cancel)
            .field("make_drag_image", &self.make_drag_image.is_some())
            .finish()
    }
}

/// Swap detector options
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragOverConfig {
    /// Fraction (0..1) of the droppable's size the pointer must travel after entering
    pub threshold: f64,
}

impl Default for DragOverConfig {
    fn default() -> Self {
        Self { threshold: DEFAULT_THRESHOLD }
    }
}
