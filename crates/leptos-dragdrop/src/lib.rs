//! Leptos DragDrop
//!
//! Pointer-event drag and drop for Leptos.
//!
//! The engine listens for `pointerdown` on a drag trigger inside a
//! draggable, lifts the draggable (or a drag image built from it), tracks
//! the pointer and dispatches bubbling `CustomEvent`s named after the HTML5
//! drag events: `dragstart`, `drag`, `dragenter`, `dragleave`, `drop`,
//! `dragend`. Each carries `{ clientX, clientY }` in `detail`.
//!
//! The swap detector sits on top of those events and calls back once per
//! droppable entry when the pointer has moved past a fraction of the
//! droppable's size.
//!
//! ```ignore
//! let grid = NodeRef::<Div>::new();
//! use_draggable(grid, DragConfig::default());
//! use_drag_over(grid, DragOverConfig { threshold: 0.4 }, move |dragged, target| {
//!     // reorder
//! });
//! ```

pub mod animation;
pub mod config;
pub mod drag_over;
pub mod engine;
pub mod events;
pub mod geometry;
pub mod hit;
pub mod session;
pub mod swap;

pub use animation::{is_animating, AnimationHandle};
pub use config::{DragConfig, DragImageFn, DragOverConfig};
pub use drag_over::{bind_drag_over, use_drag_over, DragOverBinding};
pub use engine::{bind, use_draggable, DragBinding};
pub use events::{pointer_of, PointerDetail};
pub use geometry::{Point, Rect};
pub use session::{DragError, DragEventKind, DragMachine, DragPhase, DragSession};
pub use swap::SwapTracker;
