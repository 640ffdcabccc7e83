//! UI Components
//!
//! Leptos components of the gallery.

pub mod anchor;
pub mod animated;
pub mod controls;
pub mod gallery;
pub mod mirror;
pub mod overlay;
pub mod project;
pub mod reorderable;

pub use anchor::{Anchor, AnchorChain};
pub use animated::Animated;
pub use controls::Controls;
pub use gallery::Gallery;
pub use mirror::Mirror;
pub use overlay::Overlay;
pub use project::ProjectCard;
pub use reorderable::Reorderable;
