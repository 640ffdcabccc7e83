//! Gallery Errors
//!
//! Typed errors for loading the project feed and its settings. The UI
//! never shows these: they are logged and the gallery degrades.

use thiserror::Error;

pub type GalleryResult<T> = Result<T, GalleryError>;

#[derive(Debug, Error)]
pub enum GalleryError {
    /// The feed is not valid JSON or does not match the expected shape
    #[error("project feed is malformed: {0}")]
    Feed(#[from] serde_json::Error),

    /// Two projects share an id, which would break keyed rendering
    #[error("duplicate project id `{0}`")]
    DuplicateProjectId(String),

    /// A setting is outside its accepted range
    #[error("invalid setting `{name}`: {reason}")]
    InvalidSetting { name: &'static str, reason: String },
}
