//! Gallery Settings
//!
//! Optional `settings` block of the project feed. Every field has a
//! default, so an empty or missing block yields a working gallery.

use serde::Deserialize;

use crate::error::{GalleryError, GalleryResult};

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    pub animation: AnimationSettings,
    pub controls: ControlSettings,
    pub drag: DragSettings,
    pub assets: AssetSettings,
}

/// Defaults for the animation primitives
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnimationSettings {
    /// Fixed duration when no dynamic duration applies (ms)
    pub duration_ms: f64,
    pub fade_ms: f64,
    pub easing: String,
    /// Multiplier for distance-based durations of reorder moves
    pub dynamic_duration: f64,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ControlSettings {
    /// Controls stay disabled this long after each click (ms)
    pub debounce_ms: u32,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct DragSettings {
    pub dragged_class: String,
    pub animate_drop: bool,
    pub animate_cancel: bool,
    /// Fraction of a card's size to travel before two cards swap
    pub swap_threshold: f64,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct AssetSettings {
    /// Prefix for relative image paths
    pub base: String,
    /// Widths of the pre-rendered responsive variants
    pub widths: Vec<u32>,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self { duration_ms: 300.0, fade_ms: 250.0, easing: "ease-in-out".to_string(), dynamic_duration: 1.0 }
    }
}

impl Default for ControlSettings {
    fn default() -> Self {
        Self { debounce_ms: 600 }
    }
}

impl Default for DragSettings {
    fn default() -> Self {
        Self { dragged_class: "dragging".to_string(), animate_drop: true, animate_cancel: true, swap_threshold: 0.35 }
    }
}

impl Default for AssetSettings {
    fn default() -> Self {
        Self { base: "assets/".to_string(), widths: vec![480, 960, 1440] }
    }
}

fn invalid(name: &'static str, reason: impl Into<String>) -> GalleryError {
    GalleryError::InvalidSetting { name, reason: reason.into() }
}

impl GalleryConfig {
    /// Reject values the animation and drag layers cannot work with
    pub fn validate(&self) -> GalleryResult<()> {
        let a = &self.animation;
        if !(a.duration_ms.is_finite() && a.duration_ms >= 0.0) {
            return Err(invalid("animation.duration_ms", format!("{} is not a non-negative duration", a.duration_ms)));
        }
        if !(a.fade_ms.is_finite() && a.fade_ms >= 0.0) {
            return Err(invalid("animation.fade_ms", format!("{} is not a non-negative duration", a.fade_ms)));
        }
        if !(a.dynamic_duration.is_finite() && a.dynamic_duration >= 0.0) {
            return Err(invalid("animation.dynamic_duration", "multiplier must be >= 0"));
        }
        let t = self.drag.swap_threshold;
        if !(0.0..=1.0).contains(&t) {
            return Err(invalid("drag.swap_threshold", format!("{} is outside 0..1", t)));
        }
        if self.assets.widths.iter().any(|w| *w == 0) {
            return Err(invalid("assets.widths", "widths must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_block_uses_defaults() {
        let config: GalleryConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, GalleryConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_block_overrides_only_given_fields() {
        let config: GalleryConfig =
            serde_json::from_str(r#"{"drag": {"swap_threshold": 0.6}, "controls": {"debounce_ms": 200}}"#).unwrap();
        assert_eq!(config.drag.swap_threshold, 0.6);
        assert_eq!(config.drag.dragged_class, "dragging");
        assert_eq!(config.controls.debounce_ms, 200);
        assert_eq!(config.animation.duration_ms, 300.0);
    }

    #[test]
    fn test_out_of_range_threshold_is_rejected() {
        let mut config = GalleryConfig::default();
        config.drag.swap_threshold = 1.5;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("drag.swap_threshold"));
    }

    #[test]
    fn test_negative_duration_is_rejected() {
        let mut config = GalleryConfig::default();
        config.animation.duration_ms = -1.0;
        assert!(matches!(
            config.validate(),
            Err(GalleryError::InvalidSetting { name: "animation.duration_ms", .. })
        ));
    }
}
