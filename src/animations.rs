//! Animation Primitives
//!
//! `animate()` turns a partial start/end visual state into a two-frame Web
//! Animation relative to where the element is right now. Everything up to
//! the `Element.animate()` call is pure and lives in [`build`].

use leptos_dragdrop::animation::{self, AnimationHandle};
use leptos_dragdrop::{Point, Rect};
use serde::Serialize;

use crate::config::AnimationSettings;
use crate::dom::{self, Resolvable};

pub const DEFAULT_DURATION_MS: f64 = 300.0;
pub const DEFAULT_EASING: &str = "ease-in-out";

/// Partial visual state; `x`/`y` are viewport coordinates of the top-left
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct VisualState {
    pub opacity: Option<f64>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl VisualState {
    pub fn opacity(opacity: f64) -> Self {
        Self { opacity: Some(opacity), ..Self::default() }
    }

    pub fn at(point: Point) -> Self {
        Self { x: Some(point.x), y: Some(point.y), ..Self::default() }
    }

    pub fn size(width: f64, height: f64) -> Self {
        Self { width: Some(width), height: Some(height), ..Self::default() }
    }

    pub fn rect(rect: Rect) -> Self {
        Self {
            x: Some(rect.x),
            y: Some(rect.y),
            width: Some(rect.width),
            height: Some(rect.height),
            opacity: None,
        }
    }

    fn moves(&self) -> bool {
        self.x.is_some() || self.y.is_some()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnimateOptions {
    pub start: Option<VisualState>,
    pub end: Option<VisualState>,
    /// Fixed duration in ms
    pub duration: Option<f64>,
    /// Multiplier for the distance-based duration; overrides `duration`
    pub dynamic_duration: Option<f64>,
    pub easing: Option<String>,
    pub delay: Option<f64>,
}

impl AnimateOptions {
    /// Options carrying the configured duration and easing
    pub fn with_settings(settings: &AnimationSettings) -> Self {
        Self {
            duration: Some(settings.duration_ms),
            easing: Some(settings.easing.clone()),
            ..Self::default()
        }
    }

    pub fn from(mut self, start: VisualState) -> Self {
        self.start = Some(start);
        self
    }

    pub fn to(mut self, end: VisualState) -> Self {
        self.end = Some(end);
        self
    }

    pub fn duration(mut self, ms: f64) -> Self {
        self.duration = Some(ms);
        self
    }

    pub fn dynamic(mut self, multiplier: f64) -> Self {
        self.dynamic_duration = Some(multiplier);
        self
    }

    pub fn delay(mut self, ms: f64) -> Self {
        self.delay = Some(ms);
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Keyframe {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transform: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Fill {
    None,
    Forwards,
    Backwards,
    Both,
}

impl Fill {
    pub fn for_ends(start: bool, end: bool) -> Self {
        match (start, end) {
            (true, true) => Self::Both,
            (true, false) => Self::Backwards,
            (false, true) => Self::Forwards,
            (false, false) => Self::None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Timing {
    pub duration: f64,
    pub easing: String,
    pub delay: f64,
    pub fill: Fill,
}

/// Where the element is at call time
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Current {
    pub rect: Rect,
    pub opacity: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Resolved {
    rect: Rect,
    opacity: f64,
}

fn resolve(current: &Current, state: Option<&VisualState>) -> Resolved {
    let state = state.copied().unwrap_or_default();
    Resolved {
        rect: Rect::new(
            state.x.unwrap_or(current.rect.x),
            state.y.unwrap_or(current.rect.y),
            state.width.unwrap_or(current.rect.width),
            state.height.unwrap_or(current.rect.height),
        ),
        opacity: state.opacity.unwrap_or(current.opacity),
    }
}

/// Norm of (Δx, Δy, Δwidth, Δheight) between the resolved ends
pub fn magnitude(current: &Current, start: Option<&VisualState>, end: Option<&VisualState>) -> f64 {
    resolve(current, start).rect.distance(&resolve(current, end).rect)
}

/// `max(0, 150·ln(1.5·m) − 300)`: nothing for short hops, sub-linear growth after
pub fn dynamic_duration(magnitude: f64) -> f64 {
    if magnitude <= 0.0 {
        return 0.0;
    }
    (150.0 * (1.5 * magnitude).ln() - 300.0).max(0.0)
}

/// Keyframes and timing for `options` applied to an element at `current`
pub fn build(current: &Current, options: &AnimateOptions) -> ([Keyframe; 2], Timing) {
    let start = options.start.as_ref();
    let end = options.end.as_ref();
    let from = resolve(current, start);
    let to = resolve(current, end);
    let mentions = |f: fn(&VisualState) -> bool| start.is_some_and(f) || end.is_some_and(f);

    let mut frames = [Keyframe::default(), Keyframe::default()];
    for (frame, side) in frames.iter_mut().zip([from, to]) {
        if mentions(|s| s.opacity.is_some()) {
            frame.opacity = Some(side.opacity);
        }
        if mentions(VisualState::moves) {
            frame.transform = Some(format!(
                "translate({}px, {}px)",
                side.rect.x - current.rect.x,
                side.rect.y - current.rect.y
            ));
        }
        if mentions(|s| s.width.is_some()) {
            frame.width = Some(format!("{}px", side.rect.width));
        }
        if mentions(|s| s.height.is_some()) {
            frame.height = Some(format!("{}px", side.rect.height));
        }
    }

    let duration = match options.dynamic_duration {
        Some(multiplier) => dynamic_duration(from.rect.distance(&to.rect)) * multiplier,
        None => options.duration.unwrap_or(DEFAULT_DURATION_MS),
    };
    let timing = Timing {
        duration,
        easing: options.easing.clone().unwrap_or_else(|| DEFAULT_EASING.to_string()),
        delay: options.delay.unwrap_or(0.0),
        fill: Fill::for_ends(start.is_some(), end.is_some()),
    };
    (frames, timing)
}

/// Animate `target` from `options.start` to `options.end`. `None` when the
/// target does not resolve to a live element.
pub fn animate(target: &impl Resolvable, options: AnimateOptions) -> Option<AnimationHandle> {
    let el = target.resolve()?;
    let current = Current {
        rect: Rect::from(el.get_bounding_client_rect()),
        opacity: dom::computed_opacity(&el),
    };
    let (frames, timing) = build(&current, &options);
    animation::play(&el, &frames, &timing)
}

pub fn fade_in(target: &impl Resolvable, options: AnimateOptions) -> Option<AnimationHandle> {
    animate(target, options.from(VisualState::opacity(0.0)))
}

pub fn fade_out(target: &impl Resolvable, options: AnimateOptions) -> Option<AnimationHandle> {
    animate(target, options.to(VisualState::opacity(0.0)))
}

pub fn move_in(target: &impl Resolvable, from: Point, options: AnimateOptions) -> Option<AnimationHandle> {
    animate(target, options.from(VisualState::at(from)))
}

pub fn move_out(target: &impl Resolvable, to: Point, options: AnimateOptions) -> Option<AnimationHandle> {
    animate(target, options.to(VisualState::at(to)))
}

pub fn resize_in(target: &impl Resolvable, from: (f64, f64), options: AnimateOptions) -> Option<AnimationHandle> {
    animate(target, options.from(VisualState::size(from.0, from.1)))
}

pub fn resize_out(target: &impl Resolvable, to: (f64, f64), options: AnimateOptions) -> Option<AnimationHandle> {
    animate(target, options.to(VisualState::size(to.0, to.1)))
}

pub fn transform_in(target: &impl Resolvable, from: Rect, options: AnimateOptions) -> Option<AnimationHandle> {
    animate(target, options.from(VisualState::rect(from)))
}

pub fn transform_out(target: &impl Resolvable, to: Rect, options: AnimateOptions) -> Option<AnimationHandle> {
    animate(target, options.to(VisualState::rect(to)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at_rest() -> Current {
        Current { rect: Rect::new(100.0, 50.0, 200.0, 120.0), opacity: 1.0 }
    }

    #[test]
    fn test_dynamic_duration_zero_for_short_hops() {
        assert_eq!(dynamic_duration(0.0), 0.0);
        assert_eq!(dynamic_duration(1.0), 0.0);
        assert_eq!(dynamic_duration(4.9), 0.0);
        assert!(dynamic_duration(5.0) > 0.0);
    }

    #[test]
    fn test_dynamic_duration_grows_sub_linearly() {
        let d100 = dynamic_duration(100.0);
        let d200 = dynamic_duration(200.0);
        let d400 = dynamic_duration(400.0);
        assert!(d100 < d200 && d200 < d400);
        // each doubling adds the same 150·ln 2
        assert!((d200 - d100 - 150.0 * 2f64.ln()).abs() < 1e-9);
        assert!((d400 - d200 - 150.0 * 2f64.ln()).abs() < 1e-9);
    }

    #[test]
    fn test_fill_modes() {
        assert_eq!(Fill::for_ends(true, true), Fill::Both);
        assert_eq!(Fill::for_ends(true, false), Fill::Backwards);
        assert_eq!(Fill::for_ends(false, true), Fill::Forwards);
        assert_eq!(Fill::for_ends(false, false), Fill::None);
    }

    #[test]
    fn test_fade_in_fills_missing_end_from_current() {
        let mut current = at_rest();
        current.opacity = 0.8;
        let (frames, timing) = build(&current, &AnimateOptions::default().from(VisualState::opacity(0.0)));
        assert_eq!(frames[0].opacity, Some(0.0));
        assert_eq!(frames[1].opacity, Some(0.8));
        assert_eq!(frames[0].transform, None);
        assert_eq!(timing.fill, Fill::Backwards);
        assert_eq!(timing.duration, DEFAULT_DURATION_MS);
    }

    #[test]
    fn test_move_translates_relative_to_current_rect() {
        let options = AnimateOptions::default().from(VisualState::at(Point::new(40.0, 80.0)));
        let (frames, _) = build(&at_rest(), &options);
        assert_eq!(frames[0].transform.as_deref(), Some("translate(-60px, 30px)"));
        assert_eq!(frames[1].transform.as_deref(), Some("translate(0px, 0px)"));
        assert_eq!(frames[0].width, None);
        assert_eq!(frames[0].opacity, None);
    }

    #[test]
    fn test_transform_covers_size_and_position() {
        let options = AnimateOptions::default().to(VisualState::rect(Rect::new(0.0, 0.0, 50.0, 60.0)));
        let (frames, timing) = build(&at_rest(), &options);
        assert_eq!(frames[0].width.as_deref(), Some("200px"));
        assert_eq!(frames[1].width.as_deref(), Some("50px"));
        assert_eq!(frames[1].height.as_deref(), Some("60px"));
        assert_eq!(frames[1].transform.as_deref(), Some("translate(-100px, -50px)"));
        assert_eq!(timing.fill, Fill::Forwards);
    }

    #[test]
    fn test_shrinking_onto_a_card_holds_the_end_state() {
        // cover shrinks to the card's size without moving
        let options = AnimateOptions::default().to(VisualState::size(50.0, 60.0));
        let (frames, timing) = build(&at_rest(), &options);
        assert_eq!(frames[0].height.as_deref(), Some("120px"));
        assert_eq!(frames[1].width.as_deref(), Some("50px"));
        assert_eq!(frames[1].height.as_deref(), Some("60px"));
        assert_eq!(frames[1].transform, None);
        assert_eq!(timing.fill, Fill::Forwards);

        // backdrop stays transparent until the overlay unmounts
        let (frames, timing) = build(&at_rest(), &AnimateOptions::default().to(VisualState::opacity(0.0)));
        assert_eq!(frames[0].opacity, Some(1.0));
        assert_eq!(frames[1].opacity, Some(0.0));
        assert_eq!(timing.fill, Fill::Forwards);
    }

    #[test]
    fn test_dynamic_duration_uses_distance_between_ends() {
        // 300px straight right
        let options = AnimateOptions::default()
            .from(VisualState::at(Point::new(-200.0, 50.0)))
            .duration(999.0)
            .dynamic(2.0);
        let (_, timing) = build(&at_rest(), &options);
        assert!((timing.duration - dynamic_duration(300.0) * 2.0).abs() < 1e-9);
        assert_eq!(
            magnitude(&at_rest(), options.start.as_ref(), None),
            300.0
        );
    }

    #[test]
    fn test_zero_distance_dynamic_move_is_instant() {
        let options = AnimateOptions::default().from(VisualState::at(Point::new(100.0, 50.0))).dynamic(1.0);
        let (_, timing) = build(&at_rest(), &options);
        assert_eq!(timing.duration, 0.0);
    }

    #[test]
    fn test_settings_pass_through() {
        let settings = AnimationSettings { duration_ms: 120.0, easing: "linear".to_string(), ..Default::default() };
        let (_, timing) = build(&at_rest(), &AnimateOptions::with_settings(&settings).delay(40.0));
        assert_eq!(timing.duration, 120.0);
        assert_eq!(timing.easing, "linear");
        assert_eq!(timing.delay, 40.0);
        assert_eq!(timing.fill, Fill::None);
    }
}
