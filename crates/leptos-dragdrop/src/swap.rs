//! Swap Threshold Tracking
//!
//! Once a drag enters a droppable, measures pointer displacement from the
//! entry point and reports a swap a single time when it crosses a fraction
//! of the droppable's size.

use crate::geometry::{Point, Rect};

pub const DEFAULT_THRESHOLD: f64 = 0.5;

#[derive(Clone, Debug)]
struct Entry<E> {
    target: E,
    entered_at: Point,
    width: f64,
    height: f64,
    fired: bool,
}

#[derive(Clone, Debug)]
pub struct SwapTracker<E> {
    threshold: f64,
    entry: Option<Entry<E>>,
}

impl<E: Clone + PartialEq> SwapTracker<E> {
    /// `threshold` is clamped to `0.0..=1.0`
    pub fn new(threshold: f64) -> Self {
        let threshold = if threshold.is_finite() { threshold.clamp(0.0, 1.0) } else { DEFAULT_THRESHOLD };
        Self { threshold, entry: None }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn current(&self) -> Option<&E> {
        self.entry.as_ref().map(|e| &e.target)
    }

    pub fn enter(&mut self, target: E, at: Point, rect: Rect) {
        self.entry = Some(Entry { target, entered_at: at, width: rect.width, height: rect.height, fired: false });
    }

    /// Clears the entry only if `target` is the one being tracked
    pub fn leave(&mut self, target: &E) {
        if self.current() == Some(target) {
            self.entry = None;
        }
    }

    pub fn reset(&mut self) {
        self.entry = None;
    }

    /// Returns the target the first time displacement exceeds the threshold
    pub fn pointer_move(&mut self, at: Point) -> Option<E> {
        let threshold = self.threshold;
        let entry = self.entry.as_mut()?;
        if entry.fired {
            return None;
        }
        let delta = at.offset_from(entry.entered_at);
        let crossed = delta.x.abs() > threshold * entry.width || delta.y.abs() > threshold * entry.height;
        if crossed {
            entry.fired = true;
            Some(entry.target.clone())
        } else {
            None
        }
    }
}

impl<E: Clone + PartialEq> Default for SwapTracker<E> {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker_over_b(threshold: f64) -> SwapTracker<&'static str> {
        let mut tracker = SwapTracker::new(threshold);
        tracker.enter("b", Point::new(200.0, 100.0), Rect::new(180.0, 50.0, 100.0, 200.0));
        tracker
    }

    #[test]
    fn test_fires_exactly_once_above_threshold() {
        let mut tracker = tracker_over_b(0.3);
        let fired: Vec<_> = (0..60)
            .filter_map(|i| tracker.pointer_move(Point::new(200.0 + i as f64, 100.0)))
            .collect();
        assert_eq!(fired, vec!["b"]);
    }

    #[test]
    fn test_never_fires_below_threshold() {
        let mut tracker = tracker_over_b(0.3);
        // 30% of width is 30px, 30% of height is 60px
        for i in 0..=30 {
            assert_eq!(tracker.pointer_move(Point::new(200.0 - i as f64, 100.0 + 2.0 * i as f64)), None);
        }
    }

    #[test]
    fn test_vertical_threshold_uses_height() {
        let mut tracker = tracker_over_b(0.3);
        assert_eq!(tracker.pointer_move(Point::new(200.0, 160.0)), None);
        assert_eq!(tracker.pointer_move(Point::new(200.0, 160.5)), Some("b"));
    }

    #[test]
    fn test_reentry_rearms() {
        let mut tracker = tracker_over_b(0.1);
        assert_eq!(tracker.pointer_move(Point::new(260.0, 100.0)), Some("b"));
        tracker.leave(&"b");
        assert_eq!(tracker.pointer_move(Point::new(300.0, 100.0)), None);

        tracker.enter("b", Point::new(300.0, 100.0), Rect::new(180.0, 50.0, 100.0, 200.0));
        assert_eq!(tracker.pointer_move(Point::new(250.0, 100.0)), Some("b"));
    }

    #[test]
    fn test_leave_of_other_target_is_ignored() {
        let mut tracker = tracker_over_b(0.1);
        tracker.leave(&"c");
        assert_eq!(tracker.current(), Some(&"b"));
        tracker.reset();
        assert_eq!(tracker.current(), None);
    }

    #[test]
    fn test_threshold_is_clamped() {
        assert_eq!(SwapTracker::<u8>::new(3.0).threshold(), 1.0);
        assert_eq!(SwapTracker::<u8>::new(-1.0).threshold(), 0.0);
        assert_eq!(SwapTracker::<u8>::new(f64::NAN).threshold(), DEFAULT_THRESHOLD);
    }
}
