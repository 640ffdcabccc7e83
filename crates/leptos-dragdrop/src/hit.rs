//! Droppable Hit Testing
//!
//! Picks the single topmost droppable under the pointer.

use crate::geometry::{Point, Rect};

/// A droppable as measured during one hit-test pass
#[derive(Clone, Debug)]
pub struct Candidate<E> {
    pub element: E,
    pub rect: Rect,
    /// Explicit z-index; `None` for `auto`
    pub z_index: Option<i32>,
    /// Inert, disabled or aria-disabled
    pub inert: bool,
    /// Mid-animation; its rect is not where it will come to rest
    pub animating: bool,
}

/// Topmost candidate containing `pointer`, skipping `excluded`, inert and
/// animating ones.
///
/// Candidates are expected in document order. Higher z-index wins, `auto`
/// ranks below every explicit value, ties go to the later element.
pub fn topmost<E: Clone + PartialEq>(candidates: &[Candidate<E>], pointer: Point, excluded: &[E]) -> Option<E> {
    candidates
        .iter()
        .filter(|c| !c.inert && !c.animating)
        .filter(|c| !excluded.contains(&c.element))
        .filter(|c| c.rect.contains(pointer))
        .max_by_key(|c| c.z_index.unwrap_or(i32::MIN))
        .map(|c| c.element.clone())
}

/// Parse a computed `z-index` value
pub fn parse_z_index(value: &str) -> Option<i32> {
    value.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(element: &'static str, x: f64, z_index: Option<i32>) -> Candidate<&'static str> {
        Candidate { element, rect: Rect::new(x, 0.0, 100.0, 100.0), z_index, inert: false, animating: false }
    }

    #[test]
    fn test_picks_containing_candidate() {
        let cells = vec![cell("a", 0.0, None), cell("b", 120.0, None)];
        assert_eq!(topmost(&cells, Point::new(150.0, 50.0), &[]), Some("b"));
        assert_eq!(topmost(&cells, Point::new(110.0, 50.0), &[]), None);
    }

    #[test]
    fn test_excludes_dragged_element() {
        let cells = vec![cell("a", 0.0, None), cell("b", 0.0, None)];
        assert_eq!(topmost(&cells, Point::new(50.0, 50.0), &["b"]), Some("a"));
        assert_eq!(topmost(&cells, Point::new(50.0, 50.0), &["a", "b"]), None);
    }

    #[test]
    fn test_skips_inert_candidates() {
        let mut hidden = cell("hidden", 0.0, Some(10));
        hidden.inert = true;
        let cells = vec![cell("a", 0.0, None), hidden];
        assert_eq!(topmost(&cells, Point::new(50.0, 50.0), &[]), Some("a"));
    }

    #[test]
    fn test_skips_animating_candidates() {
        let mut gliding = cell("gliding", 0.0, None);
        gliding.animating = true;
        let cells = vec![cell("resting", 0.0, None), gliding];
        assert_eq!(topmost(&cells, Point::new(50.0, 50.0), &[]), Some("resting"));

        let mut alone = cell("alone", 0.0, None);
        alone.animating = true;
        assert_eq!(topmost(&[alone], Point::new(50.0, 50.0), &[]), None);
    }

    #[test]
    fn test_highest_z_index_wins() {
        let cells = vec![cell("top", 0.0, Some(5)), cell("auto", 0.0, None), cell("mid", 0.0, Some(1))];
        assert_eq!(topmost(&cells, Point::new(50.0, 50.0), &[]), Some("top"));
    }

    #[test]
    fn test_negative_z_index_still_beats_auto() {
        let cells = vec![cell("neg", 0.0, Some(-3)), cell("auto", 0.0, None)];
        assert_eq!(topmost(&cells, Point::new(50.0, 50.0), &[]), Some("neg"));
    }

    #[test]
    fn test_ties_go_to_later_element() {
        let cells = vec![cell("first", 0.0, None), cell("second", 0.0, None)];
        assert_eq!(topmost(&cells, Point::new(50.0, 50.0), &[]), Some("second"));
    }

    #[test]
    fn test_parse_z_index() {
        assert_eq!(parse_z_index("auto"), None);
        assert_eq!(parse_z_index("12"), Some(12));
        assert_eq!(parse_z_index(" -4 "), Some(-4));
        assert_eq!(parse_z_index(""), None);
    }
}
