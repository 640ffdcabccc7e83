//! Geometry
//!
//! Viewport-space points and rectangles shared by the drag engine and the
//! animation layer.

use serde::{Deserialize, Serialize};

/// A point in viewport coordinates (CSS pixels)
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Vector from `origin` to `self`
    pub fn offset_from(self, origin: Point) -> Point {
        Point::new(self.x - origin.x, self.y - origin.y)
    }
}

/// An axis-aligned rectangle in viewport coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Edges are inclusive so a pointer resting on a shared border hits both cells
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Euclidean norm of the position and size differences between two rects
    pub fn distance(&self, other: &Rect) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dw = self.width - other.width;
        let dh = self.height - other.height;
        (dx * dx + dy * dy + dw * dw + dh * dh).sqrt()
    }
}

impl From<&web_sys::DomRect> for Rect {
    fn from(r: &web_sys::DomRect) -> Self {
        Rect::new(r.left(), r.top(), r.width(), r.height())
    }
}

impl From<web_sys::DomRect> for Rect {
    fn from(r: web_sys::DomRect) -> Self {
        Rect::from(&r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_is_edge_inclusive() {
        let r = Rect::new(10.0, 10.0, 100.0, 50.0);
        assert!(r.contains(Point::new(10.0, 10.0)));
        assert!(r.contains(Point::new(110.0, 60.0)));
        assert!(!r.contains(Point::new(110.1, 30.0)));
        assert!(!r.contains(Point::new(50.0, 9.9)));
    }

    #[test]
    fn test_distance_combines_position_and_size() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(3.0, 4.0, 10.0, 10.0);
        assert_eq!(a.distance(&b), 5.0);

        let c = Rect::new(0.0, 0.0, 13.0, 14.0);
        assert_eq!(a.distance(&c), 5.0);
        assert_eq!(a.distance(&a), 0.0);
    }

    #[test]
    fn test_point_offset() {
        let grab = Point::new(120.0, 80.0).offset_from(Point::new(100.0, 50.0));
        assert_eq!(grab, Point::new(20.0, 30.0));
    }
}
