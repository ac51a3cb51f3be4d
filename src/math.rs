use std::fmt;

pub use glam::{Vec2, vec2};

/// Axis-aligned rectangle defined by position (top-left corner) & size, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub position: Vec2,
    pub size: Vec2,
}

impl Rect {
    /// Create a new rectangle from position (top-left) & size
    pub fn new(position: impl Into<Vec2>, size: impl Into<Vec2>) -> Self {
        Self {
            position: position.into(),
            size: size.into(),
        }
    }

    /// Rectangle of the given size anchored at the origin
    pub fn from_size(size: impl Into<Vec2>) -> Self {
        Self::new(Vec2::ZERO, size)
    }

    /// Returns the top-left corner (min coords)
    pub fn min(&self) -> Vec2 {
        self.position
    }

    /// Returns the bottom-right corner (max coords)
    pub fn max(&self) -> Vec2 {
        self.position + self.size
    }

    /// True when the rectangle covers no area
    pub fn is_empty(&self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    /// Returns true if `other` lies entirely inside of this rectangle
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.min().cmpge(self.min()).all() && other.max().cmple(self.max()).all()
    }

    /// Returns the four corners in this order: top-left, top-right, bottom-right, bottom-left
    pub fn corners(&self) -> [Vec2; 4] {
        let tl = self.position;
        let tr = vec2(tl.x + self.size.x, tl.y);
        let br = vec2(tl.x + self.size.x, tl.y + self.size.y);
        let bl = vec2(tl.x, tl.y + self.size.y);
        [tl, tr, br, bl]
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}) {}x{}",
            self.position.x, self.position.y, self.size.x, self.size.y
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_rect_edges() {
        // a rect contains itself & anything flush with its edges, nothing past them
        let bounds = Rect::from_size((64.0, 32.0));
        assert!(bounds.contains_rect(&bounds));
        assert!(bounds.contains_rect(&Rect::new((32.0, 0.0), (32.0, 32.0))));
        assert!(!bounds.contains_rect(&Rect::new((33.0, 0.0), (32.0, 32.0))));
        assert!(!bounds.contains_rect(&Rect::new((-1.0, 0.0), (8.0, 8.0))));
    }

    #[test]
    fn empty_rects() {
        assert!(Rect::from_size((0.0, 10.0)).is_empty());
        assert!(Rect::from_size((10.0, -1.0)).is_empty());
        assert!(!Rect::from_size((1.0, 1.0)).is_empty());
    }

    #[test]
    fn corners_run_clockwise_from_top_left() {
        let rect = Rect::new((10.0, 20.0), (30.0, 40.0));
        assert_eq!(
            rect.corners(),
            [
                vec2(10.0, 20.0),
                vec2(40.0, 20.0),
                vec2(40.0, 60.0),
                vec2(10.0, 60.0)
            ]
        );
    }
}
