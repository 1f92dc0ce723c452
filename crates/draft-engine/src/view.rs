//! Coordinate frames.
//!
//! Viewport coordinates are device pixels from the surface's top-left, y
//! down. SVG coordinates are the viewport translated by the view box offset,
//! still y down. Data coordinates are the mathematical plane, y up, about
//! the data origin.

use draft_types::Vec2;

/// The visible window onto the SVG plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBox {
    pub offset: Vec2,
    pub width: f64,
    pub height: f64,
}

impl ViewBox {
    pub fn new() -> Self {
        Self {
            offset: Vec2::ZERO,
            width: 0.0,
            height: 0.0,
        }
    }

    pub fn viewport_to_svg(&self, p: Vec2) -> Vec2 {
        p + self.offset
    }
}

impl Default for ViewBox {
    fn default() -> Self {
        Self::new()
    }
}

/// The point of the SVG plane the data origin sits at.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DataOrigin(pub Vec2);

impl DataOrigin {
    pub fn svg_to_data(&self, p: Vec2) -> Vec2 {
        Vec2::new(p.x - self.0.x, self.0.y - p.y)
    }

    pub fn data_to_svg(&self, p: Vec2) -> Vec2 {
        Vec2::new(p.x + self.0.x, self.0.y - p.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_and_svg_are_inverse() {
        let origin = DataOrigin(Vec2::new(100.0, 200.0));
        let p = Vec2::new(-3.0, 17.5);
        let there = origin.data_to_svg(p);
        assert_eq!(origin.svg_to_data(there), p);
    }

    #[test]
    fn y_flips_between_frames() {
        let origin = DataOrigin(Vec2::ZERO);
        // SVG y grows downward, data y grows upward.
        assert_eq!(origin.svg_to_data(Vec2::new(10.0, 10.0)), Vec2::new(10.0, -10.0));
    }

    #[test]
    fn viewport_shifts_by_the_view_box_offset() {
        let mut vb = ViewBox::new();
        vb.offset = Vec2::new(5.0, -5.0);
        assert_eq!(vb.viewport_to_svg(Vec2::new(1.0, 1.0)), Vec2::new(6.0, -4.0));
    }
}
