use crate::coords::Rect;
use crate::paint::Color;

/// Paint layer. Higher layers cover lower ones.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ZIndex(pub i32);

impl ZIndex {
    #[inline]
    pub const fn new(layer: i32) -> Self {
        Self(layer)
    }
}

/// Solid rounded rectangle in logical pixels.
///
/// `rotation` turns the shape about its center, in radians, clockwise on
/// screen (+Y down). A radius of half the short side gives a capsule.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Shape {
    pub rect: Rect,
    pub radius: f32,
    pub color: Color,
    pub rotation: f32,
}

impl Shape {
    #[inline]
    pub fn rounded_rect(rect: Rect, radius: f32, color: Color) -> Self {
        Self { rect, radius, color, rotation: 0.0 }
    }

    /// Radius clamped to what the (normalized) rect can hold.
    pub fn effective_radius(&self) -> f32 {
        let r = self.rect.normalized();
        self.radius.clamp(0.0, 0.5 * r.size.x.min(r.size.y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radius_is_clamped_to_the_short_side() {
        let s = Shape::rounded_rect(Rect::new(0.0, 0.0, 40.0, 10.0), 50.0, Color::BLACK);
        assert_eq!(s.effective_radius(), 5.0);

        let s = Shape::rounded_rect(Rect::new(0.0, 0.0, 40.0, 10.0), -3.0, Color::BLACK);
        assert_eq!(s.effective_radius(), 0.0);
    }
}
