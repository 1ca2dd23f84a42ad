use super::Vec2;

/// Drawable area in logical pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// False for zero, negative or non-finite sizes, such as a minimized window.
    #[inline]
    pub fn has_area(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Width over height, or 1 when the viewport has no area.
    #[inline]
    pub fn aspect(self) -> f32 {
        if self.has_area() { self.width / self.height } else { 1.0 }
    }

    #[inline]
    pub fn size(self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}
