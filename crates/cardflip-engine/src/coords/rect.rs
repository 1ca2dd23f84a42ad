use super::Vec2;

/// Axis-aligned rectangle; `origin` is the top-left corner.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { origin: Vec2::new(x, y), size: Vec2::new(w, h) }
    }

    /// Rectangle spanning two opposite corners, in any order.
    #[inline]
    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        let min = a.min(b);
        Self { origin: min, size: a.max(b) - min }
    }

    #[inline]
    pub fn min(self) -> Vec2 {
        self.origin
    }

    #[inline]
    pub fn max(self) -> Vec2 {
        self.origin + self.size
    }

    #[inline]
    pub fn center(self) -> Vec2 {
        self.origin + self.size * 0.5
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    /// Same area with non-negative width and height.
    #[inline]
    pub fn normalized(self) -> Self {
        Self::from_corners(self.origin, self.origin + self.size)
    }

    /// Half-open: the top and left edges are inside, bottom and right are not.
    #[inline]
    pub fn contains(self, p: Vec2) -> bool {
        let r = self.normalized();
        let max = r.max();
        p.x >= r.origin.x && p.y >= r.origin.y && p.x < max.x && p.y < max.y
    }

    /// Moves every edge inward by `d`. Collapses onto the center rather than
    /// turning inside out.
    #[inline]
    pub fn inset(self, d: f32) -> Self {
        let r = self.normalized();
        let d = d.min(r.size.x * 0.5).min(r.size.y * 0.5);
        Self { origin: r.origin + Vec2::splat(d), size: r.size - Vec2::splat(2.0 * d) }
    }

    #[inline]
    pub fn translate(self, offset: Vec2) -> Self {
        Self { origin: self.origin + offset, size: self.size }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_in_any_order_give_the_same_rect() {
        let a = Rect::from_corners(Vec2::new(10.0, 2.0), Vec2::new(4.0, 8.0));
        assert_eq!(a, Rect::new(4.0, 2.0, 6.0, 6.0));
        assert_eq!(Rect::new(10.0, 8.0, -6.0, -6.0).normalized(), a);
    }

    #[test]
    fn containment_is_half_open() {
        let r = Rect::new(0.0, 0.0, 10.0, 5.0);
        assert!(r.contains(Vec2::new(0.0, 0.0)));
        assert!(r.contains(Vec2::new(9.99, 4.99)));
        assert!(!r.contains(Vec2::new(10.0, 2.0)));
        assert!(!r.contains(Vec2::new(2.0, 5.0)));
    }

    #[test]
    fn inset_shrinks_and_clamps() {
        let r = Rect::new(0.0, 0.0, 100.0, 40.0);
        assert_eq!(r.inset(12.0), Rect::new(12.0, 12.0, 76.0, 16.0));

        let collapsed = r.inset(50.0);
        assert_eq!(collapsed.size.y, 0.0);
        assert_eq!(collapsed.center(), r.center());
        assert!(collapsed.is_empty());
    }

    #[test]
    fn translate_keeps_size() {
        let r = Rect::new(1.0, 2.0, 3.0, 4.0).translate(Vec2::new(0.0, 4.0));
        assert_eq!(r, Rect::new(1.0, 6.0, 3.0, 4.0));
        assert_eq!(r.max(), Vec2::new(4.0, 10.0));
    }
}
