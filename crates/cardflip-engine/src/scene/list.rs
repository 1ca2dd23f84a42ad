use crate::coords::{Rect, Vec2};
use crate::paint::Color;

use super::{Shape, ZIndex};

/// Shapes recorded for one frame.
///
/// Painting sorts in place with a stable sort, so the buffer is reused across
/// frames and equal layers keep push order.
#[derive(Debug, Default)]
pub struct DrawList {
    items: Vec<(ZIndex, Shape)>,
    sorted: bool,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every shape, keeping capacity.
    pub fn clear(&mut self) {
        self.items.clear();
        self.sorted = true;
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn push(&mut self, z: ZIndex, shape: Shape) {
        if self.items.last().is_some_and(|(last, _)| *last > z) {
            self.sorted = false;
        }
        self.items.push((z, shape));
    }

    pub fn push_rounded_rect(&mut self, z: ZIndex, rect: Rect, radius: f32, color: Color) {
        self.push(z, Shape::rounded_rect(rect, radius, color));
    }

    /// Records a round-capped line from `a` to `b`. Zero-length or zero-width
    /// strokes are dropped.
    pub fn push_stroke(&mut self, z: ZIndex, a: Vec2, b: Vec2, width: f32, color: Color) {
        let d = b - a;
        let len = d.length();
        if len <= f32::EPSILON || width <= 0.0 {
            return;
        }

        // Horizontal capsule over the midpoint, turned onto the segment.
        let mid = (a + b) * 0.5;
        let span = len + width;
        let rect = Rect::new(mid.x - span * 0.5, mid.y - width * 0.5, span, width);
        self.push(
            z,
            Shape {
                rect,
                radius: width * 0.5,
                color,
                rotation: d.y.atan2(d.x),
            },
        );
    }

    /// Shapes back to front.
    pub fn paint_order(&mut self) -> impl Iterator<Item = &Shape> {
        if !self.sorted {
            self.items.sort_by_key(|(z, _)| *z);
            self.sorted = true;
        }
        self.items.iter().map(|(_, s)| s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xs(list: &mut DrawList) -> Vec<f32> {
        list.paint_order().map(|s| s.rect.origin.x).collect()
    }

    #[test]
    fn layers_paint_back_to_front_in_push_order() {
        let mut list = DrawList::new();
        let r = |x| Rect::new(x, 0.0, 1.0, 1.0);
        list.push_rounded_rect(ZIndex::new(2), r(0.0), 0.0, Color::BLACK);
        list.push_rounded_rect(ZIndex::new(1), r(1.0), 0.0, Color::BLACK);
        list.push_rounded_rect(ZIndex::new(1), r(2.0), 0.0, Color::BLACK);
        assert_eq!(xs(&mut list), vec![1.0, 2.0, 0.0]);

        list.push_rounded_rect(ZIndex::new(1), r(3.0), 0.0, Color::BLACK);
        assert_eq!(xs(&mut list), vec![1.0, 2.0, 3.0, 0.0]);
    }

    #[test]
    fn clear_empties_the_list() {
        let mut list = DrawList::new();
        list.push_rounded_rect(ZIndex::new(0), Rect::new(5.0, 0.0, 1.0, 1.0), 0.0, Color::BLACK);
        list.clear();
        assert!(list.is_empty());
        assert!(xs(&mut list).is_empty());
    }

    #[test]
    fn vertical_stroke_is_a_turned_capsule() {
        let mut list = DrawList::new();
        list.push_stroke(ZIndex::new(0), Vec2::ZERO, Vec2::new(0.0, 10.0), 2.0, Color::BLACK);

        let shape = list.paint_order().next().copied().unwrap();
        assert!((shape.rotation - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        assert_eq!(shape.rect, Rect::new(-6.0, 4.0, 12.0, 2.0));
        assert_eq!(shape.radius, 1.0);
    }

    #[test]
    fn degenerate_stroke_is_dropped() {
        let mut list = DrawList::new();
        let p = Vec2::new(3.0, 3.0);
        list.push_stroke(ZIndex::new(0), p, p, 2.0, Color::BLACK);
        list.push_stroke(ZIndex::new(0), p, Vec2::new(9.0, 3.0), 0.0, Color::BLACK);
        assert!(list.is_empty());
    }
}
