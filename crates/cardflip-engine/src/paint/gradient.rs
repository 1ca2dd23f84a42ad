use crate::coords::Vec2;

use super::Color;

/// Gradient spread behavior outside [0, 1] range.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SpreadMode {
    /// Clamp to edge stops.
    Pad,
    /// Repeat the gradient pattern.
    Repeat,
    /// Mirror-repeat the gradient pattern.
    Reflect,
}

/// A single gradient stop.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ColorStop {
    pub t: f32,
    pub color: Color,
}

impl ColorStop {
    #[inline]
    pub const fn new(t: f32, color: Color) -> Self {
        Self { t, color }
    }
}

/// Linear gradient definition in the coordinate space of the geometry it fills.
///
/// Stops are expected sorted by `t`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    pub start: Vec2,
    pub end: Vec2,
    pub stops: Vec<ColorStop>,
    pub spread: SpreadMode,
}

impl LinearGradient {
    pub fn new(start: Vec2, end: Vec2, stops: Vec<ColorStop>, spread: SpreadMode) -> Self {
        Self {
            start,
            end,
            stops,
            spread,
        }
    }

    /// Two-stop padded gradient from `c0` at `start` to `c1` at `end`.
    pub fn two_stop(start: Vec2, end: Vec2, c0: Color, c1: Color) -> Self {
        Self::new(
            start,
            end,
            vec![ColorStop::new(0.0, c0), ColorStop::new(1.0, c1)],
            SpreadMode::Pad,
        )
    }

    /// Projects `p` onto the gradient axis and returns the interpolated color.
    pub fn sample(&self, p: Vec2) -> Color {
        let (Some(first), Some(last)) = (self.stops.first(), self.stops.last()) else {
            return Color::transparent();
        };

        let axis = self.end - self.start;
        let len2 = axis.length_squared();
        if len2 <= f32::EPSILON {
            return first.color;
        }

        let t = self.spread_t((p - self.start).dot(axis) / len2);

        if t <= first.t {
            return first.color;
        }
        if t >= last.t {
            return last.color;
        }

        for pair in self.stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t <= b.t {
                let span = b.t - a.t;
                if span <= f32::EPSILON {
                    return b.color;
                }
                return a.color.lerp(b.color, (t - a.t) / span);
            }
        }

        last.color
    }

    fn spread_t(&self, t: f32) -> f32 {
        match self.spread {
            SpreadMode::Pad => t.clamp(0.0, 1.0),
            SpreadMode::Repeat => t.rem_euclid(1.0),
            SpreadMode::Reflect => {
                let m = t.rem_euclid(2.0);
                if m > 1.0 { 2.0 - m } else { m }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bw() -> LinearGradient {
        LinearGradient::two_stop(
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, 100.0),
            Color::BLACK,
            Color::WHITE,
        )
    }

    #[test]
    fn vertical_gradient_interpolates_along_y() {
        let g = bw();
        assert_eq!(g.sample(Vec2::new(37.0, 0.0)), Color::BLACK);
        assert_eq!(g.sample(Vec2::new(0.0, 100.0)), Color::WHITE);
        let mid = g.sample(Vec2::new(5.0, 50.0));
        assert!((mid.r - 0.5).abs() < 1e-5);
    }

    #[test]
    fn pad_clamps_outside_range() {
        let g = bw();
        assert_eq!(g.sample(Vec2::new(0.0, -40.0)), Color::BLACK);
        assert_eq!(g.sample(Vec2::new(0.0, 400.0)), Color::WHITE);
    }

    #[test]
    fn three_stops_pick_the_right_segment() {
        let g = LinearGradient::new(
            Vec2::new(0.0, 0.0),
            Vec2::new(100.0, 0.0),
            vec![
                ColorStop::new(0.0, Color::BLACK),
                ColorStop::new(0.5, Color::WHITE),
                ColorStop::new(1.0, Color::BLACK),
            ],
            SpreadMode::Pad,
        );
        assert_eq!(g.sample(Vec2::new(50.0, 0.0)), Color::WHITE);
        let q = g.sample(Vec2::new(75.0, 0.0));
        assert!((q.r - 0.5).abs() < 1e-5);
    }

    #[test]
    fn reflect_mirrors_past_the_end() {
        let mut g = bw();
        g.spread = SpreadMode::Reflect;
        let a = g.sample(Vec2::new(0.0, 25.0));
        let b = g.sample(Vec2::new(0.0, 175.0));
        assert!((a.r - b.r).abs() < 1e-5);
    }
}
