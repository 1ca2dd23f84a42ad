//! Easing curves for timeline steps.

/// Easing curve for a single animated step.
///
/// The power family follows the common animation-library naming: `power1` is
/// quadratic, `power2` cubic, `power3` quartic. The stored value is that
/// power index, so the polynomial degree is `power + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    Linear,
    /// Slow start, fast end.
    PowerIn(u8),
    /// Fast start, slow end.
    PowerOut(u8),
    /// Slow at both ends, symmetric about `t = 0.5`.
    PowerInOut(u8),
}

impl Easing {
    pub const POWER2_IN: Easing = Easing::PowerIn(2);
    pub const POWER2_OUT: Easing = Easing::PowerOut(2);
    pub const POWER3_IN_OUT: Easing = Easing::PowerInOut(3);

    /// Evaluates the curve at `t`.
    ///
    /// Input is clamped to [0.0, 1.0]; output is 0 at 0 and 1 at 1.
    #[inline]
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match *self {
            Easing::Linear => t,
            Easing::PowerIn(p) => t.powi(degree(p)),
            Easing::PowerOut(p) => 1.0 - (1.0 - t).powi(degree(p)),
            Easing::PowerInOut(p) => {
                let d = degree(p);
                if t < 0.5 {
                    (2.0 * t).powi(d) * 0.5
                } else {
                    1.0 - (2.0 * (1.0 - t)).powi(d) * 0.5
                }
            }
        }
    }
}

impl Default for Easing {
    #[inline]
    fn default() -> Self {
        Self::Linear
    }
}

#[inline]
fn degree(power: u8) -> i32 {
    i32::from(power) + 1
}
