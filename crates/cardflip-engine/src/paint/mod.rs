//! Colors and fills for the face rasterizer and the overlay.
//!
//! Colors are premultiplied and sRGB-encoded; see [`Color`].

pub mod color;
pub mod gradient;

pub use color::{Color, ColorParseError};
pub use gradient::{ColorStop, LinearGradient, SpreadMode};

use crate::coords::Vec2;

/// A fill evaluated per pixel by the CPU canvas.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Color),
    LinearGradient(LinearGradient),
}

impl Paint {
    /// Fill color at `p`, in the gradient's coordinate space.
    pub fn sample(&self, p: Vec2) -> Color {
        match self {
            Paint::Solid(c) => *c,
            Paint::LinearGradient(g) => g.sample(p),
        }
    }
}

impl From<Color> for Paint {
    fn from(c: Color) -> Self {
        Paint::Solid(c)
    }
}

impl From<LinearGradient> for Paint {
    fn from(g: LinearGradient) -> Self {
        Paint::LinearGradient(g)
    }
}
