//! Screen-space geometry for the overlay and the face canvas.
//!
//! Logical pixels, origin top-left, +Y down. Points and sizes are
//! `glam::Vec2`, the same vector type the 3D card math uses.

mod rect;
mod viewport;

pub use glam::Vec2;
pub use rect::Rect;
pub use viewport::Viewport;
