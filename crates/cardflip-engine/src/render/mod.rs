//! GPU rendering.
//!
//! Each renderer owns its pipelines and buffers and creates them lazily from
//! the [`RenderCtx`] it is first drawn with.
//!
//! - [`OverlayRenderer`]: 2D shapes in logical pixels, top-left origin, +Y down
//! - [`CardRenderer`]: textured card faces in world units behind a camera

pub mod card;
mod common;
mod ctx;
mod overlay;

pub use card::{CardRenderer, FaceDraw, GpuImage, Lighting};
pub use ctx::{RenderCtx, RenderTarget};
pub use overlay::OverlayRenderer;
