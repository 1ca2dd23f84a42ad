//! wgpu device and window surface.
//!
//! [`Gpu`] is created once per window and borrows it for the surface's
//! lifetime. Frames are acquired with [`Gpu::begin_frame`] and handed back
//! through [`Gpu::present`].

mod gpu;
mod init;
mod surface;

pub use gpu::{Gpu, GpuFrame};
pub use init::GpuInit;
