//! Window, GPU and frame runtime under the cardflip carousel.
//!
//! Layers, bottom up: `coords`/`paint`/`text` are plain data and CPU code;
//! `device` and `render` talk to wgpu; `input`, `time` and `window` run the
//! winit loop; `core` is the contract an application implements to be hosted.

pub mod coords;
pub mod paint;
pub mod text;

pub mod device;
pub mod render;
pub mod scene;

pub mod core;
pub mod input;
pub mod logging;
pub mod time;
pub mod window;
