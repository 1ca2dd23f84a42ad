//! Screen-space overlay shapes.
//!
//! A [`DrawList`] is rebuilt every frame from UI state and handed to the
//! overlay renderer. Shapes paint back to front by [`ZIndex`]; shapes on the
//! same layer keep the order they were pushed in.

mod list;
mod shape;

pub use list::DrawList;
pub use shape::{Shape, ZIndex};
