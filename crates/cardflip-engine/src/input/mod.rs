//! Window input, reduced to what the carousel reacts to.
//!
//! The runtime translates window-system events into [`InputEvent`]s and
//! feeds them to an [`InputState`], which records each frame's events into
//! an [`InputFrame`]. Positions are logical pixels, top-left origin.

mod event;
mod frame;
pub(crate) mod platform;
mod state;

pub use event::{Button, InputEvent, Key, Press};
pub use frame::InputFrame;
pub use state::InputState;
