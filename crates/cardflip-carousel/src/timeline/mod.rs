//! Animation timelines.
//!
//! A [`Timeline`] is an ordered list of tagged steps (translate, rotate,
//! fade), each with a duration, an easing curve and an offset that places it
//! after, alongside or overlapping the steps before it. A [`TimelineRunner`]
//! plays timelines against an [`Animatable`] on an explicit clock and can kill
//! everything aimed at a given [`Target`].

mod easing;
mod library;
mod runner;
mod step;

pub use easing::Easing;
pub use library::{Side, TimelineLibrary};
pub use runner::{TimelineId, TimelineRunner};
pub use step::{Animatable, Axis, Offset, Property, Step, StepKind, Target, Timeline};
