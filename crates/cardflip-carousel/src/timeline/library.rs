//! The card animations, built from configuration.

use std::f32::consts::PI;
use std::time::Duration;

use crate::config::{CarouselConfig, SlotPosition};

use super::step::{Axis, Step, StepKind, Target, Timeline};
use super::Easing;

/// Horizontal side a card leaves toward or arrives from.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// Forward push of the card while it turns.
const FLIP_LIFT: f32 = 0.5;
/// Small X tilt that makes the turn read as 3D.
const FLIP_TILT: f32 = 0.05;

#[derive(Debug, Clone)]
pub struct TimelineLibrary {
    flip: Duration,
    tilt_reset: Duration,
    slide: Duration,
    center: SlotPosition,
    hidden_left: SlotPosition,
    hidden_right: SlotPosition,
}

impl TimelineLibrary {
    pub fn new(config: &CarouselConfig) -> Self {
        Self {
            flip: config.flip_duration(),
            tilt_reset: config.flip_tilt_reset(),
            slide: config.slide_duration(),
            center: config.center,
            hidden_left: config.hidden_left,
            hidden_right: config.hidden_right,
        }
    }

    pub fn hidden(&self, side: Side) -> SlotPosition {
        match side {
            Side::Left => self.hidden_left,
            Side::Right => self.hidden_right,
        }
    }

    #[inline]
    pub fn center(&self) -> SlotPosition {
        self.center
    }

    /// Half turn about Y with a forward lift and a tilt that settles at the end.
    pub fn flip(&self) -> Timeline {
        let half = self.flip / 2;
        Timeline::new("flip")
            .then(Step::rotate(Axis::Y, PI, self.flip, Easing::POWER3_IN_OUT))
            .then(Step::rotate(Axis::X, FLIP_TILT, self.flip, Easing::POWER3_IN_OUT).with_previous())
            .then(Step::translate(Axis::Z, self.center.z + FLIP_LIFT, half, Easing::POWER2_OUT).at(Duration::ZERO))
            .then(Step::translate(Axis::Z, self.center.z, self.flip - half, Easing::POWER2_IN).at(half))
            .then(
                Step::rotate(Axis::X, 0.0, self.tilt_reset, Easing::POWER2_OUT)
                    .at(self.flip - self.tilt_reset),
            )
    }

    /// Slides the card off toward `side` while fading both faces out.
    pub fn slide_out(&self, side: Side) -> Timeline {
        let to = self.hidden(side);
        Timeline::new("slide-out")
            .then(Step::translate(Axis::X, to.x, self.slide, Easing::POWER2_IN))
            .then(Step::translate(Axis::Z, to.z, self.slide, Easing::POWER2_IN).with_previous())
            .then(Step::fade(Target::Faces, 0.0, self.slide, Easing::POWER2_IN).with_previous())
    }

    /// Resets the card at the hidden slot on `side`, then slides it to the
    /// centre while fading in.
    pub fn slide_in(&self, side: Side) -> Timeline {
        let from = self.hidden(side);
        Timeline::new("slide-in")
            .then(Step::set(StepKind::Translate { axis: Axis::X, to: from.x }))
            .then(Step::set(StepKind::Translate { axis: Axis::Z, to: from.z }))
            .then(Step::set(StepKind::Rotate { axis: Axis::X, to: 0.0 }))
            .then(Step::set(StepKind::Rotate { axis: Axis::Y, to: 0.0 }))
            .then(Step::set(StepKind::FadeOpacity { target: Target::Faces, to: 0.0 }))
            .then(Step::translate(Axis::X, self.center.x, self.slide, Easing::POWER2_OUT))
            .then(Step::translate(Axis::Z, self.center.z, self.slide, Easing::POWER2_OUT).with_previous())
            .then(Step::fade(Target::Faces, 1.0, self.slide, Easing::POWER2_OUT).with_previous())
    }
}
