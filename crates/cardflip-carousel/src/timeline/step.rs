use std::time::Duration;

use crate::card::Face;

use super::Easing;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// Which part of a card a step animates.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Target {
    /// The whole card: transform and both face materials.
    Group,
    /// One face's material.
    Face(Face),
    /// Both face materials.
    Faces,
}

impl Target {
    fn covers(self, prop: Property) -> bool {
        match (self, prop) {
            (Target::Group, _) => true,
            (Target::Face(f), Property::Opacity(g)) => f == g,
            (Target::Faces, Property::Opacity(_)) => true,
            _ => false,
        }
    }
}

/// A single scalar a timeline can drive.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Property {
    Position(Axis),
    Rotation(Axis),
    Opacity(Face),
}

impl Property {
    /// True when killing `target` cancels tracks on this property.
    pub fn belongs_to(self, target: Target) -> bool {
        target.covers(self)
    }
}

/// Something timelines can animate.
pub trait Animatable {
    fn get(&self, prop: Property) -> f32;
    fn set(&mut self, prop: Property, value: f32);
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum StepKind {
    Translate { axis: Axis, to: f32 },
    Rotate { axis: Axis, to: f32 },
    FadeOpacity { target: Target, to: f32 },
}

/// Where a step starts relative to the ones declared before it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Offset {
    /// When everything declared so far has finished.
    Sequential,
    /// Together with the previous step.
    WithPrevious,
    /// At a fixed time from the timeline start.
    At(Duration),
    /// This long before everything declared so far has finished.
    Overlap(Duration),
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Step {
    pub kind: StepKind,
    /// Zero makes the step an instant set.
    pub duration: Duration,
    pub easing: Easing,
    pub offset: Offset,
}

impl Step {
    pub fn translate(axis: Axis, to: f32, duration: Duration, easing: Easing) -> Self {
        Self::new(StepKind::Translate { axis, to }, duration, easing)
    }

    pub fn rotate(axis: Axis, to: f32, duration: Duration, easing: Easing) -> Self {
        Self::new(StepKind::Rotate { axis, to }, duration, easing)
    }

    pub fn fade(target: Target, to: f32, duration: Duration, easing: Easing) -> Self {
        Self::new(StepKind::FadeOpacity { target, to }, duration, easing)
    }

    /// Instant assignment of a group property.
    pub fn set(kind: StepKind) -> Self {
        Self::new(kind, Duration::ZERO, Easing::Linear)
    }

    fn new(kind: StepKind, duration: Duration, easing: Easing) -> Self {
        Self { kind, duration, easing, offset: Offset::Sequential }
    }

    pub fn with_previous(mut self) -> Self {
        self.offset = Offset::WithPrevious;
        self
    }

    pub fn at(mut self, t: Duration) -> Self {
        self.offset = Offset::At(t);
        self
    }

    pub fn overlapping(mut self, d: Duration) -> Self {
        self.offset = Offset::Overlap(d);
        self
    }

    /// Properties this step writes, with their target values.
    pub(super) fn writes(&self) -> Vec<(Property, f32)> {
        match self.kind {
            StepKind::Translate { axis, to } => vec![(Property::Position(axis), to)],
            StepKind::Rotate { axis, to } => vec![(Property::Rotation(axis), to)],
            StepKind::FadeOpacity { target, to } => match target {
                Target::Face(f) => vec![(Property::Opacity(f), to)],
                Target::Faces | Target::Group => {
                    Face::BOTH.iter().map(|&f| (Property::Opacity(f), to)).collect()
                }
            },
        }
    }
}

/// An ordered composition of steps.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    name: &'static str,
    steps: Vec<Step>,
}

/// A step placed on the timeline's own clock.
#[derive(Debug, Copy, Clone, PartialEq)]
pub(super) struct Placed {
    pub prop: Property,
    pub to: f32,
    pub start: Duration,
    pub duration: Duration,
    pub easing: Easing,
}

impl Timeline {
    pub fn new(name: &'static str) -> Self {
        Self { name, steps: Vec::new() }
    }

    pub fn then(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Total length: the latest end of any step.
    pub fn duration(&self) -> Duration {
        self.place().iter().map(|p| p.start + p.duration).max().unwrap_or_default()
    }

    /// Resolves offsets into absolute start times, in declaration order.
    pub(super) fn place(&self) -> Vec<Placed> {
        let mut out = Vec::new();
        let mut end = Duration::ZERO;
        let mut prev_start = Duration::ZERO;

        for step in &self.steps {
            let start = match step.offset {
                Offset::Sequential => end,
                Offset::WithPrevious => prev_start,
                Offset::At(t) => t,
                Offset::Overlap(d) => end.saturating_sub(d),
            };
            for (prop, to) in step.writes() {
                out.push(Placed { prop, to, start, duration: step.duration, easing: step.easing });
            }
            prev_start = start;
            end = end.max(start + step.duration);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn offsets_resolve_against_the_running_end() {
        let tl = Timeline::new("t")
            .then(Step::translate(Axis::X, 1.0, ms(800), Easing::Linear))
            .then(Step::translate(Axis::Z, 1.0, ms(200), Easing::Linear).with_previous())
            .then(Step::rotate(Axis::Y, 1.0, ms(400), Easing::Linear).overlapping(ms(300)))
            .then(Step::rotate(Axis::X, 1.0, ms(100), Easing::Linear))
            .then(Step::rotate(Axis::X, 0.0, ms(100), Easing::Linear).at(ms(50)));

        let starts: Vec<_> = tl.place().iter().map(|p| p.start).collect();
        assert_eq!(starts, vec![ms(0), ms(0), ms(500), ms(900), ms(50)]);
        assert_eq!(tl.duration(), ms(1000));
    }

    #[test]
    fn fading_both_faces_writes_two_properties() {
        let step = Step::fade(Target::Faces, 0.0, ms(10), Easing::Linear);
        let props: Vec<_> = step.writes().into_iter().map(|(p, _)| p).collect();
        assert_eq!(props, vec![Property::Opacity(Face::Front), Property::Opacity(Face::Back)]);
    }

    #[test]
    fn targets_select_their_properties() {
        assert!(Property::Rotation(Axis::Y).belongs_to(Target::Group));
        assert!(Property::Opacity(Face::Back).belongs_to(Target::Group));
        assert!(!Property::Rotation(Axis::Y).belongs_to(Target::Faces));
        assert!(Property::Opacity(Face::Back).belongs_to(Target::Faces));
        assert!(!Property::Opacity(Face::Back).belongs_to(Target::Face(Face::Front)));
    }

    #[test]
    fn a_group_fade_writes_only_what_group_kills_cover() {
        let step = Step::fade(Target::Group, 0.0, ms(10), Easing::Linear);
        assert!(step.writes().iter().all(|&(p, _)| p.belongs_to(Target::Group)));
    }

    #[test]
    fn empty_timeline_has_zero_length() {
        assert_eq!(Timeline::new("empty").duration(), Duration::ZERO);
    }
}
