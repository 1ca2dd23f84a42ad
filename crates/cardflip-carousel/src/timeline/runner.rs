use std::time::Duration;

use super::step::{Animatable, Placed, Target, Timeline};

/// Handle to a timeline started on a [`TimelineRunner`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimelineId(u64);

#[derive(Debug)]
struct Track {
    placed: Placed,
    /// Value at the moment the track started; captured lazily so chained
    /// steps pick up where the previous one left off.
    from: Option<f32>,
    done: bool,
}

#[derive(Debug)]
struct Running {
    id: TimelineId,
    name: &'static str,
    start: Duration,
    end: Duration,
    tracks: Vec<Track>,
}

/// Plays timelines against one [`Animatable`] on an external clock.
///
/// The runner never reads a wall clock: callers pass the current time to
/// [`TimelineRunner::update`], which makes playback deterministic.
#[derive(Debug, Default)]
pub struct TimelineRunner {
    running: Vec<Running>,
    next_id: u64,
}

impl TimelineRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `timeline` to begin at `start`. Nothing is written before then.
    pub fn play(&mut self, timeline: &Timeline, start: Duration) -> TimelineId {
        let id = TimelineId(self.next_id);
        self.next_id += 1;

        let tracks = timeline
            .place()
            .into_iter()
            .map(|placed| Track { placed, from: None, done: false })
            .collect();

        log::trace!("timeline {} #{} scheduled at {:?}", timeline.name(), id.0, start);
        self.running.push(Running {
            id,
            name: timeline.name(),
            start,
            end: start + timeline.duration(),
            tracks,
        });
        id
    }

    /// Advances every timeline to `now`, writing into `obj`.
    ///
    /// Returns the ids of timelines that finished, in the order they finished.
    pub fn update(&mut self, now: Duration, obj: &mut impl Animatable) -> Vec<TimelineId> {
        for tl in &mut self.running {
            if now < tl.start {
                continue;
            }
            let local = now - tl.start;

            for track in tl.tracks.iter_mut().filter(|t| !t.done) {
                let p = track.placed;
                if local < p.start {
                    continue;
                }

                let from = *track.from.get_or_insert_with(|| obj.get(p.prop));
                let progress = if p.duration.is_zero() {
                    1.0
                } else {
                    ((local - p.start).as_secs_f32() / p.duration.as_secs_f32()).min(1.0)
                };

                if progress >= 1.0 {
                    obj.set(p.prop, p.to);
                    track.done = true;
                } else {
                    obj.set(p.prop, from + (p.to - from) * p.easing.evaluate(progress));
                }
            }
        }

        let mut finished: Vec<(Duration, TimelineId)> = Vec::new();
        self.running.retain(|tl| {
            let done = now >= tl.end && tl.tracks.iter().all(|t| t.done);
            if done {
                log::trace!("timeline {} #{} finished", tl.name, tl.id.0);
                finished.push((tl.end, tl.id));
            }
            !done
        });
        finished.sort();
        finished.into_iter().map(|(_, id)| id).collect()
    }

    /// Earliest time a running timeline will finish.
    pub fn next_completion(&self) -> Option<Duration> {
        self.running.iter().map(|tl| tl.end).min()
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        self.running.is_empty()
    }

    /// Cancels every track that animates `target`. Timelines left with no
    /// tracks are dropped without completing. Returns how many were dropped.
    pub fn kill(&mut self, target: Target) -> usize {
        for tl in &mut self.running {
            tl.tracks.retain(|t| !t.placed.prop.belongs_to(target));
        }
        let before = self.running.len();
        self.running.retain(|tl| !tl.tracks.is_empty());
        before - self.running.len()
    }

    /// Cancels everything. Returns how many timelines were dropped.
    pub fn kill_all(&mut self) -> usize {
        let n = self.running.len();
        self.running.clear();
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Face;
    use crate::timeline::step::{Axis, Property, Step};
    use crate::timeline::Easing;
    use std::collections::HashMap;

    #[derive(Default)]
    struct Subject(HashMap<Property, f32>);

    impl Animatable for Subject {
        fn get(&self, prop: Property) -> f32 {
            self.0.get(&prop).copied().unwrap_or(0.0)
        }
        fn set(&mut self, prop: Property, value: f32) {
            self.0.insert(prop, value);
        }
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn interpolates_and_completes_exactly_once() {
        let tl = Timeline::new("slide").then(Step::translate(Axis::X, 10.0, ms(1000), Easing::Linear));
        let mut runner = TimelineRunner::new();
        let mut obj = Subject::default();
        let id = runner.play(&tl, ms(100));

        assert!(runner.update(ms(50), &mut obj).is_empty());
        assert_eq!(obj.get(Property::Position(Axis::X)), 0.0);

        assert!(runner.update(ms(600), &mut obj).is_empty());
        assert!((obj.get(Property::Position(Axis::X)) - 5.0).abs() < 1e-4);

        assert_eq!(runner.next_completion(), Some(ms(1100)));
        assert_eq!(runner.update(ms(1100), &mut obj), vec![id]);
        assert_eq!(obj.get(Property::Position(Axis::X)), 10.0);
        assert!(runner.update(ms(2000), &mut obj).is_empty());
        assert!(runner.is_idle());
    }

    #[test]
    fn later_track_starts_from_current_value() {
        let tl = Timeline::new("tilt")
            .then(Step::rotate(Axis::X, 1.0, ms(1000), Easing::Linear))
            .then(Step::rotate(Axis::X, 0.0, ms(500), Easing::Linear).at(ms(500)));
        let mut runner = TimelineRunner::new();
        let mut obj = Subject::default();
        runner.play(&tl, Duration::ZERO);

        runner.update(ms(500), &mut obj);
        let v = obj.get(Property::Rotation(Axis::X));
        assert!((v - 0.5).abs() < 1e-4, "{v}");

        runner.update(ms(1000), &mut obj);
        assert_eq!(obj.get(Property::Rotation(Axis::X)), 0.0);
    }

    #[test]
    fn set_steps_apply_at_start() {
        let tl = Timeline::new("enter")
            .then(Step::set(crate::timeline::StepKind::Translate { axis: Axis::X, to: -10.0 }))
            .then(Step::translate(Axis::X, 0.0, ms(100), Easing::Linear));
        let mut runner = TimelineRunner::new();
        let mut obj = Subject::default();
        obj.set(Property::Position(Axis::X), 3.0);
        runner.play(&tl, ms(10));

        runner.update(ms(10), &mut obj);
        assert_eq!(obj.get(Property::Position(Axis::X)), -10.0);
        runner.update(ms(60), &mut obj);
        assert!((obj.get(Property::Position(Axis::X)) + 5.0).abs() < 1e-4);
    }

    #[test]
    fn killing_a_target_leaves_other_tracks_running() {
        let tl = Timeline::new("exit")
            .then(Step::translate(Axis::X, 10.0, ms(100), Easing::Linear))
            .then(Step::fade(crate::timeline::Target::Faces, 0.0, ms(100), Easing::Linear).with_previous());
        let mut runner = TimelineRunner::new();
        let mut obj = Subject::default();
        obj.set(Property::Opacity(Face::Front), 1.0);
        let id = runner.play(&tl, Duration::ZERO);

        assert_eq!(runner.kill(Target::Faces), 0);
        assert_eq!(runner.update(ms(100), &mut obj), vec![id]);
        assert_eq!(obj.get(Property::Opacity(Face::Front)), 1.0);
        assert_eq!(obj.get(Property::Position(Axis::X)), 10.0);
    }

    #[test]
    fn killing_the_group_stops_its_fades() {
        let tl = Timeline::new("fade").then(Step::fade(Target::Group, 0.0, ms(100), Easing::Linear));
        let mut runner = TimelineRunner::new();
        let mut obj = Subject::default();
        obj.set(Property::Opacity(Face::Back), 1.0);
        runner.play(&tl, Duration::ZERO);

        assert_eq!(runner.kill(Target::Group), 1);
        assert!(runner.update(ms(200), &mut obj).is_empty());
        assert_eq!(obj.get(Property::Opacity(Face::Back)), 1.0);
        assert!(runner.is_idle());
    }

    #[test]
    fn killed_timelines_never_complete() {
        let tl = Timeline::new("flip").then(Step::rotate(Axis::Y, 3.0, ms(100), Easing::Linear));
        let mut runner = TimelineRunner::new();
        let mut obj = Subject::default();
        runner.play(&tl, Duration::ZERO);
        runner.play(&tl, ms(50));

        assert_eq!(runner.kill_all(), 2);
        assert!(runner.update(ms(500), &mut obj).is_empty());
        assert_eq!(obj.get(Property::Rotation(Axis::Y)), 0.0);
        assert_eq!(runner.next_completion(), None);
    }

    #[test]
    fn completions_are_reported_in_end_order() {
        let long = Timeline::new("long").then(Step::translate(Axis::X, 1.0, ms(300), Easing::Linear));
        let short = Timeline::new("short").then(Step::translate(Axis::Y, 1.0, ms(100), Easing::Linear));
        let mut runner = TimelineRunner::new();
        let mut obj = Subject::default();
        let a = runner.play(&long, Duration::ZERO);
        let b = runner.play(&short, Duration::ZERO);

        assert_eq!(runner.update(ms(400), &mut obj), vec![b, a]);
    }
}
