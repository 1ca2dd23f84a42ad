//! One card: its 3D object and its visual-state machine.
//!
//! ```text
//! Hidden ─begin_entry─▶ EnteringFromSide ─slide-in done─▶ ActiveFront
//!    ▲                                                      │ pre-flip dwell
//!    │                                                      ▼
//! ExitingToSide ◀─begin_exit─ ActiveBack ◀─flip done─ Flipping
//!    └──slide-out done──▶ Hidden
//! ```
//!
//! Only the orchestrator starts an entry or an exit; the dwell and the flip
//! are driven by the controller itself. Every callback is keyed by the id of
//! the timeline that produced it, so a completion from a killed or replaced
//! timeline is dropped instead of acting on the card.

use std::f32::consts::PI;
use std::time::Duration;

use glam::{EulerRot, Mat4, Quat, Vec3};

use cardflip_engine::render::{CardRenderer, FaceDraw, GpuImage, RenderCtx};

use crate::card::Face;
use crate::config::CarouselConfig;
use crate::texture::{CardFaces, FaceImage};
use crate::timeline::{Animatable, Property, Side, TimelineId, TimelineLibrary, TimelineRunner};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum CardVisualState {
    Hidden,
    EnteringFromSide,
    ActiveFront,
    Flipping,
    ActiveBack,
    ExitingToSide,
}

impl CardVisualState {
    /// Whether this card occupies the active slot.
    pub fn is_active(self) -> bool {
        matches!(
            self,
            CardVisualState::ActiveFront | CardVisualState::Flipping | CardVisualState::ActiveBack
        )
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CardEvent {
    EntryComplete,
    /// Sent once per entry, when the back face has turned fully up.
    FlipComplete,
    Exited,
}

/// A [`CardEvent`] stamped with the instant it happened.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CardNotice {
    pub at: Duration,
    pub event: CardEvent,
}

/// Animated pose of a card group and the opacity of its two face materials.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CardTransform {
    pub position: Vec3,
    /// Euler angles in radians, applied X then Y then Z.
    pub rotation: Vec3,
    pub opacity: [f32; 2],
}

impl CardTransform {
    fn hidden_at(x: f32, z: f32) -> Self {
        Self {
            position: Vec3::new(x, 0.0, z),
            rotation: Vec3::ZERO,
            opacity: [0.0; 2],
        }
    }

    pub fn model(&self) -> Mat4 {
        let r = self.rotation;
        Mat4::from_rotation_translation(Quat::from_euler(EulerRot::XYZ, r.x, r.y, r.z), self.position)
    }

    /// Which face points toward +Z, where the camera sits.
    pub fn facing(&self) -> Face {
        let turn = self.rotation.y.rem_euclid(2.0 * PI);
        if turn > PI * 0.5 && turn < PI * 1.5 { Face::Back } else { Face::Front }
    }
}

impl Animatable for CardTransform {
    fn get(&self, prop: Property) -> f32 {
        match prop {
            Property::Position(a) => self.position[a.index()],
            Property::Rotation(a) => self.rotation[a.index()],
            Property::Opacity(f) => self.opacity[f.index()],
        }
    }

    fn set(&mut self, prop: Property, value: f32) {
        match prop {
            Property::Position(a) => self.position[a.index()] = value,
            Property::Rotation(a) => self.rotation[a.index()] = value,
            Property::Opacity(f) => self.opacity[f.index()] = value.clamp(0.0, 1.0),
        }
    }
}

/// A face image and, once uploaded, its GPU copy.
#[derive(Debug)]
pub struct FaceSlot {
    image: FaceImage,
    gpu: Option<GpuImage>,
}

impl FaceSlot {
    fn new(image: FaceImage) -> Self {
        Self { image, gpu: None }
    }

    #[inline]
    pub fn image(&self) -> &FaceImage {
        &self.image
    }

    #[inline]
    pub fn is_uploaded(&self) -> bool {
        self.gpu.is_some()
    }
}

/// The renderable card group owned by a controller.
#[derive(Debug)]
pub struct CardObject {
    pub transform: CardTransform,
    faces: [FaceSlot; 2],
    size: (f32, f32),
    face_offset: f32,
}

impl CardObject {
    fn new(faces: CardFaces, config: &CarouselConfig) -> Self {
        let rest = config.hidden_right;
        Self {
            transform: CardTransform::hidden_at(rest.x, rest.z),
            faces: [FaceSlot::new(faces.front), FaceSlot::new(faces.back)],
            size: (config.card_width, config.card_height),
            face_offset: config.face_offset,
        }
    }

    #[inline]
    pub fn face(&self, face: Face) -> &FaceSlot {
        &self.faces[face.index()]
    }

    /// World matrix mapping the unit quad onto `face`.
    ///
    /// The back quad is turned half a revolution so it faces -Z in card space.
    pub fn face_model(&self, face: Face) -> Mat4 {
        let (w, h) = self.size;
        let local = match face {
            Face::Front => Mat4::from_translation(Vec3::new(0.0, 0.0, self.face_offset)),
            Face::Back => {
                Mat4::from_translation(Vec3::new(0.0, 0.0, -self.face_offset))
                    * Mat4::from_rotation_y(PI)
            }
        };
        self.transform.model() * local * Mat4::from_scale(Vec3::new(w, h, 1.0))
    }

    /// Frees GPU copies. Returns how many were released.
    fn release_gpu(&mut self) -> usize {
        let mut n = 0;
        for slot in &mut self.faces {
            if let Some(img) = slot.gpu.take() {
                img.destroy();
                n += 1;
            }
        }
        n
    }
}

/// What [`CardController::dispose`] released.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct DisposeReport {
    pub timelines_killed: usize,
    pub timers_cancelled: usize,
    pub gpu_textures_released: usize,
    pub face_images_released: usize,
}

pub struct CardController {
    id: String,
    state: CardVisualState,
    object: Option<CardObject>,
    runner: TimelineRunner,
    library: TimelineLibrary,
    pre_flip_dwell: Duration,
    rest: (f32, f32),

    entry: Option<TimelineId>,
    flip: Option<TimelineId>,
    exit: Option<TimelineId>,
    dwell_until: Option<Duration>,
    flip_reported: bool,
}

impl CardController {
    pub fn new(id: impl Into<String>, faces: CardFaces, config: &CarouselConfig) -> Self {
        Self {
            id: id.into(),
            state: CardVisualState::Hidden,
            object: Some(CardObject::new(faces, config)),
            runner: TimelineRunner::new(),
            library: TimelineLibrary::new(config),
            pre_flip_dwell: config.pre_flip_dwell(),
            rest: (config.hidden_right.x, config.hidden_right.z),
            entry: None,
            flip: None,
            exit: None,
            dwell_until: None,
            flip_reported: false,
        }
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    pub fn state(&self) -> CardVisualState {
        self.state
    }

    /// `None` once disposed.
    #[inline]
    pub fn object(&self) -> Option<&CardObject> {
        self.object.as_ref()
    }

    #[inline]
    pub fn is_disposed(&self) -> bool {
        self.object.is_none()
    }

    /// Whether any part of the card would show up on screen.
    pub fn is_visible(&self) -> bool {
        self.state != CardVisualState::Hidden
            && self
                .object
                .as_ref()
                .is_some_and(|o| o.transform.opacity.iter().any(|&a| a > 0.0))
    }

    /// Starts sliding in from `side`, `delay` after `now`.
    ///
    /// Only a hidden, live card can enter; otherwise this does nothing and
    /// returns `false`.
    pub fn begin_entry(&mut self, now: Duration, delay: Duration, side: Side) -> bool {
        if self.object.is_none() || self.state != CardVisualState::Hidden {
            log::trace!("card {}: entry refused in {:?}", self.id, self.state);
            return false;
        }

        self.runner.kill_all();
        self.clear_phase();
        self.state = CardVisualState::EnteringFromSide;
        self.entry = Some(self.runner.play(&self.library.slide_in(side), now + delay));
        log::debug!("card {}: entering from {side:?} at {:?}", self.id, now + delay);
        true
    }

    /// Cancels the dwell and any flip, then slides out toward `side`.
    pub fn begin_exit(&mut self, now: Duration, side: Side) -> bool {
        if self.object.is_none()
            || matches!(self.state, CardVisualState::Hidden | CardVisualState::ExitingToSide)
        {
            log::trace!("card {}: exit refused in {:?}", self.id, self.state);
            return false;
        }

        self.runner.kill_all();
        self.clear_phase();
        self.state = CardVisualState::ExitingToSide;
        self.exit = Some(self.runner.play(&self.library.slide_out(side), now));
        log::debug!("card {}: exiting toward {side:?}", self.id);
        true
    }

    /// Earliest instant at which this card changes state on its own.
    pub fn next_deadline(&self) -> Option<Duration> {
        match (self.dwell_until, self.runner.next_completion()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Runs the card's timers and animations up to `now`.
    ///
    /// Internal transitions are processed at the exact instant they fall due,
    /// in order, so the pose at `now` does not depend on how often this is
    /// called.
    pub fn advance(&mut self, now: Duration) -> Vec<CardNotice> {
        let mut notices = Vec::new();
        if self.object.is_none() {
            return notices;
        }

        while let Some(t) = self.next_deadline().filter(|&t| t <= now) {
            self.step_to(t, &mut notices);
        }
        self.step_to(now, &mut notices);
        notices
    }

    /// Kills every timer and animation and parks the card hidden, silently.
    ///
    /// Returns how many timelines and timers were cancelled.
    pub fn reset(&mut self) -> (usize, usize) {
        let killed = self.runner.kill_all();
        let timers = usize::from(self.dwell_until.is_some());
        self.clear_phase();
        self.state = CardVisualState::Hidden;
        if let Some(obj) = &mut self.object {
            obj.transform = CardTransform::hidden_at(self.rest.0, self.rest.1);
        }
        (killed, timers)
    }

    /// Resets the card and releases its images. Idempotent.
    pub fn dispose(&mut self) -> DisposeReport {
        let (timelines_killed, timers_cancelled) = self.reset();
        let mut report = DisposeReport { timelines_killed, timers_cancelled, ..DisposeReport::default() };

        if let Some(mut obj) = self.object.take() {
            report.gpu_textures_released = obj.release_gpu();
            report.face_images_released = obj.faces.len();
            log::debug!("card {}: disposed", self.id);
        }
        report
    }

    /// Uploads face images that have no GPU copy yet.
    pub fn upload_textures(
        &mut self,
        ctx: &RenderCtx<'_>,
        renderer: &mut CardRenderer,
    ) -> anyhow::Result<usize> {
        let Some(obj) = &mut self.object else {
            return Ok(0);
        };

        let mut uploaded = 0;
        for (face, slot) in Face::BOTH.iter().zip(obj.faces.iter_mut()) {
            if slot.gpu.is_some() {
                continue;
            }
            let label = format!("card {} {face:?}", self.id);
            let img = &slot.image;
            slot.gpu = Some(renderer.upload(ctx, &label, img.width, img.height, &img.pixels)?);
            uploaded += 1;
        }
        Ok(uploaded)
    }

    /// Faces to draw this frame.
    pub fn face_draws(&self) -> Vec<FaceDraw<'_>> {
        let Some(obj) = self.object.as_ref().filter(|_| self.is_visible()) else {
            return Vec::new();
        };

        Face::BOTH
            .iter()
            .filter_map(|&face| {
                let slot = obj.face(face);
                let image = slot.gpu.as_ref()?;
                Some(FaceDraw {
                    model: obj.face_model(face),
                    opacity: obj.transform.opacity[face.index()],
                    image,
                })
            })
            .collect()
    }

    // ── internals ──

    fn clear_phase(&mut self) {
        self.entry = None;
        self.flip = None;
        self.exit = None;
        self.dwell_until = None;
        self.flip_reported = false;
    }

    fn step_to(&mut self, t: Duration, notices: &mut Vec<CardNotice>) {
        if self.state == CardVisualState::ActiveFront && self.dwell_until.is_some_and(|d| d <= t) {
            let start = self.dwell_until.take().unwrap_or(t);
            self.flip = Some(self.runner.play(&self.library.flip(), start));
            self.state = CardVisualState::Flipping;
            log::debug!("card {}: flipping at {start:?}", self.id);
        }

        let Some(obj) = &mut self.object else {
            return;
        };
        for id in self.runner.update(t, &mut obj.transform) {
            self.on_timeline_done(id, t, notices);
        }
    }

    fn on_timeline_done(&mut self, id: TimelineId, t: Duration, notices: &mut Vec<CardNotice>) {
        let mut notify = |event| notices.push(CardNotice { at: t, event });

        if self.entry == Some(id) && self.state == CardVisualState::EnteringFromSide {
            self.entry = None;
            self.state = CardVisualState::ActiveFront;
            self.dwell_until = Some(t + self.pre_flip_dwell);
            notify(CardEvent::EntryComplete);
        } else if self.flip == Some(id) && self.state == CardVisualState::Flipping {
            self.flip = None;
            self.state = CardVisualState::ActiveBack;
            if !self.flip_reported {
                self.flip_reported = true;
                notify(CardEvent::FlipComplete);
            }
        } else if self.exit == Some(id) && self.state == CardVisualState::ExitingToSide {
            self.exit = None;
            self.state = CardVisualState::Hidden;
            notify(CardEvent::Exited);
        } else {
            log::trace!("card {}: dropping stale completion {id:?}", self.id);
        }
    }
}

impl std::fmt::Debug for CardController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardController")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn faces() -> CardFaces {
        let img = FaceImage { width: 1, height: 1, pixels: Arc::from(vec![0u8; 4]) };
        CardFaces { front: img.clone(), back: img }
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn card() -> CardController {
        CardController::new("c", faces(), &CarouselConfig::default())
    }

    fn run(c: &mut CardController, until: u64) -> Vec<(u64, CardEvent)> {
        c.advance(ms(until))
            .into_iter()
            .map(|n| (n.at.as_millis() as u64, n.event))
            .collect()
    }

    #[test]
    fn full_lifecycle_reports_each_phase_once() {
        let mut c = card();
        assert!(c.begin_entry(ms(0), ms(0), Side::Right));
        assert_eq!(c.state(), CardVisualState::EnteringFromSide);

        assert_eq!(run(&mut c, 5000), vec![(800, CardEvent::EntryComplete), (4000, CardEvent::FlipComplete)]);
        assert_eq!(c.state(), CardVisualState::ActiveBack);
        assert_eq!(c.object().unwrap().transform.facing(), Face::Back);

        assert!(c.begin_exit(ms(6000), Side::Left));
        assert_eq!(run(&mut c, 7000), vec![(6800, CardEvent::Exited)]);
        assert_eq!(c.state(), CardVisualState::Hidden);
        assert!(run(&mut c, 20000).is_empty());
    }

    #[test]
    fn coarse_and_fine_stepping_agree() {
        let mut coarse = card();
        let mut fine = card();
        coarse.begin_entry(ms(0), ms(100), Side::Left);
        fine.begin_entry(ms(0), ms(100), Side::Left);

        let a = run(&mut coarse, 3500);
        let mut b = Vec::new();
        for t in (0..=3500).step_by(16) {
            b.extend(run(&mut fine, t));
        }
        b.extend(run(&mut fine, 3500));

        assert_eq!(a, b);
        let (pa, pb) = (coarse.object().unwrap().transform, fine.object().unwrap().transform);
        assert!((pa.rotation.y - pb.rotation.y).abs() < 1e-4);
        assert_eq!(coarse.state(), CardVisualState::Flipping);
    }

    #[test]
    fn front_is_visible_at_entry_and_flip_starts_after_dwell() {
        let mut c = card();
        c.begin_entry(ms(0), ms(0), Side::Right);

        run(&mut c, 800);
        let t = c.object().unwrap().transform;
        assert_eq!(c.state(), CardVisualState::ActiveFront);
        assert_eq!(t.facing(), Face::Front);
        assert_eq!(t.opacity, [1.0, 1.0]);
        assert_eq!(t.position, Vec3::ZERO);

        run(&mut c, 2799);
        assert_eq!(c.state(), CardVisualState::ActiveFront);
        run(&mut c, 2800);
        assert_eq!(c.state(), CardVisualState::Flipping);
        assert_eq!(c.next_deadline(), Some(ms(4000)));
    }

    #[test]
    fn exit_during_dwell_cancels_the_flip() {
        let mut c = card();
        c.begin_entry(ms(0), ms(0), Side::Right);
        run(&mut c, 1000);

        assert!(c.begin_exit(ms(1000), Side::Left));
        let events = run(&mut c, 10_000);
        assert_eq!(events, vec![(1800, CardEvent::Exited)]);
        assert_eq!(c.object().unwrap().transform.rotation.y, 0.0);
    }

    #[test]
    fn reset_is_silent_and_allows_reentry() {
        let mut c = card();
        c.begin_entry(ms(0), ms(0), Side::Right);
        run(&mut c, 3000);

        assert_eq!(c.reset(), (1, 0));
        assert!(run(&mut c, 10_000).is_empty());
        assert!(!c.is_visible());
        assert!(c.begin_entry(ms(10_000), ms(0), Side::Left));
    }

    #[test]
    fn disposed_cards_ignore_everything() {
        let mut c = card();
        c.begin_entry(ms(0), ms(0), Side::Right);
        let report = c.dispose();
        assert_eq!(report.timelines_killed, 1);
        assert_eq!(report.face_images_released, 2);

        assert!(!c.begin_entry(ms(0), ms(0), Side::Right));
        assert!(run(&mut c, 5000).is_empty());
        assert_eq!(c.dispose(), DisposeReport::default());
    }

    #[test]
    fn entry_is_refused_unless_hidden() {
        let mut c = card();
        c.begin_entry(ms(0), ms(0), Side::Right);
        assert!(!c.begin_entry(ms(10), ms(0), Side::Right));
        assert!(!card().begin_exit(ms(0), Side::Left));
    }

    #[test]
    fn back_face_model_faces_away_from_the_front() {
        let c = card();
        let obj = c.object().unwrap();
        let front = obj.face_model(Face::Front).transform_vector3(Vec3::Z);
        let back = obj.face_model(Face::Back).transform_vector3(Vec3::Z);
        assert!(front.z > 0.0);
        assert!(back.z < 0.0);
    }
}
