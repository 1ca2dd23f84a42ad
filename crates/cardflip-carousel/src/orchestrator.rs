//! Card sequencing and auto-play.
//!
//! [`Carousel`] keeps the cards in an arena indexed like the input deck and
//! only ever talks to a card through its index. All state changes happen in
//! [`Carousel::update`] or in an explicit navigation call, on one thread, so
//! the transition guard is the only synchronisation needed.

use std::collections::HashSet;
use std::time::Duration;

use crate::card::CardData;
use crate::config::CarouselConfig;
use crate::controller::{CardController, CardEvent, CardNotice, CardVisualState};
use crate::error::TextureCreationError;
use crate::scheduler::{TimerId, Timers};
use crate::texture::{FaceContent, TextureFactory};
use crate::timeline::Side;

/// Called with the new index after every completed transition.
pub type CardChangeCallback = Box<dyn FnMut(usize)>;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    /// Side the outgoing card leaves toward.
    fn exit_side(self) -> Side {
        match self {
            Direction::Forward => Side::Left,
            Direction::Backward => Side::Right,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum AdvanceReason {
    AutoPlay,
    AfterFlip,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct Advance {
    session: u64,
    reason: AdvanceReason,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct Transition {
    from: usize,
    to: usize,
    exited: bool,
    entered: bool,
}

/// What tearing a session down released.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct TeardownReport {
    pub timers_cancelled: usize,
    pub timelines_killed: usize,
    pub cards_disposed: usize,
    pub gpu_textures_released: usize,
    pub face_images_released: usize,
}

pub struct Carousel {
    config: CarouselConfig,
    factory: TextureFactory,
    on_card_change: Option<CardChangeCallback>,

    cards: Vec<CardData>,
    slots: Vec<Option<CardController>>,
    skipped: Vec<(usize, TextureCreationError)>,

    current: usize,
    transition: Option<Transition>,
    timers: Timers<Advance>,
    pending_advance: Option<TimerId>,

    /// Bumped on every teardown; timers from older sessions are ignored.
    session: u64,
    mounted: bool,
    now: Duration,
}

impl Carousel {
    pub fn new(config: CarouselConfig, factory: TextureFactory) -> Self {
        Self {
            config,
            factory,
            on_card_change: None,
            cards: Vec::new(),
            slots: Vec::new(),
            skipped: Vec::new(),
            current: 0,
            transition: None,
            timers: Timers::new(),
            pending_advance: None,
            session: 0,
            mounted: false,
            now: Duration::ZERO,
        }
    }

    pub fn on_card_change(&mut self, callback: impl FnMut(usize) + 'static) {
        self.on_card_change = Some(Box::new(callback));
    }

    /// Builds every card and brings the first one in.
    ///
    /// Cards whose faces cannot be created are skipped; the rest are
    /// unaffected. An empty deck mounts to nothing and schedules nothing.
    pub fn mount(&mut self, cards: Vec<CardData>, now: Duration) {
        if self.mounted {
            self.unmount();
        }
        self.now = now;
        self.mounted = true;
        self.current = 0;
        self.transition = None;

        {
            let mut seen = HashSet::new();
            for card in &cards {
                if !seen.insert(card.id.as_str()) {
                    log::warn!("duplicate card id {:?}", card.id);
                }
            }
        }

        self.slots = cards.iter().enumerate().map(|(i, card)| self.build_card(i, card)).collect();
        self.cards = cards;

        let Some(first) = self.first_live() else {
            log::debug!("carousel mounted with no displayable cards");
            return;
        };
        self.current = first;
        if let Some(c) = self.slot_mut(first) {
            c.begin_entry(now, Duration::ZERO, Side::Right);
        }
        log::debug!(
            "carousel mounted: {} cards, {} skipped, starting at {first}",
            self.cards.len(),
            self.skipped.len()
        );
        self.schedule_advance(now, AdvanceReason::AutoPlay);
    }

    /// Cancels every timer and animation and disposes every card.
    pub fn unmount(&mut self) -> TeardownReport {
        let mut report = TeardownReport {
            timers_cancelled: self.timers.clear(),
            ..TeardownReport::default()
        };
        self.pending_advance = None;

        for slot in &mut self.slots {
            if let Some(mut c) = slot.take() {
                let r = c.dispose();
                report.timelines_killed += r.timelines_killed;
                report.timers_cancelled += r.timers_cancelled;
                report.gpu_textures_released += r.gpu_textures_released;
                report.face_images_released += r.face_images_released;
                report.cards_disposed += 1;
            }
        }

        if self.mounted {
            log::debug!("carousel unmounted: {report:?}");
        }
        self.slots.clear();
        self.skipped.clear();
        self.transition = None;
        self.mounted = false;
        self.session += 1;
        report
    }

    /// Replaces the deck. An identical deck is left alone; anything else
    /// tears the session down and rebuilds it from the first card. An
    /// unmounted carousel stays unmounted; use [`Carousel::mount`] instead.
    pub fn set_cards(&mut self, cards: Vec<CardData>) -> Option<TeardownReport> {
        if !self.mounted {
            log::debug!("set_cards ignored: carousel is not mounted");
            return None;
        }
        if cards == self.cards {
            return None;
        }
        let now = self.now;
        let report = self.unmount();
        self.mount(cards, now);
        Some(report)
    }

    /// Moves to the next card. Ignored while a transition runs.
    pub fn next(&mut self) -> bool {
        self.navigate(Direction::Forward, self.now)
    }

    /// Moves to the previous card. Ignored while a transition runs.
    pub fn previous(&mut self) -> bool {
        self.navigate(Direction::Backward, self.now)
    }

    /// Cancels the pending automatic advance, if any.
    pub fn pause_autoplay(&mut self) -> bool {
        match self.pending_advance.take() {
            Some(id) => {
                log::debug!("auto-play paused");
                self.timers.cancel(id)
            }
            None => false,
        }
    }

    /// Advances the session clock to `now`, firing everything due on the way
    /// in time order.
    pub fn update(&mut self, now: Duration) {
        if !self.mounted {
            return;
        }
        let now = now.max(self.now);

        while let Some(t) = self.next_event().filter(|&t| t <= now) {
            self.now = t;
            self.step_cards(t);
            while let Some((due, advance)) = self.timers.pop_due(t) {
                self.fire(due, advance);
            }
        }

        self.now = now;
        self.step_cards(now);
    }

    // ── queries ──

    #[inline]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[inline]
    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    #[inline]
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    #[inline]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of cards in the deck, including skipped ones.
    #[inline]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn live_count(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    /// Cards that failed to build, with the reason.
    #[inline]
    pub fn skipped(&self) -> &[(usize, TextureCreationError)] {
        &self.skipped
    }

    pub fn card(&self, index: usize) -> Option<&CardController> {
        self.slots.get(index)?.as_ref()
    }

    pub fn card_state(&self, index: usize) -> Option<CardVisualState> {
        self.card(index).map(CardController::state)
    }

    pub fn cards_mut(&mut self) -> impl Iterator<Item = &mut CardController> {
        self.slots.iter_mut().flatten()
    }

    pub fn cards(&self) -> impl Iterator<Item = &CardController> {
        self.slots.iter().flatten()
    }

    /// Whether an automatic advance is pending.
    #[inline]
    pub fn has_pending_advance(&self) -> bool {
        self.pending_advance.is_some()
    }

    #[inline]
    pub fn config(&self) -> &CarouselConfig {
        &self.config
    }

    // ── internals ──

    fn build_card(&mut self, index: usize, card: &CardData) -> Option<CardController> {
        let content = FaceContent::for_card(card, &self.config.default_label);
        match self
            .factory
            .make_card_faces(&content, self.config.texture_width, self.config.texture_height)
        {
            Ok(faces) => Some(CardController::new(card.id.clone(), faces, &self.config)),
            Err(e) => {
                log::warn!("skipping card {index} ({:?}): {e}", card.id);
                self.skipped.push((index, e));
                None
            }
        }
    }

    fn slot_mut(&mut self, index: usize) -> Option<&mut CardController> {
        self.slots.get_mut(index)?.as_mut()
    }

    fn first_live(&self) -> Option<usize> {
        self.slots.iter().position(Option::is_some)
    }

    /// Nearest live card from `from` in `dir`, wrapping. `None` when `from`
    /// is the only one.
    fn neighbour(&self, from: usize, dir: Direction) -> Option<usize> {
        let n = self.slots.len();
        (1..n)
            .map(|k| match dir {
                Direction::Forward => (from + k) % n,
                Direction::Backward => (from + n - k) % n,
            })
            .find(|&i| self.slots[i].is_some())
    }

    fn navigate(&mut self, dir: Direction, at: Duration) -> bool {
        if !self.mounted {
            return false;
        }
        if self.transition.is_some() {
            log::trace!("navigation ignored: transition in progress");
            return false;
        }
        let Some(to) = self.neighbour(self.current, dir) else {
            return false;
        };

        self.cancel_pending_advance();

        let from = self.current;
        let exit_side = dir.exit_side();
        let entry_delay = self.config.entrance_delay();

        let exiting = self.slot_mut(from).is_some_and(|c| c.begin_exit(at, exit_side));
        if let Some(c) = self.slot_mut(to) {
            // Entry only starts from Hidden.
            if c.state() != CardVisualState::Hidden {
                c.reset();
            }
            c.begin_entry(at, entry_delay, exit_side.opposite());
        }

        self.transition = Some(Transition { from, to, exited: !exiting, entered: false });
        log::debug!("transition {from} -> {to} ({dir:?}) at {at:?}");
        true
    }

    fn next_event(&self) -> Option<Duration> {
        self.cards()
            .filter_map(CardController::next_deadline)
            .chain(self.timers.next_due())
            .min()
    }

    fn step_cards(&mut self, t: Duration) {
        let mut notices: Vec<(usize, CardNotice)> = Vec::new();
        for (i, slot) in self.slots.iter_mut().enumerate() {
            if let Some(c) = slot {
                notices.extend(c.advance(t).into_iter().map(|n| (i, n)));
            }
        }
        notices.sort_by_key(|(i, n)| (n.at, *i));

        for (i, notice) in notices {
            self.on_card_notice(i, notice);
        }
    }

    fn on_card_notice(&mut self, index: usize, notice: CardNotice) {
        match (notice.event, self.transition) {
            (CardEvent::Exited, Some(mut tr)) if tr.from == index => {
                tr.exited = true;
                if let Some(c) = self.slot_mut(index) {
                    c.reset();
                }
                self.transition = Some(tr);
                self.maybe_finish_transition(notice.at);
            }
            (CardEvent::EntryComplete, Some(mut tr)) if tr.to == index => {
                tr.entered = true;
                self.transition = Some(tr);
                self.maybe_finish_transition(notice.at);
            }
            (CardEvent::EntryComplete, None) if index == self.current => {
                log::trace!("card {index} settled");
            }
            (CardEvent::FlipComplete, None) if index == self.current => {
                log::debug!("card {index} flip complete");
                if self.config.advance_after_flip {
                    self.schedule_advance(notice.at, AdvanceReason::AfterFlip);
                }
            }
            (event, _) => {
                log::trace!("ignoring {event:?} from card {index}");
            }
        }
    }

    fn maybe_finish_transition(&mut self, at: Duration) {
        let Some(tr) = self.transition.filter(|t| t.exited && t.entered) else {
            return;
        };

        self.transition = None;
        self.current = tr.to;
        log::debug!("transition to {} complete at {at:?}", tr.to);
        if let Some(cb) = self.on_card_change.as_mut() {
            cb(tr.to);
        }
        self.schedule_advance(at, AdvanceReason::AutoPlay);
    }

    fn cancel_pending_advance(&mut self) {
        if let Some(id) = self.pending_advance.take() {
            self.timers.cancel(id);
        }
    }

    /// Replaces any pending advance with a new one.
    fn schedule_advance(&mut self, at: Duration, reason: AdvanceReason) {
        let delay = match reason {
            AdvanceReason::AutoPlay => self.config.auto_play_interval(),
            AdvanceReason::AfterFlip => Some(self.config.post_flip_dwell()),
        };
        let Some(delay) = delay else {
            return;
        };
        if self.live_count() < 2 {
            return;
        }

        self.cancel_pending_advance();
        let due = at + delay;
        self.pending_advance = Some(self.timers.schedule(due, Advance { session: self.session, reason }));
        log::debug!("{reason:?} advance scheduled at {due:?}");
    }

    fn fire(&mut self, due: Duration, advance: Advance) {
        if advance.session != self.session {
            log::trace!("dropping advance from session {}", advance.session);
            return;
        }
        self.pending_advance = None;
        log::debug!("{:?} advance firing at {due:?}", advance.reason);
        self.navigate(Direction::Forward, due);
    }
}

impl std::fmt::Debug for Carousel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Carousel")
            .field("cards", &self.cards.len())
            .field("live", &self.live_count())
            .field("current", &self.current)
            .field("transition", &self.transition)
            .field("mounted", &self.mounted)
            .finish()
    }
}

impl Drop for Carousel {
    fn drop(&mut self) {
        self.unmount();
    }
}
