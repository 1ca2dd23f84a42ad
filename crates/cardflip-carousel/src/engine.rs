//! A mounted carousel: scene, card sequence and controls behind one handle.
//!
//! The host window feeds it surface sizes, input and frame time, and hands
//! it a render context each frame. Time is the sum of the deltas passed to
//! [`CarouselEngine::update`], so a paused host pauses the carousel.

use std::time::Duration;

use cardflip_engine::coords::Viewport;
use cardflip_engine::input::{Button, InputFrame, InputState, Key};
use cardflip_engine::render::{CardRenderer, FaceDraw, OverlayRenderer, RenderCtx, RenderTarget};
use cardflip_engine::scene::DrawList;

use crate::card::CardData;
use crate::config::CarouselConfig;
use crate::error::CarouselError;
use crate::navigation::{self, NavAction, NavState, NavTheme};
use crate::orchestrator::{Carousel, TeardownReport};
use crate::scene::{SceneHost, SurfaceSize};
use crate::texture::TextureFactory;

pub struct CarouselEngine {
    scene: SceneHost,
    carousel: Carousel,
    /// Deck waiting for a surface with area.
    pending: Option<Vec<CardData>>,
    clock: Duration,
    viewport: Viewport,

    nav_theme: NavTheme,
    hovered: Option<NavAction>,

    card_renderer: CardRenderer,
    overlay_renderer: OverlayRenderer,
    overlay: DrawList,
}

impl CarouselEngine {
    pub fn new(config: CarouselConfig, factory: TextureFactory) -> Self {
        Self {
            scene: SceneHost::new(config.camera.clone(), &config.lighting),
            carousel: Carousel::new(config, factory),
            pending: None,
            clock: Duration::ZERO,
            viewport: Viewport::default(),
            nav_theme: NavTheme::default(),
            hovered: None,
            card_renderer: CardRenderer::new(),
            overlay_renderer: OverlayRenderer::new(),
            overlay: DrawList::new(),
        }
    }

    pub fn on_card_change(&mut self, callback: impl FnMut(usize) + 'static) {
        self.carousel.on_card_change(callback);
    }

    /// Initializes the scene on `surface` and mounts `cards`.
    ///
    /// A zero-area surface is reported and the deck is kept; the next
    /// [`CarouselEngine::resize`] with a usable size mounts it.
    pub fn mount(&mut self, surface: SurfaceSize, cards: Vec<CardData>) -> Result<(), CarouselError> {
        match self.scene.initialize(surface) {
            Ok(_) => {
                self.viewport = surface.viewport();
                self.pending = None;
                self.carousel.mount(cards, self.clock);
                Ok(())
            }
            Err(e) => {
                log::warn!("carousel not mounted, waiting for a resize: {e}");
                self.pending = Some(cards);
                Err(e.into())
            }
        }
    }

    /// Recomputes the camera. Mounts a deck that was waiting for a surface.
    pub fn resize(&mut self, surface: SurfaceSize) {
        if self.scene.on_resize(surface).is_none() {
            return;
        }
        self.viewport = surface.viewport();

        if let Some(cards) = self.pending.take() {
            log::debug!("surface ready, mounting {} cards", cards.len());
            self.carousel.mount(cards, self.clock);
        }
    }

    /// Replaces the deck, tearing down the current one.
    pub fn set_cards(&mut self, cards: Vec<CardData>) -> Option<TeardownReport> {
        if self.pending.is_some() {
            self.pending = Some(cards);
            return None;
        }
        self.carousel.set_cards(cards)
    }

    /// Stops drawing and releases every card.
    pub fn unmount(&mut self) -> TeardownReport {
        self.pending = None;
        self.scene.dispose();
        self.carousel.unmount()
    }

    /// Applies this frame's input: arrow keys navigate, button clicks
    /// navigate, and any press on the surface pauses auto-play.
    pub fn handle_input(&mut self, input: &InputState, frame: &InputFrame) {
        if !self.scene.is_running() {
            return;
        }
        let nav = self.nav_state();
        let layout = navigation::layout(self.viewport, &nav);

        self.hovered = input.pointer.and_then(|p| navigation::hit_test(&layout, &nav, p));

        for at in frame.presses(Button::Primary) {
            self.carousel.pause_autoplay();
            match navigation::hit_test(&layout, &nav, at) {
                Some(NavAction::Previous) => {
                    self.carousel.previous();
                }
                Some(NavAction::Next) => {
                    self.carousel.next();
                }
                None => {}
            }
        }

        if frame.key_pressed(Key::ArrowLeft) {
            self.carousel.pause_autoplay();
            self.carousel.previous();
        }
        if frame.key_pressed(Key::ArrowRight) {
            self.carousel.pause_autoplay();
            self.carousel.next();
        }
    }

    /// Advances the carousel clock by `dt`.
    pub fn update(&mut self, dt: Duration) {
        if !self.scene.is_running() {
            return;
        }
        self.clock += dt;
        self.carousel.update(self.clock);
    }

    /// Uploads face images that are not on the GPU yet.
    pub fn prepare_gpu(&mut self, ctx: &RenderCtx<'_>) {
        for card in self.carousel.cards_mut() {
            if let Err(e) = card.upload_textures(ctx, &mut self.card_renderer) {
                log::warn!("card {} not uploaded: {e:#}", card.id());
            }
        }
    }

    /// Draws the cards and the controls. Returns `false` when nothing was
    /// drawn because the scene is not running.
    pub fn render(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>) -> bool {
        let Some(view) = self.scene.begin_frame() else {
            return false;
        };

        let faces: Vec<FaceDraw<'_>> = self.carousel.cards().flat_map(|c| c.face_draws()).collect();
        self.card_renderer.render(ctx, target, view.view_proj, &view.lighting, &faces);

        self.overlay.clear();
        if !self.carousel.is_empty() {
            let nav = self.nav_state();
            let layout = navigation::layout(self.viewport, &nav);
            navigation::paint(&mut self.overlay, &layout, &nav, &self.nav_theme, self.hovered);
            self.overlay_renderer.render(ctx, target, &mut self.overlay);
        }
        true
    }

    // ── queries ──

    #[inline]
    pub fn carousel(&self) -> &Carousel {
        &self.carousel
    }

    #[inline]
    pub fn carousel_mut(&mut self) -> &mut Carousel {
        &mut self.carousel
    }

    #[inline]
    pub fn scene(&self) -> &SceneHost {
        &self.scene
    }

    /// Whether the host should keep scheduling frames.
    pub fn wants_redraw(&self) -> bool {
        self.scene.is_running()
    }

    #[inline]
    pub fn hovered(&self) -> Option<NavAction> {
        self.hovered
    }

    pub fn nav_state(&self) -> NavState {
        NavState {
            total: self.carousel.len(),
            current: self.carousel.current_index(),
            transitioning: self.carousel.is_transitioning(),
        }
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::CanvasRasterizer;
    use cardflip_engine::coords::Vec2;
    use cardflip_engine::input::{InputEvent, Press};

    fn engine() -> CarouselEngine {
        let config = CarouselConfig {
            texture_width: 8,
            texture_height: 12,
            ..CarouselConfig::default()
        };
        CarouselEngine::new(config, TextureFactory::new(CanvasRasterizer::without_text()))
    }

    fn deck(n: usize) -> Vec<CardData> {
        (0..n).map(|i| CardData::new(format!("c{i}"), "t", "b")).collect()
    }

    fn surface(w: f32, h: f32) -> SurfaceSize {
        SurfaceSize::new(w, h, 1.0)
    }

    fn press_key(state: &mut InputState, frame: &mut InputFrame, key: Key) {
        state.apply_event(frame, InputEvent::key_down(key));
        state.apply_event(frame, InputEvent::key_up(key));
    }

    fn click(state: &mut InputState, frame: &mut InputFrame, p: Vec2) {
        state.apply_event(frame, InputEvent::primary(Press::Down, p));
        state.apply_event(frame, InputEvent::primary(Press::Up, p));
    }

    #[test]
    fn zero_area_mount_waits_for_resize() {
        let mut e = engine();
        assert!(matches!(e.mount(surface(0.0, 0.0), deck(3)), Err(CarouselError::Initialization(_))));
        assert!(!e.carousel().is_mounted());

        e.resize(surface(800.0, 600.0));
        assert!(e.carousel().is_mounted());
        assert_eq!(e.carousel().len(), 3);
    }

    #[test]
    fn arrow_keys_navigate_and_pause() {
        let mut e = engine();
        e.mount(surface(800.0, 600.0), deck(3)).unwrap();
        e.update(Duration::from_millis(1000));

        let (mut st, mut fr) = (InputState::default(), InputFrame::default());
        press_key(&mut st, &mut fr, Key::ArrowLeft);
        e.handle_input(&st, &fr);

        assert!(e.carousel().is_transitioning());
        assert!(!e.carousel().has_pending_advance());
        e.update(Duration::from_millis(2000));
        assert_eq!(e.carousel().current_index(), 2);
    }

    #[test]
    fn clicking_the_next_button_advances() {
        let mut e = engine();
        e.mount(surface(800.0, 600.0), deck(3)).unwrap();
        e.update(Duration::from_millis(1000));

        let layout = navigation::layout(e.viewport(), &e.nav_state());
        let target = layout.next.center();
        let (mut st, mut fr) = (InputState::default(), InputFrame::default());
        click(&mut st, &mut fr, target);
        e.handle_input(&st, &fr);

        assert!(e.carousel().is_transitioning());
        // Hover is resolved before the click disables the buttons.
        assert_eq!(e.hovered(), Some(NavAction::Next));
    }

    #[test]
    fn pressing_the_surface_only_pauses() {
        let mut e = engine();
        e.mount(surface(800.0, 600.0), deck(3)).unwrap();
        assert!(e.carousel().has_pending_advance());

        let (mut st, mut fr) = (InputState::default(), InputFrame::default());
        click(&mut st, &mut fr, Vec2::new(400.0, 100.0));
        e.handle_input(&st, &fr);

        assert!(!e.carousel().has_pending_advance());
        assert!(!e.carousel().is_transitioning());
    }

    #[test]
    fn unmount_stops_updates_and_drawing() {
        let mut e = engine();
        e.mount(surface(800.0, 600.0), deck(2)).unwrap();
        let report = e.unmount();

        assert_eq!(report.cards_disposed, 2);
        assert!(!e.wants_redraw());
        e.update(Duration::from_secs(60));
        assert_eq!(e.carousel().current_index(), 0);
    }
}
