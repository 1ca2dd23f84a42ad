use std::sync::Arc;

use winit::event::WindowEvent;

use cardflip_carousel::{CanvasRasterizer, CardData, CarouselConfig, CarouselEngine, SurfaceSize, TextureFactory};
use cardflip_engine::core::{App, AppControl, FrameCtx, WindowCtx};
use cardflip_engine::input::Key;
use cardflip_engine::paint::Color;
use cardflip_engine::text::{FontId, FontSystem};
use cardflip_engine::window::CursorIcon;

/// Page background behind the cards. Opaque, so premultiplied equals straight.
const BACKGROUND: Color = Color::from_premul(0.973, 0.980, 0.988, 1.0);

/// Window glue: builds the carousel on the first frame, when the device
/// limits are known, and feeds it resize, input and time.
pub struct CarouselApp {
    config: Option<CarouselConfig>,
    cards: Vec<CardData>,
    fonts: Arc<FontSystem>,
    font: Option<FontId>,

    engine: Option<CarouselEngine>,
    pointer_over_button: bool,
}

impl CarouselApp {
    pub fn new(config: CarouselConfig, cards: Vec<CardData>, fonts: Arc<FontSystem>, font: Option<FontId>) -> Self {
        Self {
            config: Some(config),
            cards,
            fonts,
            font,
            engine: None,
            pointer_over_button: false,
        }
    }

    fn mount(&mut self, ctx: &FrameCtx<'_, '_>) -> Option<&mut CarouselEngine> {
        if self.engine.is_none() {
            let config = self.config.take()?;
            let max = ctx.render_ctx().max_texture_dimension();
            let factory = TextureFactory::new(CanvasRasterizer::new(Arc::clone(&self.fonts), self.font))
                .with_max_dimension(max);

            let mut engine = CarouselEngine::new(config, factory);
            let ids: Vec<String> = self.cards.iter().map(|c| c.id.clone()).collect();
            engine.on_card_change(move |i| {
                log::info!("card changed to {i} ({})", ids.get(i).map_or("?", String::as_str));
            });

            let (w, h) = ctx.window.logical_size();
            let surface = SurfaceSize::new(w, h, ctx.window.scale_factor());
            if let Err(e) = engine.mount(surface, std::mem::take(&mut self.cards)) {
                log::debug!("mount deferred: {e}");
            }
            self.engine = Some(engine);
        }
        self.engine.as_mut()
    }
}

impl App for CarouselApp {
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        if let (WindowEvent::CloseRequested, Some(engine)) = (event, self.engine.as_mut()) {
            let report = engine.unmount();
            log::info!("carousel torn down: {report:?}");
        }
        AppControl::Continue
    }

    fn on_resize(&mut self, window: &WindowCtx<'_>) {
        if let Some(engine) = &mut self.engine {
            let (w, h) = window.logical_size();
            engine.resize(SurfaceSize::new(w, h, window.scale_factor()));
        }
    }

    fn wants_redraw(&self) -> bool {
        self.engine.as_ref().is_none_or(CarouselEngine::wants_redraw)
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if ctx.input_frame.key_pressed(Key::Escape) {
            return AppControl::Exit;
        }

        let Some(engine) = self.mount(ctx) else {
            return AppControl::Continue;
        };

        engine.handle_input(ctx.input, ctx.input_frame);
        engine.update(ctx.time.delta());
        engine.prepare_gpu(&ctx.render_ctx());

        let over_button = engine.hovered().is_some();
        if over_button != self.pointer_over_button {
            self.pointer_over_button = over_button;
            ctx.window.set_cursor(if over_button { CursorIcon::Pointer } else { CursorIcon::Default });
        }

        let Some(engine) = self.engine.as_mut() else {
            return AppControl::Continue;
        };
        ctx.render(BACKGROUND, |rctx, target| {
            engine.render(rctx, target);
        })
    }
}
