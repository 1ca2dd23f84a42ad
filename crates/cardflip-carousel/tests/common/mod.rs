#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use cardflip_carousel::error::TextureFailure;
use cardflip_carousel::texture::FaceContent;
use cardflip_carousel::{
    CardData, Carousel, CarouselConfig, Face, FaceImage, FaceRasterizer, TextureCreationError, TextureFactory,
};

/// Fills faces with a flat colour. Titles listed in `broken` fail.
pub struct StubRasterizer {
    pub broken: Vec<String>,
}

impl FaceRasterizer for StubRasterizer {
    fn rasterize(
        &self,
        content: &FaceContent,
        _face: Face,
        width: u32,
        height: u32,
    ) -> Result<FaceImage, TextureCreationError> {
        if self.broken.contains(&content.title) {
            return Err(TextureCreationError::new(width, height, TextureFailure::AllocationFailed));
        }
        let pixels = vec![0x80u8; width as usize * height as usize * 4];
        Ok(FaceImage { width, height, pixels: Arc::from(pixels) })
    }
}

pub fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

pub fn config(auto_play_interval_ms: i64, advance_after_flip: bool) -> CarouselConfig {
    CarouselConfig {
        auto_play_interval_ms,
        advance_after_flip,
        texture_width: 4,
        texture_height: 6,
        ..CarouselConfig::default()
    }
}

pub fn factory(broken: &[&str]) -> TextureFactory {
    TextureFactory::new(StubRasterizer { broken: broken.iter().map(|s| s.to_string()).collect() })
}

pub fn deck(n: usize) -> Vec<CardData> {
    (0..n)
        .map(|i| CardData::new(format!("card-{i}"), format!("Title {i}"), format!("Body {i}")))
        .collect()
}

/// Records every `onCardChange` value.
pub fn record_changes(carousel: &mut Carousel) -> Rc<RefCell<Vec<usize>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    carousel.on_card_change(move |i| sink.borrow_mut().push(i));
    seen
}

/// Mounted carousel with a change recorder, clock at zero.
pub fn mounted(n: usize, cfg: CarouselConfig) -> (Carousel, Rc<RefCell<Vec<usize>>>) {
    let mut c = Carousel::new(cfg, factory(&[]));
    let seen = record_changes(&mut c);
    c.mount(deck(n), Duration::ZERO);
    (c, seen)
}

/// Advances the carousel by `step` until `until`, like a frame loop would.
pub fn run_frames(c: &mut Carousel, until: Duration, step: Duration) {
    let mut t = c.now();
    while t < until {
        t = (t + step).min(until);
        c.update(t);
    }
}
