//! Procedural card-face images.
//!
//! A face is a pure function of its content and pixel size. The
//! [`TextureFactory`] validates the requested size and delegates the drawing
//! to a [`FaceRasterizer`]; [`CanvasRasterizer`] is the real one, tests plug
//! in stubs.

mod canvas;
mod wrap;

use std::fmt;
use std::sync::Arc;

use cardflip_engine::coords::{Rect, Vec2};
use cardflip_engine::paint::{Color, ColorStop, LinearGradient, Paint, SpreadMode};
use cardflip_engine::text::{FontId, FontSystem};

use crate::card::{CardData, Face, ResolvedTheme};
use crate::error::{TextureCreationError, TextureFailure};

pub use canvas::{Canvas, Shadow};
pub use wrap::wrap_text;

/// Straight-alpha RGBA8 pixels, row-major, top row first.
#[derive(Clone, PartialEq, Eq)]
pub struct FaceImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Arc<[u8]>,
}

impl fmt::Debug for FaceImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FaceImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

/// What goes on one face.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceContent {
    pub title: String,
    pub body: String,
    pub label: Option<String>,
    pub theme: ResolvedTheme,
}

impl FaceContent {
    /// Content for `card`, with `default_label` used when the card has none.
    pub fn for_card(card: &CardData, default_label: &str) -> Self {
        let label = card
            .label
            .clone()
            .or_else(|| (!default_label.is_empty()).then(|| default_label.to_string()));
        Self {
            title: card.front_title.clone(),
            body: card.back_content.clone(),
            label,
            theme: ResolvedTheme::resolve(card.theme.as_ref()),
        }
    }
}

/// Draws a face into pixels.
pub trait FaceRasterizer {
    fn rasterize(
        &self,
        content: &FaceContent,
        face: Face,
        width: u32,
        height: u32,
    ) -> Result<FaceImage, TextureCreationError>;
}

/// Both faces of one card.
#[derive(Debug, Clone)]
pub struct CardFaces {
    pub front: FaceImage,
    pub back: FaceImage,
}

pub struct TextureFactory {
    rasterizer: Box<dyn FaceRasterizer>,
    max_dimension: u32,
}

impl TextureFactory {
    /// Largest face edge accepted when no device limit is known.
    pub const DEFAULT_MAX_DIMENSION: u32 = 8192;

    pub fn new(rasterizer: impl FaceRasterizer + 'static) -> Self {
        Self {
            rasterizer: Box::new(rasterizer),
            max_dimension: Self::DEFAULT_MAX_DIMENSION,
        }
    }

    /// Caps face sizes, typically at the GPU's maximum 2D texture size.
    pub fn with_max_dimension(mut self, max: u32) -> Self {
        self.max_dimension = max;
        self
    }

    pub fn make_face_texture(
        &self,
        content: &FaceContent,
        face: Face,
        width: u32,
        height: u32,
    ) -> Result<FaceImage, TextureCreationError> {
        if width == 0 || height == 0 {
            return Err(TextureCreationError::new(width, height, TextureFailure::ZeroArea));
        }
        if width > self.max_dimension || height > self.max_dimension {
            return Err(TextureCreationError::new(
                width,
                height,
                TextureFailure::TooLarge { max: self.max_dimension },
            ));
        }
        self.rasterizer.rasterize(content, face, width, height)
    }

    pub fn make_card_faces(
        &self,
        content: &FaceContent,
        width: u32,
        height: u32,
    ) -> Result<CardFaces, TextureCreationError> {
        Ok(CardFaces {
            front: self.make_face_texture(content, Face::Front, width, height)?,
            back: self.make_face_texture(content, Face::Back, width, height)?,
        })
    }
}

// ── canvas rasterizer ──

/// Type scale bucket picked from the texture width.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Scale {
    Mobile,
    Tablet,
    Desktop,
}

impl Scale {
    fn for_width(width: u32) -> Self {
        match width {
            0..=512 => Scale::Mobile,
            513..=768 => Scale::Tablet,
            _ => Scale::Desktop,
        }
    }

    fn pick(self, mobile: f32, tablet: f32, desktop: f32) -> f32 {
        match self {
            Scale::Mobile => mobile,
            Scale::Tablet => tablet,
            Scale::Desktop => desktop,
        }
    }
}

const LABEL_LETTER_SPACING: f32 = 4.0;
const BORDER_INSET: f32 = 12.0;

/// Paints faces with the card look: gradient panel, glass sheen, inset
/// border and wrapped text with a soft drop shadow.
///
/// Without a font the panels are still drawn and the text is left out.
pub struct CanvasRasterizer {
    fonts: Arc<FontSystem>,
    font: Option<FontId>,
}

impl CanvasRasterizer {
    pub fn new(fonts: Arc<FontSystem>, font: Option<FontId>) -> Self {
        Self { fonts, font }
    }

    /// A rasterizer that draws panels only.
    pub fn without_text() -> Self {
        Self { fonts: Arc::new(FontSystem::new()), font: None }
    }

    fn paint_panel(&self, canvas: &mut Canvas, theme: &ResolvedTheme, face: Face) {
        let w = canvas.width() as f32;
        let h = canvas.height() as f32;
        let full = Rect::new(0.0, 0.0, w, h);
        let radius = w * 0.04;

        canvas.clip_rounded_rect(full, radius);

        let background = match (face, theme.front_background) {
            (Face::Front, Some(solid)) => Paint::from(solid),
            _ => Paint::LinearGradient(LinearGradient::two_stop(
                Vec2::ZERO,
                Vec2::new(0.0, h),
                theme.gradient_start,
                theme.gradient_end,
            )),
        };
        canvas.fill_rect(full, &background);

        let (a0, a1, a2) = match face {
            Face::Front => (0.15, 0.05, 0.10),
            Face::Back => (0.12, 0.03, 0.08),
        };
        let sheen = |a: f32| Color::WHITE.with_opacity(a);
        let glass = LinearGradient::new(
            Vec2::ZERO,
            Vec2::new(w, h),
            vec![
                ColorStop::new(0.0, sheen(a0)),
                ColorStop::new(0.5, sheen(a1)),
                ColorStop::new(1.0, sheen(a2)),
            ],
            SpreadMode::Pad,
        );
        canvas.fill_rect(full, &Paint::from(glass));

        canvas.stroke_rounded_rect(
            full.inset(BORDER_INSET),
            radius - BORDER_INSET,
            (w * 0.006).max(4.0),
            Color::WHITE.with_opacity(0.8),
        );
    }

    fn paint_front_text(&self, canvas: &mut Canvas, content: &FaceContent, font: FontId) {
        let w = canvas.width() as f32;
        let h = canvas.height() as f32;
        let scale = Scale::for_width(canvas.width());

        if let Some(label) = content.label.as_deref() {
            let size = w * scale.pick(0.04, 0.038, 0.035);
            let color = content.theme.text_color.with_opacity(0.9);
            self.draw_spaced(canvas, &label.to_uppercase(), font, size, Vec2::new(w * 0.08, h * 0.08), color);
        }

        let size = w * scale.pick(0.11, 0.10, 0.09);
        let line_height = size * 1.2;
        let lines = wrap_text(&content.title, w * 0.85, |s| self.fonts.measure_line(s, font, size));
        let metrics = self.fonts.line_metrics(font, size);
        // Baseline that centres the glyph box on the line's y.
        let middle = (metrics.ascent - metrics.descent) * 0.5;

        let shadow = Shadow {
            color: Color::BLACK.with_opacity(0.5),
            blur: if scale == Scale::Mobile { 4.0 } else { 6.0 },
            offset: if scale == Scale::Mobile { Vec2::new(1.0, 1.0) } else { Vec2::new(2.0, 2.0) },
        };

        for (i, line) in lines.iter().enumerate() {
            let run = self.fonts.rasterize_line(line, font, size);
            let y = h * 0.5 + i as f32 * line_height + middle;
            let x = w * 0.5 - run.advance * 0.5;
            canvas.draw_glyph_run(&run, Vec2::new(x, y), content.theme.text_color, Some(shadow));
        }
    }

    fn paint_back_text(&self, canvas: &mut Canvas, content: &FaceContent, font: FontId) {
        let w = canvas.width() as f32;
        let h = canvas.height() as f32;
        let scale = Scale::for_width(canvas.width());

        let size = (w * scale.pick(0.052, 0.048, 0.045)).floor();
        let line_height = size * 1.6;
        let lines = wrap_text(&content.body, w * 0.85, |s| self.fonts.measure_line(s, font, size));
        let ascent = self.fonts.line_metrics(font, size).ascent;

        let shadow = Shadow {
            color: Color::BLACK.with_opacity(0.5),
            blur: if scale == Scale::Mobile { 3.0 } else { 4.0 },
            offset: Vec2::new(1.0, 1.0),
        };

        for (i, line) in lines.iter().enumerate() {
            let run = self.fonts.rasterize_line(line, font, size);
            let top = h * 0.1 + i as f32 * line_height;
            canvas.draw_glyph_run(&run, Vec2::new(w * 0.08, top + ascent), content.theme.text_color, Some(shadow));
        }
    }

    /// Draws `text` one glyph at a time with extra tracking after each.
    fn draw_spaced(&self, canvas: &mut Canvas, text: &str, font: FontId, size: f32, origin: Vec2, color: Color) {
        let mut pen = origin.x;
        let mut buf = [0u8; 4];
        for ch in text.chars() {
            let run = self.fonts.rasterize_line(ch.encode_utf8(&mut buf), font, size);
            canvas.draw_glyph_run(&run, Vec2::new(pen, origin.y), color, None);
            pen += run.advance + LABEL_LETTER_SPACING;
        }
    }
}

impl FaceRasterizer for CanvasRasterizer {
    fn rasterize(
        &self,
        content: &FaceContent,
        face: Face,
        width: u32,
        height: u32,
    ) -> Result<FaceImage, TextureCreationError> {
        let mut canvas = Canvas::new(width, height)?;
        self.paint_panel(&mut canvas, &content.theme, face);

        if let Some(font) = self.font {
            match face {
                Face::Front => self.paint_front_text(&mut canvas, content, font),
                Face::Back => self.paint_back_text(&mut canvas, content, font),
            }
        }

        Ok(canvas.into_image())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::CardTheme;

    fn content() -> FaceContent {
        FaceContent::for_card(&CardData::new("a", "Care Planning", "Body text"), "HEALTHCARE")
    }

    fn px(img: &FaceImage, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * img.width + x) * 4) as usize;
        [img.pixels[i], img.pixels[i + 1], img.pixels[i + 2], img.pixels[i + 3]]
    }

    #[test]
    fn faces_are_deterministic() {
        let f = TextureFactory::new(CanvasRasterizer::without_text());
        let a = f.make_face_texture(&content(), Face::Front, 64, 96).unwrap();
        let b = f.make_face_texture(&content(), Face::Front, 64, 96).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn front_and_back_differ_by_sheen() {
        let f = TextureFactory::new(CanvasRasterizer::without_text());
        let faces = f.make_card_faces(&content(), 64, 96).unwrap();
        assert_ne!(faces.front.pixels, faces.back.pixels);
    }

    #[test]
    fn corners_are_transparent_and_centre_is_opaque() {
        let f = TextureFactory::new(CanvasRasterizer::without_text());
        let img = f.make_face_texture(&content(), Face::Back, 200, 300).unwrap();
        assert_eq!(px(&img, 0, 0)[3], 0);
        assert_eq!(px(&img, 100, 150)[3], 255);
    }

    #[test]
    fn solid_front_background_applies_to_front_only() {
        let card = CardData::new("a", "T", "B").with_theme(CardTheme {
            front_background: Some("#ff0000".into()),
            ..CardTheme::default()
        });
        let content = FaceContent::for_card(&card, "");
        let f = TextureFactory::new(CanvasRasterizer::without_text());

        let front = f.make_face_texture(&content, Face::Front, 100, 100).unwrap();
        let back = f.make_face_texture(&content, Face::Back, 100, 100).unwrap();
        let [r, _, b, _] = px(&front, 50, 50);
        assert!(r > b);
        let [r, _, b, _] = px(&back, 50, 50);
        assert!(b > r);
    }

    #[test]
    fn size_limits_are_enforced() {
        let f = TextureFactory::new(CanvasRasterizer::without_text()).with_max_dimension(256);

        let err = f.make_face_texture(&content(), Face::Front, 0, 10).unwrap_err();
        assert_eq!(err.reason, TextureFailure::ZeroArea);

        let err = f.make_face_texture(&content(), Face::Front, 128, 512).unwrap_err();
        assert_eq!(err.reason, TextureFailure::TooLarge { max: 256 });
    }

    #[test]
    fn default_label_fills_in_and_empty_disables() {
        let card = CardData::new("a", "T", "B");
        assert_eq!(FaceContent::for_card(&card, "HEALTHCARE").label.as_deref(), Some("HEALTHCARE"));
        assert_eq!(FaceContent::for_card(&card, "").label, None);
    }

    #[test]
    fn scale_buckets_follow_texture_width() {
        assert_eq!(Scale::for_width(512), Scale::Mobile);
        assert_eq!(Scale::for_width(513), Scale::Tablet);
        assert_eq!(Scale::for_width(768), Scale::Tablet);
        assert_eq!(Scale::for_width(1024), Scale::Desktop);
    }
}
