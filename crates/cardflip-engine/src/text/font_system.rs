use std::fmt;

/// Error returned by [`FontSystem::load_font`].
#[derive(Debug, Clone)]
pub struct FontLoadError(pub String);

impl fmt::Display for FontLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "font load error: {}", self.0)
    }
}

impl std::error::Error for FontLoadError {}

/// Opaque handle to a font loaded into a [`FontSystem`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct FontId(pub(crate) usize);

/// Vertical metrics of a font at a given pixel size.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct LineMetrics {
    /// Distance from the baseline to the top of the tallest glyphs (positive).
    pub ascent: f32,
    /// Distance from the baseline to the bottom of descenders (positive).
    pub descent: f32,
}

/// A single rasterized glyph positioned relative to the run's pen origin.
///
/// `x`/`y` locate the bitmap's top-left corner; `y` is measured from the
/// baseline with +Y down, so glyphs sitting on the baseline have negative `y`.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterGlyph {
    pub x: f32,
    pub y: f32,
    pub width: usize,
    pub height: usize,
    /// Row-major 8-bit coverage.
    pub coverage: Vec<u8>,
}

/// A rasterized single line of text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlyphRun {
    pub glyphs: Vec<RasterGlyph>,
    /// Total horizontal advance of the line.
    pub advance: f32,
}

/// Owns a collection of loaded fonts.
///
/// Fonts are immutable after loading.
pub struct FontSystem {
    fonts: Vec<fontdue::Font>,
}

impl FontSystem {
    pub fn new() -> Self {
        Self { fonts: Vec::new() }
    }

    /// Parses and stores a TrueType or OpenType font from raw bytes.
    pub fn load_font(&mut self, bytes: &[u8]) -> Result<FontId, FontLoadError> {
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(|e| FontLoadError(e.to_string()))?;
        let id = FontId(self.fonts.len());
        self.fonts.push(font);
        log::debug!("loaded font {:?} as {id:?}", font_name(&self.fonts[id.0]));
        Ok(id)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    /// Returns a reference to the underlying `fontdue::Font`, if `id` is valid.
    pub(crate) fn get(&self, id: FontId) -> Option<&fontdue::Font> {
        self.fonts.get(id.0)
    }

    /// Horizontal advance of `text` laid out on one line, kerning included.
    ///
    /// Unknown fonts measure as zero.
    #[must_use]
    pub fn measure_line(&self, text: &str, id: FontId, size: f32) -> f32 {
        let Some(font) = self.get(id) else {
            return 0.0;
        };

        let mut pen = 0.0f32;
        let mut prev: Option<char> = None;
        for ch in text.chars() {
            if let Some(p) = prev {
                pen += font.horizontal_kern(p, ch, size).unwrap_or(0.0);
            }
            pen += font.metrics(ch, size).advance_width;
            prev = Some(ch);
        }
        pen
    }

    /// Ascent/descent at `size`, falling back to a 0.8/0.2 split when the
    /// font carries no horizontal line metrics.
    #[must_use]
    pub fn line_metrics(&self, id: FontId, size: f32) -> LineMetrics {
        match self.get(id).and_then(|f| f.horizontal_line_metrics(size)) {
            Some(m) => LineMetrics {
                ascent: m.ascent,
                descent: -m.descent,
            },
            None => LineMetrics {
                ascent: size * 0.8,
                descent: size * 0.2,
            },
        }
    }

    /// Rasterizes `text` as one line starting at pen origin `(0, 0)` on the baseline.
    #[must_use]
    pub fn rasterize_line(&self, text: &str, id: FontId, size: f32) -> GlyphRun {
        let Some(font) = self.get(id) else {
            return GlyphRun::default();
        };

        let mut run = GlyphRun::default();
        let mut pen = 0.0f32;
        let mut prev: Option<char> = None;

        for ch in text.chars() {
            if let Some(p) = prev {
                pen += font.horizontal_kern(p, ch, size).unwrap_or(0.0);
            }

            let (metrics, coverage) = font.rasterize(ch, size);
            if metrics.width > 0 && metrics.height > 0 {
                run.glyphs.push(RasterGlyph {
                    x: pen + metrics.xmin as f32,
                    y: -(metrics.ymin as f32 + metrics.height as f32),
                    width: metrics.width,
                    height: metrics.height,
                    coverage,
                });
            }

            pen += metrics.advance_width;
            prev = Some(ch);
        }

        run.advance = pen;
        run
    }
}

impl Default for FontSystem {
    fn default() -> Self {
        Self::new()
    }
}

fn font_name(font: &fontdue::Font) -> &str {
    font.name().unwrap_or("<unnamed>")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_fail_to_load() {
        let mut fs = FontSystem::new();
        let err = fs.load_font(b"definitely not a font").unwrap_err();
        assert!(err.to_string().starts_with("font load error"));
        assert!(fs.is_empty());
    }

    #[test]
    fn unknown_font_measures_nothing() {
        let fs = FontSystem::new();
        let id = FontId(3);
        assert_eq!(fs.measure_line("hello", id, 32.0), 0.0);
        assert!(fs.rasterize_line("hello", id, 32.0).glyphs.is_empty());
    }

    #[test]
    fn missing_line_metrics_fall_back_to_size_split() {
        let fs = FontSystem::new();
        let m = fs.line_metrics(FontId(0), 10.0);
        assert!((m.ascent - 8.0).abs() < 1e-6);
        assert!((m.descent - 2.0).abs() < 1e-6);
    }
}
