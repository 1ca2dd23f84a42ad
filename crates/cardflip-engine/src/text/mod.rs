//! Font loading, measurement and glyph rasterization (fontdue).

mod font_system;

pub use font_system::{FontId, FontLoadError, FontSystem, GlyphRun, LineMetrics, RasterGlyph};
