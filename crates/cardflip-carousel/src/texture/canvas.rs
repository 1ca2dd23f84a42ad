//! CPU raster target for card faces.
//!
//! Pixels are premultiplied, sRGB-encoded [`Color`]s composited source-over,
//! the same conventions as the engine's paint model. Coverage is analytic
//! (signed distance, one pixel of anti-aliasing) for shapes and comes from
//! the font rasterizer for text.

use std::sync::Arc;

use cardflip_engine::coords::{Rect, Vec2};
use cardflip_engine::paint::{Color, Paint};
use cardflip_engine::text::GlyphRun;

use crate::error::{TextureCreationError, TextureFailure};

use super::FaceImage;

/// Blurred, offset copy of text drawn beneath it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Shadow {
    pub color: Color,
    /// Box-blur radius in pixels.
    pub blur: f32,
    pub offset: Vec2,
}

#[derive(Debug, Copy, Clone)]
struct RoundedClip {
    rect: Rect,
    radius: f32,
}

pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
    clip: Option<RoundedClip>,
}

impl Canvas {
    /// Allocates a transparent canvas.
    pub fn new(width: u32, height: u32) -> Result<Self, TextureCreationError> {
        if width == 0 || height == 0 {
            return Err(TextureCreationError::new(width, height, TextureFailure::ZeroArea));
        }

        let len = width as usize * height as usize;
        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(len)
            .map_err(|_| TextureCreationError::new(width, height, TextureFailure::AllocationFailed))?;
        pixels.resize(len, Color::transparent());

        Ok(Self { width, height, pixels, clip: None })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Restricts every later draw to a rounded rectangle.
    pub fn clip_rounded_rect(&mut self, rect: Rect, radius: f32) {
        self.clip = Some(RoundedClip { rect, radius });
    }

    pub fn fill_rect(&mut self, rect: Rect, paint: &Paint) {
        let Some((x0, y0, x1, y1)) = self.pixel_bounds(rect, 0.0) else {
            return;
        };

        for y in y0..y1 {
            for x in x0..x1 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let cov = box_coverage(rect, p);
                if cov > 0.0 {
                    self.blend(x, y, paint.sample(p).with_opacity(cov));
                }
            }
        }
    }

    /// Strokes the outline of a rounded rectangle, centred on its edge.
    pub fn stroke_rounded_rect(&mut self, rect: Rect, radius: f32, width: f32, color: Color) {
        let half = width * 0.5;
        let Some((x0, y0, x1, y1)) = self.pixel_bounds(rect, half + 1.0) else {
            return;
        };

        for y in y0..y1 {
            for x in x0..x1 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let d = rounded_rect_sdf(rect, radius, p).abs();
                let cov = (half - d + 0.5).clamp(0.0, 1.0);
                if cov > 0.0 {
                    self.blend(x, y, color.with_opacity(cov));
                }
            }
        }
    }

    /// Draws a rasterized line with its pen origin at `origin` (on the baseline).
    pub fn draw_glyph_run(
        &mut self,
        run: &GlyphRun,
        origin: Vec2,
        color: Color,
        shadow: Option<Shadow>,
    ) {
        if let Some(shadow) = shadow {
            self.draw_shadow(run, origin, shadow);
        }

        for glyph in &run.glyphs {
            let gx = (origin.x + glyph.x).round() as i64;
            let gy = (origin.y + glyph.y).round() as i64;
            for row in 0..glyph.height {
                for col in 0..glyph.width {
                    let cov = glyph.coverage[row * glyph.width + col];
                    if cov != 0 {
                        self.blend_at(gx + col as i64, gy + row as i64, color.with_opacity(cov as f32 / 255.0));
                    }
                }
            }
        }
    }

    /// Converts to straight-alpha RGBA8.
    pub fn into_image(self) -> FaceImage {
        let mut rgba = Vec::with_capacity(self.pixels.len() * 4);
        for px in &self.pixels {
            rgba.extend_from_slice(&px.to_rgba8());
        }
        FaceImage {
            width: self.width,
            height: self.height,
            pixels: Arc::from(rgba),
        }
    }

    // ── internals ──

    fn draw_shadow(&mut self, run: &GlyphRun, origin: Vec2, shadow: Shadow) {
        let Some((bx0, by0, bx1, by1)) = run_bounds(run) else {
            return;
        };

        let pad = shadow.blur.ceil().max(0.0) as i64;
        let mask_w = (bx1 - bx0 + 2 * pad) as usize;
        let mask_h = (by1 - by0 + 2 * pad) as usize;
        let mut mask = vec![0.0f32; mask_w * mask_h];

        for glyph in &run.glyphs {
            let gx = glyph.x.round() as i64 - bx0 + pad;
            let gy = glyph.y.round() as i64 - by0 + pad;
            for row in 0..glyph.height {
                for col in 0..glyph.width {
                    let idx = (gy as usize + row) * mask_w + gx as usize + col;
                    let c = glyph.coverage[row * glyph.width + col] as f32 / 255.0;
                    mask[idx] = (mask[idx] + c).min(1.0);
                }
            }
        }

        // A box blur of half the radius, run twice, approximates the gaussian
        // a browser applies for the same blur value.
        let r = (shadow.blur * 0.5).round() as usize;
        if r > 0 {
            for _ in 0..2 {
                box_blur_h(&mut mask, mask_w, mask_h, r);
                box_blur_v(&mut mask, mask_w, mask_h, r);
            }
        }

        let ox = (origin.x + shadow.offset.x).round() as i64 + bx0 - pad;
        let oy = (origin.y + shadow.offset.y).round() as i64 + by0 - pad;
        for row in 0..mask_h {
            for col in 0..mask_w {
                let a = mask[row * mask_w + col];
                if a > 0.0 {
                    self.blend_at(ox + col as i64, oy + row as i64, shadow.color.with_opacity(a));
                }
            }
        }
    }

    fn pixel_bounds(&self, rect: Rect, grow: f32) -> Option<(u32, u32, u32, u32)> {
        let r = rect.normalized();
        let min = r.min();
        let max = r.max();
        let x0 = (min.x - grow).floor().max(0.0) as u32;
        let y0 = (min.y - grow).floor().max(0.0) as u32;
        let x1 = ((max.x + grow).ceil().max(0.0) as u32).min(self.width);
        let y1 = ((max.y + grow).ceil().max(0.0) as u32).min(self.height);
        (x0 < x1 && y0 < y1).then_some((x0, y0, x1, y1))
    }

    fn blend_at(&mut self, x: i64, y: i64, src: Color) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        self.blend(x as u32, y as u32, src);
    }

    fn blend(&mut self, x: u32, y: u32, src: Color) {
        let clip = match self.clip {
            Some(c) => {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                (0.5 - rounded_rect_sdf(c.rect, c.radius, p)).clamp(0.0, 1.0)
            }
            None => 1.0,
        };
        if clip <= 0.0 {
            return;
        }

        let idx = y as usize * self.width as usize + x as usize;
        self.pixels[idx] = src.with_opacity(clip).over(self.pixels[idx]);
    }

    #[cfg(test)]
    fn pixel(&self, x: u32, y: u32) -> Color {
        self.pixels[y as usize * self.width as usize + x as usize]
    }
}

/// Signed distance from `p` to a rounded rectangle; negative inside.
fn rounded_rect_sdf(rect: Rect, radius: f32, p: Vec2) -> f32 {
    let r = rect.normalized();
    let half = r.size * 0.5;
    let radius = radius.clamp(0.0, half.min_element());

    let q = (p - r.center()).abs() - half + Vec2::splat(radius);
    q.max(Vec2::ZERO).length() + q.max_element().min(0.0) - radius
}

/// Fraction of the unit pixel centred at `p` covered by `rect`.
fn box_coverage(rect: Rect, p: Vec2) -> f32 {
    let r = rect.normalized();
    let min = r.min();
    let max = r.max();
    let cx = ((p.x + 0.5).min(max.x) - (p.x - 0.5).max(min.x)).clamp(0.0, 1.0);
    let cy = ((p.y + 0.5).min(max.y) - (p.y - 0.5).max(min.y)).clamp(0.0, 1.0);
    cx * cy
}

/// Integer pixel bounds of a run relative to its pen origin.
fn run_bounds(run: &GlyphRun) -> Option<(i64, i64, i64, i64)> {
    let mut it = run.glyphs.iter().map(|g| {
        let x = g.x.round() as i64;
        let y = g.y.round() as i64;
        (x, y, x + g.width as i64, y + g.height as i64)
    });
    let first = it.next()?;
    Some(it.fold(first, |a, b| (a.0.min(b.0), a.1.min(b.1), a.2.max(b.2), a.3.max(b.3))))
}

fn box_blur_h(buf: &mut [f32], w: usize, h: usize, r: usize) {
    let mut row = vec![0.0f32; w];
    let norm = 1.0 / (2 * r + 1) as f32;
    for y in 0..h {
        let line = &mut buf[y * w..(y + 1) * w];
        row.copy_from_slice(line);
        for x in 0..w {
            let lo = x.saturating_sub(r);
            let hi = (x + r).min(w - 1);
            line[x] = row[lo..=hi].iter().sum::<f32>() * norm;
        }
    }
}

fn box_blur_v(buf: &mut [f32], w: usize, h: usize, r: usize) {
    let mut col = vec![0.0f32; h];
    let norm = 1.0 / (2 * r + 1) as f32;
    for x in 0..w {
        for y in 0..h {
            col[y] = buf[y * w + x];
        }
        for y in 0..h {
            let lo = y.saturating_sub(r);
            let hi = (y + r).min(h - 1);
            buf[y * w + x] = col[lo..=hi].iter().sum::<f32>() * norm;
        }
    }
}
