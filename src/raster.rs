//! CPU framebuffer implementing [`Surface`].
//!
//! Pixels are straight-alpha RGBA8, row-major, top-left origin. Every
//! primitive is anti-aliased by pixel-center coverage and composited with
//! source-over blending. Primitives outside the canvas are clipped and
//! non-finite coordinates are skipped, so a degenerate frame draws nothing
//! rather than panicking.

use glam::Vec2;
use image::{Rgba, RgbaImage};

use crate::surface::{sample_gradient, GradientStop, Surface, SurfaceSize};
use crate::visuals::Color;

/// An owned RGBA8 pixel buffer.
#[derive(Debug, Clone)]
pub struct Canvas {
    size: SurfaceSize,
    background: Color,
    pixels: Vec<[u8; 4]>,
}

impl Canvas {
    /// Create a canvas filled with `background`. Each side is brought into
    /// `1..=SurfaceSize::MAX_SIDE`.
    pub fn new(size: SurfaceSize, background: Color) -> Self {
        let size = size.clamped();
        let bg = background.to_rgba8();
        Self {
            size,
            background,
            pixels: vec![bg; size.pixel_count()],
        }
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn pixels(&self) -> &[[u8; 4]] {
        &self.pixels
    }

    /// Pixel data as a flat byte slice, ready for a texture upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        Some(self.pixels[self.index(x, y)])
    }

    pub fn to_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.size.width, self.size.height, |x, y| {
            Rgba(self.pixels[self.index(x, y)])
        })
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.size.width as usize + x as usize
    }

    /// Pixel-index bounds of a box around `min..max`, clipped to the canvas.
    fn clip(&self, min: Vec2, max: Vec2) -> Option<(u32, u32, u32, u32)> {
        if !min.is_finite() || !max.is_finite() {
            return None;
        }
        let w = self.size.width as f32;
        let h = self.size.height as f32;
        if max.x < 0.0 || max.y < 0.0 || min.x >= w || min.y >= h {
            return None;
        }
        let x0 = min.x.floor().max(0.0) as u32;
        let y0 = min.y.floor().max(0.0) as u32;
        let x1 = (max.x.ceil().min(w - 1.0)) as u32;
        let y1 = (max.y.ceil().min(h - 1.0)) as u32;
        Some((x0, y0, x1, y1))
    }

    fn blend(&mut self, x: u32, y: u32, color: Color, coverage: f32) {
        let alpha = color.a * coverage;
        if alpha <= 0.0 {
            return;
        }
        let idx = self.index(x, y);
        let dst = self.pixels[idx];
        let da = dst[3] as f32 / 255.0;
        let out_a = alpha + da * (1.0 - alpha);
        if out_a <= 0.0 {
            return;
        }
        let mix = |s: f32, d: u8| {
            let d = d as f32 / 255.0;
            ((s * alpha + d * da * (1.0 - alpha)) / out_a * 255.0)
                .round()
                .clamp(0.0, 255.0) as u8
        };
        self.pixels[idx] = [
            mix(color.r, dst[0]),
            mix(color.g, dst[1]),
            mix(color.b, dst[2]),
            (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
        ];
    }
}

/// Distance from `p` to the segment `a..b`.
fn distance_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f32::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

impl Surface for Canvas {
    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn resize(&mut self, size: SurfaceSize) {
        let size = size.clamped();
        if size == self.size {
            return;
        }
        self.size = size;
        self.pixels
            .resize(size.pixel_count(), self.background.to_rgba8());
    }

    fn clear(&mut self) {
        self.pixels.fill(self.background.to_rgba8());
    }

    fn line(&mut self, from: Vec2, to: Vec2, color: Color, width: f32) {
        if !(width > 0.0) {
            return;
        }
        // Hairlines keep a one-pixel footprint and lose opacity instead.
        let half = width.max(1.0) * 0.5;
        let thinness = width.min(1.0);
        let pad = Vec2::splat(half + 1.0);
        let Some((x0, y0, x1, y1)) = self.clip(from.min(to) - pad, from.max(to) + pad) else {
            return;
        };
        for y in y0..=y1 {
            for x in x0..=x1 {
                let center = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let d = distance_to_segment(center, from, to);
                let coverage = (half + 0.5 - d).clamp(0.0, 1.0) * thinness;
                if coverage > 0.0 {
                    self.blend(x, y, color, coverage);
                }
            }
        }
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        if !(radius > 0.0) {
            return;
        }
        let pad = Vec2::splat(radius + 1.0);
        let Some((x0, y0, x1, y1)) = self.clip(center - pad, center + pad) else {
            return;
        };
        // Sub-pixel discs fade out with their area.
        let small = (radius * 2.0).min(1.0);
        for y in y0..=y1 {
            for x in x0..=x1 {
                let d = Vec2::new(x as f32 + 0.5, y as f32 + 0.5).distance(center);
                let coverage = (radius.max(0.5) + 0.5 - d).clamp(0.0, 1.0) * small;
                if coverage > 0.0 {
                    self.blend(x, y, color, coverage);
                }
            }
        }
    }

    fn fill_radial_gradient(&mut self, center: Vec2, radius: f32, stops: &[GradientStop]) {
        if !(radius > 0.0) || stops.is_empty() {
            return;
        }
        let pad = Vec2::splat(radius);
        let Some((x0, y0, x1, y1)) = self.clip(center - pad, center + pad) else {
            return;
        };
        for y in y0..=y1 {
            for x in x0..=x1 {
                let d = Vec2::new(x as f32 + 0.5, y as f32 + 0.5).distance(center);
                if d > radius {
                    continue;
                }
                let color = sample_gradient(stops, d / radius);
                self.blend(x, y, color, 1.0);
            }
        }
    }
}
