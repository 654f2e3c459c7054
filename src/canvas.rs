// ============================================================================
// PIXEL CANVAS
// ============================================================================
//
// Software rasterizer over an RGBA frame buffer (the layout `pixels` hands
// out). Implements `Surface`, so a `Scene` can be replayed straight into a
// window frame or into an in-memory buffer.

use std::f32::consts::TAU;
use std::path::Path;

use rusttype::{point, Font, PositionedGlyph, Scale};
use tracing::debug;

use crate::config::Color;
use crate::error::{GaugeError, Result};
use crate::scene::{Rect, Style, Surface};

/// Common locations of a sans-serif TrueType font.
const SYSTEM_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

pub fn load_font(data: Vec<u8>) -> Result<Font<'static>> {
    Font::try_from_vec(data).ok_or_else(|| GaugeError::Font("unsupported font data".to_string()))
}

pub fn load_font_file(path: &Path) -> Result<Font<'static>> {
    let data = std::fs::read(path)
        .map_err(|e| GaugeError::Font(format!("{}: {e}", path.display())))?;
    load_font(data)
}

/// First usable font from [`SYSTEM_FONT_PATHS`].
pub fn system_font() -> Option<Font<'static>> {
    SYSTEM_FONT_PATHS.iter().find_map(|path| {
        let font = load_font_file(Path::new(path)).ok()?;
        debug!(path, "loaded system font");
        Some(font)
    })
}

pub struct PixelCanvas<'a> {
    frame: &'a mut [u8],
    width: usize,
    height: usize,
    font: Option<&'a Font<'static>>,
}

impl<'a> PixelCanvas<'a> {
    /// `frame` holds `width * height` RGBA pixels.
    pub fn new(frame: &'a mut [u8], width: usize, height: usize) -> Self {
        Self {
            frame,
            width,
            height,
            font: None,
        }
    }

    /// Without a font, text commands draw nothing.
    pub fn with_font(mut self, font: Option<&'a Font<'static>>) -> Self {
        self.font = font;
        self
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) * 4;
        let px = self.frame.get(idx..idx + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: Color, alpha: f32) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let idx = (y as usize * self.width + x as usize) * 4;
        let Some(dst) = self.frame.get_mut(idx..idx + 4) else {
            return;
        };
        let a = alpha.clamp(0.0, 1.0);
        let blend = |src: u8, dst: u8| (src as f32 * a + dst as f32 * (1.0 - a)).round() as u8;
        dst[0] = blend(color.r, dst[0]);
        dst[1] = blend(color.g, dst[1]);
        dst[2] = blend(color.b, dst[2]);
        dst[3] = 0xff;
    }

    /// Pixel range covering `center ± extent`, limited to the canvas.
    fn span(center: f32, extent: f32, limit: usize) -> std::ops::Range<i32> {
        let lo = (center - extent - 1.0).floor().max(0.0) as i32;
        let hi = (center + extent + 1.0).ceil().min(limit as f32) as i32;
        lo..hi.max(lo)
    }

    /// Ring between `inner` and `outer`, restricted to the angular window
    /// `[start, start + sweep]` (radians, clockwise, wrapping past 2π).
    fn fill_ring(
        &mut self,
        cx: f32,
        cy: f32,
        inner: f32,
        outer: f32,
        start: f32,
        sweep: f32,
        color: Color,
    ) {
        let full_circle = sweep >= TAU;
        for y in Self::span(cy, outer, self.height) {
            for x in Self::span(cx, outer, self.width) {
                let dx = x as f32 - cx;
                let dy = y as f32 - cy;
                let dist = (dx * dx + dy * dy).sqrt();
                let aa = if dist > outer {
                    1.0 - (dist - outer).min(1.0)
                } else if dist < inner {
                    1.0 - (inner - dist).min(1.0)
                } else {
                    1.0
                };
                if aa <= 0.0 {
                    continue;
                }
                if !full_circle && (dy.atan2(dx) - start).rem_euclid(TAU) > sweep {
                    continue;
                }
                self.set_pixel(x, y, color, aa);
            }
        }
    }

    fn thick_line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, thickness: f32, color: Color) {
        let pad = thickness.ceil() + 1.0;
        let (min_x, max_x) = (x0.min(x1) - pad, x0.max(x1) + pad);
        let (min_y, max_y) = (y0.min(y1) - pad, y0.max(y1) + pad);
        let dx = x1 - x0;
        let dy = y1 - y0;
        let len_sq = dx * dx + dy * dy;
        let xs = Self::span((min_x + max_x) / 2.0, (max_x - min_x) / 2.0, self.width);
        let ys = Self::span((min_y + max_y) / 2.0, (max_y - min_y) / 2.0, self.height);
        for y in ys {
            for x in xs.clone() {
                let px = x as f32 - x0;
                let py = y as f32 - y0;
                let t = if len_sq > 0.0 {
                    ((px * dx + py * dy) / len_sq).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let lx = x0 + t * dx;
                let ly = y0 + t * dy;
                let dist = ((lx - x as f32).powi(2) + (ly - y as f32).powi(2)).sqrt();
                let aa = (1.0 - (dist - thickness / 2.0).clamp(0.0, 1.0)).clamp(0.0, 1.0);
                if aa > 0.01 {
                    self.set_pixel(x, y, color, aa);
                }
            }
        }
    }
}

impl Surface for PixelCanvas<'_> {
    fn clear(&mut self, color: Color) {
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&[color.r, color.g, color.b, 0xff]);
        }
    }

    fn draw_arc(&mut self, bounds: Rect, start_angle: f32, sweep_angle: f32, style: &Style) {
        if sweep_angle <= 0.0 {
            return;
        }
        let (cx, cy) = bounds.center();
        let radius = bounds.radius();
        let half = style.stroke_width / 2.0;
        self.fill_ring(
            cx,
            cy,
            (radius - half).max(0.0),
            radius + half,
            start_angle.to_radians(),
            sweep_angle.min(360.0).to_radians(),
            style.color,
        );
    }

    fn draw_circle(&mut self, cx: f32, cy: f32, radius: f32, style: &Style) {
        let (inner, outer) = if style.filled {
            (0.0, radius)
        } else {
            let half = style.stroke_width / 2.0;
            ((radius - half).max(0.0), radius + half)
        };
        self.fill_ring(cx, cy, inner, outer, 0.0, TAU, style.color);
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, style: &Style) {
        let Some(font) = self.font else {
            return;
        };
        let scale = Scale::uniform(style.font_size);
        let v_metrics = font.v_metrics(scale);
        let glyphs: Vec<PositionedGlyph> = font
            .layout(text, scale, point(0.0, v_metrics.ascent))
            .collect();

        let (min_x, max_x, min_y, max_y) = glyphs.iter().filter_map(|g| g.pixel_bounding_box()).fold(
            (i32::MAX, i32::MIN, i32::MAX, i32::MIN),
            |(min_x, max_x, min_y, max_y), bb| {
                (
                    min_x.min(bb.min.x),
                    max_x.max(bb.max.x),
                    min_y.min(bb.min.y),
                    max_y.max(bb.max.y),
                )
            },
        );
        let width_px = if min_x < max_x { max_x - min_x } else { 0 };
        let height_px = if min_y < max_y { max_y - min_y } else { 0 };
        let offset_x = x.round() as i32 - width_px / 2;
        let offset_y = y.round() as i32 - height_px / 2;

        for glyph in &glyphs {
            if let Some(bb) = glyph.pixel_bounding_box() {
                glyph.draw(|gx, gy, v| {
                    let px = offset_x + gx as i32 + bb.min.x - min_x;
                    let py = offset_y + gy as i32 + bb.min.y - min_y;
                    self.set_pixel(px, py, style.color, v);
                });
            }
        }
    }

    fn draw_line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, style: &Style) {
        self.thick_line(x0, y0, x1, y1, style.stroke_width, style.color);
    }
}
