//! Square ARGB raster the pen inks onto.
//!
//! World coordinates `[-100, 100]²` (y down) map onto the whole canvas, so
//! `(x + 100) * size / 200` gives the pixel column and likewise for rows.

use std::path::Path;

use super::colors;
use crate::error::Result;
use crate::face::VIEWPORT_HALF_EXTENT;
use crate::math::vec2::Point2;
use crate::pen::Pen;

/// Canvas side in pixels.
pub const DEFAULT_CANVAS_SIZE: u32 = 2048;

/// Default ink alpha when no opacity was ever set.
const DEFAULT_INK_ALPHA: f32 = 1.0;

/// Lines are stamped as `PEN_WIDTH x PEN_WIDTH` pixel squares.
const PEN_WIDTH: i32 = 2;

/// World-space slack around the viewport kept when clipping lines, so
/// strokes along the border still reach the edge pixels.
const CLIP_MARGIN: f32 = 2.0;

pub struct Canvas {
    color_buffer: Vec<u32>,
    size: u32,
    background: u32,
    ink: u32,
    ink_alpha: f32,
    opacity_locked: bool,
    position: Point2,
}

impl Canvas {
    pub fn new(size: u32) -> Self {
        Self {
            color_buffer: vec![colors::WHITE; (size * size) as usize],
            size,
            background: colors::WHITE,
            ink: colors::BLACK,
            ink_alpha: DEFAULT_INK_ALPHA,
            opacity_locked: false,
            position: Point2::ZERO,
        }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn background(&self) -> u32 {
        self.background
    }

    /// Chooses the colour scheme and ink alpha. Only the first call counts.
    ///
    /// `opacity` is clamped to `[-1, 1]`. A negative value selects white ink
    /// on black, a positive one black ink on white, and `|opacity|` is the
    /// alpha every stroke is blended with.
    pub fn set_pen_opacity(&mut self, opacity: f32) {
        if self.opacity_locked {
            return;
        }
        self.opacity_locked = true;

        let opacity = opacity.clamp(-1.0, 1.0);
        if opacity < 0.0 {
            self.background = colors::BLACK;
            self.ink = colors::WHITE;
        } else {
            self.background = colors::WHITE;
            self.ink = colors::BLACK;
        }
        self.ink_alpha = opacity.abs();
        self.clear();
    }

    pub fn clear(&mut self) {
        self.color_buffer.fill(self.background);
    }

    /// Maps a world point to fractional pixel coordinates.
    pub fn world_to_canvas(&self, p: Point2) -> (f32, f32) {
        let scale = self.size as f32 / (2.0 * VIEWPORT_HALF_EXTENT);
        (
            (p.x + VIEWPORT_HALF_EXTENT) * scale,
            (p.y + VIEWPORT_HALF_EXTENT) * scale,
        )
    }

    pub fn get_pixel(&self, x: i32, y: i32) -> Option<u32> {
        if x >= 0 && x < self.size as i32 && y >= 0 && y < self.size as i32 {
            Some(self.color_buffer[(y as u32 * self.size + x as u32) as usize])
        } else {
            None
        }
    }

    #[inline]
    fn blend_pixel(&mut self, x: i32, y: i32) {
        if x >= 0 && x < self.size as i32 && y >= 0 && y < self.size as i32 {
            let index = (y as u32 * self.size + x as u32) as usize;
            self.color_buffer[index] = blend(self.color_buffer[index], self.ink, self.ink_alpha);
        }
    }

    #[inline]
    fn stamp(&mut self, x: i32, y: i32) {
        for dy in 0..PEN_WIDTH {
            for dx in 0..PEN_WIDTH {
                self.blend_pixel(x + dx, y + dy);
            }
        }
    }

    /// Draws a line between two points using Bresenham's line algorithm.
    ///
    /// The error term tracks the distance between the ideal line and the
    /// current pixel; once it crosses a threshold the walk also steps along
    /// the minor axis. Both steps in one iteration make a diagonal move.
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) {
        let dx = (x1 - x0).abs();
        let dy = (y1 - y0).abs();
        let x_incr_direction = if x0 < x1 { 1 } else { -1 };
        let y_incr_direction = if y0 < y1 { 1 } else { -1 };

        let mut err = dx - dy;
        let mut x = x0;
        let mut y = y0;

        loop {
            self.stamp(x, y);
            if x == x1 && y == y1 {
                break;
            }

            let e2 = 2 * err;
            if e2 > -dy {
                err -= dy;
                x += x_incr_direction;
            }
            if e2 < dx {
                err += dx;
                y += y_incr_direction;
            }
        }
    }

    /// Draws a world-space line.
    ///
    /// The line is first cut to the viewport plus a small margin, so far
    /// off-screen endpoints never turn into long pixel walks.
    pub fn draw_world_line(&mut self, from: Point2, to: Point2) {
        let Some((from, to)) = clip_to_window(from, to, VIEWPORT_HALF_EXTENT + CLIP_MARGIN) else {
            return;
        };
        let (x0, y0) = self.world_to_canvas(from);
        let (x1, y1) = self.world_to_canvas(to);
        self.draw_line(x0 as i32, y0 as i32, x1 as i32, y1 as i32);
    }

    /// Raw ARGB8888 bytes for streaming into a texture.
    pub fn as_bytes(&self) -> &[u8] {
        // SAFETY: u32 has no padding and a stricter alignment than u8; the
        // byte view covers exactly the buffer and borrows it immutably.
        unsafe {
            std::slice::from_raw_parts(
                self.color_buffer.as_ptr() as *const u8,
                self.color_buffer.len() * 4,
            )
        }
    }

    pub fn to_image(&self) -> image::RgbaImage {
        image::RgbaImage::from_fn(self.size, self.size, |x, y| {
            let argb = self.color_buffer[(y * self.size + x) as usize];
            let [a, r, g, b] = argb.to_be_bytes();
            image::Rgba([r, g, b, a])
        })
    }

    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.to_image()
            .save_with_format(path.as_ref(), image::ImageFormat::Png)?;
        log::info!("wrote {}", path.as_ref().display());
        Ok(())
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(DEFAULT_CANVAS_SIZE)
    }
}

impl Pen for Canvas {
    fn position(&self) -> Point2 {
        self.position
    }

    fn move_to(&mut self, point: Point2, draw: bool) {
        if draw {
            self.draw_world_line(self.position, point);
        }
        self.position = point;
    }
}

/// Liang-Barsky clip of `from -> to` against the square `[-limit, limit]²`.
///
/// `None` when nothing of the segment is inside or an endpoint is not
/// finite.
fn clip_to_window(from: Point2, to: Point2, limit: f32) -> Option<(Point2, Point2)> {
    if ![from.x, from.y, to.x, to.y].iter().all(|c| c.is_finite()) {
        return None;
    }

    let d = to - from;
    let (mut t0, mut t1) = (0.0_f32, 1.0_f32);
    let bounds = [
        (-d.x, from.x + limit),
        (d.x, limit - from.x),
        (-d.y, from.y + limit),
        (d.y, limit - from.y),
    ];
    for (p, q) in bounds {
        if p == 0.0 {
            // Parallel to this side.
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            if t > t1 {
                return None;
            }
            t0 = t0.max(t);
        } else {
            if t < t0 {
                return None;
            }
            t1 = t1.min(t);
        }
    }
    Some((from + d * t0, from + d * t1))
}

/// Blends `src` over `dst` per colour channel; the result is opaque.
fn blend(dst: u32, src: u32, alpha: f32) -> u32 {
    let [_, dr, dg, db] = dst.to_be_bytes();
    let [_, sr, sg, sb] = src.to_be_bytes();
    let mix = |d: u8, s: u8| (d as f32 + (s as f32 - d as f32) * alpha).round() as u8;
    u32::from_be_bytes([0xFF, mix(dr, sr), mix(dg, sg), mix(db, sb)])
}
