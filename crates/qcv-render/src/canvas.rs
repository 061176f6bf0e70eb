//! Thin drawing surface over an RGB image buffer.
//!
//! Geometry comes from `imageproc`; text is drawn from the public-domain
//! 8×8 bitmap font in `font8x8`, scaled by an integer factor.

use std::path::Path;

use font8x8::{BASIC_FONTS, UnicodeFonts};
use image::{ImageFormat, Rgb, RgbImage};
use imageproc::drawing::{
    draw_filled_circle_mut, draw_filled_rect_mut, draw_hollow_circle_mut, draw_hollow_rect_mut,
    draw_line_segment_mut,
};
use imageproc::rect::Rect;

use crate::error::{RenderError, RenderResult};

/// Largest accepted image area, in pixels (64 Mpx, 192 MiB of RGB).
pub const MAX_PIXELS: u64 = 1 << 26;

/// Glyph cell size of the bitmap font before scaling.
pub const GLYPH_SIZE: u32 = 8;

/// Common colours.
pub mod color {
    use image::Rgb;

    pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
    pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
    pub const GREY: Rgb<u8> = Rgb([128, 128, 128]);
    pub const LIGHT_GREY: Rgb<u8> = Rgb([204, 204, 204]);
    pub const RED: Rgb<u8> = Rgb([255, 0, 0]);
    pub const BLUE: Rgb<u8> = Rgb([31, 119, 180]);
}

/// Mutable RGB drawing surface.
pub struct Canvas {
    image: RgbImage,
}

impl Canvas {
    /// Allocate a canvas filled with `background`.
    pub fn new(width: u64, height: u64, background: Rgb<u8>) -> RenderResult<Self> {
        let area = width.checked_mul(height).unwrap_or(u64::MAX);
        if width == 0 || height == 0 || area > MAX_PIXELS {
            return Err(RenderError::TooLarge {
                width,
                height,
                max: MAX_PIXELS,
            });
        }
        // Each side is at most MAX_PIXELS, well inside u32.
        let image = RgbImage::from_pixel(width as u32, height as u32, background);
        Ok(Self { image })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Colour of one pixel, `None` outside the canvas.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb<u8>> {
        self.image.get_pixel_checked(x, y).copied()
    }

    /// One-pixel line segment.
    pub fn line(&mut self, from: (f32, f32), to: (f32, f32), color: Rgb<u8>) {
        draw_line_segment_mut(&mut self.image, from, to, color);
    }

    /// Line segment `thickness` pixels wide, drawn as parallel offsets.
    pub fn thick_line(&mut self, from: (f32, f32), to: (f32, f32), thickness: u32, color: Rgb<u8>) {
        let (dx, dy) = (to.0 - from.0, to.1 - from.1);
        let len = (dx * dx + dy * dy).sqrt();
        if thickness <= 1 || len == 0.0 {
            self.line(from, to, color);
            return;
        }
        let (nx, ny) = (-dy / len, dx / len);
        let half = (thickness as f32 - 1.0) / 2.0;
        for i in 0..thickness {
            let off = i as f32 - half;
            self.line(
                (from.0 + nx * off, from.1 + ny * off),
                (to.0 + nx * off, to.1 + ny * off),
                color,
            );
        }
    }

    /// Axis-aligned rectangle with optional fill and outline.
    pub fn rect(
        &mut self,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        fill: Option<Rgb<u8>>,
        stroke: Option<Rgb<u8>>,
    ) {
        if width == 0 || height == 0 {
            return;
        }
        let rect = Rect::at(x, y).of_size(width, height);
        if let Some(fill) = fill {
            draw_filled_rect_mut(&mut self.image, rect, fill);
        }
        if let Some(stroke) = stroke {
            draw_hollow_rect_mut(&mut self.image, rect, stroke);
        }
    }

    /// Circle with optional fill and outline.
    pub fn circle(
        &mut self,
        center: (i32, i32),
        radius: i32,
        fill: Option<Rgb<u8>>,
        stroke: Option<Rgb<u8>>,
    ) {
        if let Some(fill) = fill {
            draw_filled_circle_mut(&mut self.image, center, radius, fill);
        }
        if let Some(stroke) = stroke {
            draw_hollow_circle_mut(&mut self.image, center, radius, stroke);
        }
    }

    /// Pixel width of `text` at `scale`.
    pub fn text_width(text: &str, scale: u32) -> u32 {
        text.chars().count() as u32 * GLYPH_SIZE * scale
    }

    /// Draw `text` with its top-left corner at `(x, y)`.
    pub fn text(&mut self, x: i32, y: i32, text: &str, scale: u32, color: Rgb<u8>) {
        self.glyph_run(text, scale, color, |gx, gy| (x + gx, y + gy));
    }

    /// Draw `text` centred on `(cx, cy)`.
    pub fn text_centered(&mut self, cx: i32, cy: i32, text: &str, scale: u32, color: Rgb<u8>) {
        let w = Self::text_width(text, scale) as i32;
        let h = (GLYPH_SIZE * scale) as i32;
        self.text(cx - w / 2, cy - h / 2, text, scale, color);
    }

    /// Draw `text` rotated a quarter turn counter-clockwise, reading bottom
    /// to top, centred on `(cx, cy)`.
    pub fn text_vertical(&mut self, cx: i32, cy: i32, text: &str, scale: u32, color: Rgb<u8>) {
        let w = Self::text_width(text, scale) as i32;
        let h = (GLYPH_SIZE * scale) as i32;
        let (left, bottom) = (cx - h / 2, cy + w / 2);
        self.glyph_run(text, scale, color, |gx, gy| (left + gy, bottom - gx));
    }

    /// Rasterise glyph pixels, mapping horizontal-layout offsets through
    /// `place`.
    fn glyph_run<F>(&mut self, text: &str, scale: u32, color: Rgb<u8>, place: F)
    where
        F: Fn(i32, i32) -> (i32, i32),
    {
        let scale = scale.max(1) as i32;
        let advance = GLYPH_SIZE as i32 * scale;
        for (i, ch) in text.chars().enumerate() {
            let glyph = BASIC_FONTS
                .get(ch)
                .or_else(|| BASIC_FONTS.get('?'))
                .unwrap_or([0; 8]);
            let origin = i as i32 * advance;
            for (row, bits) in glyph.iter().enumerate() {
                for col in 0..8 {
                    if bits & (1 << col) == 0 {
                        continue;
                    }
                    for sy in 0..scale {
                        for sx in 0..scale {
                            let (px, py) =
                                place(origin + col * scale + sx, row as i32 * scale + sy);
                            self.put(px, py, color);
                        }
                    }
                }
            }
        }
    }

    fn put(&mut self, x: i32, y: i32, color: Rgb<u8>) {
        if x >= 0 && y >= 0 && (x as u32) < self.width() && (y as u32) < self.height() {
            self.image.put_pixel(x as u32, y as u32, color);
        }
    }

    /// Encode as PNG at `path`.
    pub fn save_png(&self, path: impl AsRef<Path>) -> RenderResult<()> {
        self.image.save_with_format(path, ImageFormat::Png)?;
        Ok(())
    }
}
