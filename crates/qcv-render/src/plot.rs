//! Two-dimensional line and scatter plots.
//!
//! A [`Plot`] holds any number of [`Series`], each drawn either as a
//! polyline or as `x` markers, on a shared pair of linear axes with ticks,
//! axis titles and a legend in the upper-right corner.

use std::path::Path;

use image::Rgb;
use tracing::debug;

use crate::canvas::{Canvas, GLYPH_SIZE, color};
use crate::error::{RenderError, RenderResult};

/// How a series is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SeriesStyle {
    /// Connected polyline of the given width.
    Line {
        /// Stroke width in pixels.
        width: u32,
    },
    /// Unconnected `x` markers of the given half-size.
    Cross {
        /// Half the marker's side in pixels.
        size: f32,
    },
}

/// One labelled data set.
#[derive(Debug, Clone)]
pub struct Series {
    label: String,
    xs: Vec<f64>,
    ys: Vec<f64>,
    color: Rgb<u8>,
    style: SeriesStyle,
}

impl Series {
    /// Polyline series in the default line colour.
    pub fn line(label: impl Into<String>, xs: Vec<f64>, ys: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            xs,
            ys,
            color: color::BLUE,
            style: SeriesStyle::Line { width: 2 },
        }
    }

    /// Marker series in the default marker colour.
    pub fn crosses(label: impl Into<String>, xs: Vec<f64>, ys: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            xs,
            ys,
            color: color::RED,
            style: SeriesStyle::Cross { size: 4.0 },
        }
    }

    fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.xs
            .iter()
            .copied()
            .zip(self.ys.iter().copied())
            .filter(|(x, y)| x.is_finite() && y.is_finite())
    }
}

/// Axis bounds in data coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Left edge.
    pub x_min: f64,
    /// Right edge.
    pub x_max: f64,
    /// Bottom edge.
    pub y_min: f64,
    /// Top edge.
    pub y_max: f64,
}

/// A figure with shared axes.
#[derive(Debug, Clone)]
pub struct Plot {
    width: u32,
    height: u32,
    x_label: String,
    y_label: String,
    series: Vec<Series>,
}

impl Default for Plot {
    fn default() -> Self {
        Self::new()
    }
}

const MARGIN_LEFT: u32 = 80;
const MARGIN_RIGHT: u32 = 24;
const MARGIN_TOP: u32 = 36;
const MARGIN_BOTTOM: u32 = 60;
const TICK_LEN: f32 = 5.0;
const TEXT_SCALE: u32 = 1;

/// Fraction of the data range added on each side of the axes.
const AXIS_PADDING: f64 = 0.05;

impl Plot {
    /// Empty 640×480 figure.
    pub fn new() -> Self {
        Self {
            width: 640,
            height: 480,
            x_label: String::new(),
            y_label: String::new(),
            series: Vec::new(),
        }
    }

    /// Set the horizontal axis title.
    pub fn x_label(mut self, label: impl Into<String>) -> Self {
        self.x_label = label.into();
        self
    }

    /// Set the vertical axis title.
    pub fn y_label(mut self, label: impl Into<String>) -> Self {
        self.y_label = label.into();
        self
    }

    /// Add a series. Series are drawn and listed in insertion order.
    pub fn series(mut self, series: Series) -> Self {
        self.series.push(series);
        self
    }

    /// Data bounds over every finite point, padded on each side. An empty
    /// plot spans the unit square.
    pub fn bounds(&self) -> Bounds {
        let mut x = (f64::INFINITY, f64::NEG_INFINITY);
        let mut y = (f64::INFINITY, f64::NEG_INFINITY);
        for (px, py) in self.series.iter().flat_map(Series::points) {
            x = (x.0.min(px), x.1.max(px));
            y = (y.0.min(py), y.1.max(py));
        }
        let (x_min, x_max) = pad_range(x);
        let (y_min, y_max) = pad_range(y);
        Bounds {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    /// Draw the figure.
    pub fn render(&self) -> RenderResult<Canvas> {
        for s in &self.series {
            if s.xs.len() != s.ys.len() {
                return Err(RenderError::SeriesLengthMismatch {
                    label: s.label.clone(),
                    xs: s.xs.len(),
                    ys: s.ys.len(),
                });
            }
        }

        let mut canvas = Canvas::new(u64::from(self.width), u64::from(self.height), color::WHITE)?;
        let frame = Frame::new(self.width, self.height, self.bounds());

        self.draw_axes(&mut canvas, &frame);
        for s in &self.series {
            draw_series(&mut canvas, &frame, s);
        }
        self.draw_legend(&mut canvas, &frame);

        debug!(
            width = self.width,
            height = self.height,
            series = self.series.len(),
            "plot rendered"
        );
        Ok(canvas)
    }

    /// Draw the figure and write it as PNG to `path`.
    pub fn save_png(&self, path: impl AsRef<Path>) -> RenderResult<()> {
        self.render()?.save_png(path)
    }

    fn draw_axes(&self, canvas: &mut Canvas, frame: &Frame) {
        let b = frame.bounds;
        let glyph = (GLYPH_SIZE * TEXT_SCALE) as i32;

        for tick in ticks(b.x_min, b.x_max) {
            let x = frame.px(&tick);
            canvas.line((x, frame.top), (x, frame.bottom), color::LIGHT_GREY);
            canvas.line((x, frame.bottom), (x, frame.bottom + TICK_LEN), color::BLACK);
            canvas.text_centered(
                x as i32,
                (frame.bottom + TICK_LEN) as i32 + glyph,
                &tick.label,
                TEXT_SCALE,
                color::BLACK,
            );
        }
        for tick in ticks(b.y_min, b.y_max) {
            let y = frame.py(&tick);
            canvas.line((frame.left, y), (frame.right, y), color::LIGHT_GREY);
            canvas.line((frame.left - TICK_LEN, y), (frame.left, y), color::BLACK);
            let w = Canvas::text_width(&tick.label, TEXT_SCALE) as i32;
            canvas.text(
                (frame.left - TICK_LEN) as i32 - 4 - w,
                y as i32 - glyph / 2,
                &tick.label,
                TEXT_SCALE,
                color::BLACK,
            );
        }

        canvas.rect(
            frame.left as i32,
            frame.top as i32,
            (frame.right - frame.left) as u32 + 1,
            (frame.bottom - frame.top) as u32 + 1,
            None,
            Some(color::BLACK),
        );

        let mid_x = ((frame.left + frame.right) / 2.0) as i32;
        let mid_y = ((frame.top + frame.bottom) / 2.0) as i32;
        if !self.x_label.is_empty() {
            canvas.text_centered(
                mid_x,
                self.height as i32 - MARGIN_BOTTOM as i32 / 3,
                &self.x_label,
                TEXT_SCALE + 1,
                color::BLACK,
            );
        }
        if !self.y_label.is_empty() {
            canvas.text_vertical(
                MARGIN_LEFT as i32 / 4,
                mid_y,
                &self.y_label,
                TEXT_SCALE + 1,
                color::BLACK,
            );
        }
    }

    fn draw_legend(&self, canvas: &mut Canvas, frame: &Frame) {
        if self.series.is_empty() {
            return;
        }
        let line_h = 18;
        let sample_w = 24;
        let text_w = self
            .series
            .iter()
            .map(|s| Canvas::text_width(&s.label, TEXT_SCALE))
            .max()
            .unwrap_or(0);
        let box_w = sample_w + text_w + 24;
        let box_h = line_h * self.series.len() as u32 + 8;
        let x0 = frame.right as i32 - box_w as i32 - 8;
        let y0 = frame.top as i32 + 8;

        canvas.rect(x0, y0, box_w, box_h, Some(color::WHITE), Some(color::GREY));
        for (i, s) in self.series.iter().enumerate() {
            let cy = (y0 + 4 + line_h as i32 * i as i32 + line_h as i32 / 2) as f32;
            let sx = (x0 + 8) as f32;
            match s.style {
                SeriesStyle::Line { width } => {
                    canvas.thick_line((sx, cy), (sx + sample_w as f32, cy), width, s.color);
                }
                SeriesStyle::Cross { size } => {
                    draw_cross(canvas, sx + sample_w as f32 / 2.0, cy, size, s.color);
                }
            }
            canvas.text(
                x0 + 16 + sample_w as i32,
                cy as i32 - (GLYPH_SIZE * TEXT_SCALE) as i32 / 2,
                &s.label,
                TEXT_SCALE,
                color::BLACK,
            );
        }
    }
}

/// Pixel rectangle of the axes and its mapping from data coordinates.
#[derive(Debug, Clone, Copy)]
struct Frame {
    left: f32,
    right: f32,
    top: f32,
    bottom: f32,
    bounds: Bounds,
}

impl Frame {
    fn new(width: u32, height: u32, bounds: Bounds) -> Self {
        let right = width.saturating_sub(MARGIN_RIGHT).max(MARGIN_LEFT + 1);
        let bottom = height.saturating_sub(MARGIN_BOTTOM).max(MARGIN_TOP + 1);
        Self {
            left: MARGIN_LEFT as f32,
            right: right as f32,
            top: MARGIN_TOP as f32,
            bottom: bottom as f32,
            bounds,
        }
    }

    fn px(&self, tick: &Tick) -> f32 {
        self.map_x(tick.value)
    }

    fn py(&self, tick: &Tick) -> f32 {
        self.map_y(tick.value)
    }

    fn map_x(&self, x: f64) -> f32 {
        let b = self.bounds;
        let t = (x - b.x_min) / (b.x_max - b.x_min);
        self.left + (t as f32) * (self.right - self.left)
    }

    fn map_y(&self, y: f64) -> f32 {
        let b = self.bounds;
        let t = (b.y_max - y) / (b.y_max - b.y_min);
        self.top + (t as f32) * (self.bottom - self.top)
    }
}

fn draw_series(canvas: &mut Canvas, frame: &Frame, series: &Series) {
    match series.style {
        SeriesStyle::Line { width } => {
            let pts: Vec<(f32, f32)> = series
                .points()
                .map(|(x, y)| (frame.map_x(x), frame.map_y(y)))
                .collect();
            for seg in pts.windows(2) {
                canvas.thick_line(seg[0], seg[1], width, series.color);
            }
        }
        SeriesStyle::Cross { size } => {
            for (x, y) in series.points() {
                draw_cross(canvas, frame.map_x(x), frame.map_y(y), size, series.color);
            }
        }
    }
}

fn draw_cross(canvas: &mut Canvas, x: f32, y: f32, s: f32, color: Rgb<u8>) {
    canvas.line((x - s, y - s), (x + s, y + s), color);
    canvas.line((x - s, y + s), (x + s, y - s), color);
}

fn pad_range((lo, hi): (f64, f64)) -> (f64, f64) {
    if !(lo.is_finite() && hi.is_finite()) {
        return (0.0, 1.0);
    }
    if hi - lo <= f64::EPSILON * lo.abs().max(1.0) {
        let half = if lo == 0.0 { 0.5 } else { lo.abs() * 0.1 };
        return (lo - half, hi + half);
    }
    let pad = (hi - lo) * AXIS_PADDING;
    (lo - pad, hi + pad)
}

/// One labelled tick position.
#[derive(Debug, Clone, PartialEq)]
struct Tick {
    value: f64,
    label: String,
}

/// Round tick positions covering `[lo, hi]`, spaced 1, 2 or 5 × 10ⁿ apart.
fn ticks(lo: f64, hi: f64) -> Vec<Tick> {
    let step = nice_step((hi - lo) / 5.0);
    if !(step.is_finite() && step > 0.0) {
        return Vec::new();
    }
    let decimals = (-step.log10().floor()).max(0.0) as usize;
    let first = (lo / step).ceil() as i64;
    let last = (hi / step).floor() as i64;
    (first..=last)
        .map(|k| {
            let mut value = k as f64 * step;
            if value.abs() < step * 1e-9 {
                value = 0.0;
            }
            Tick {
                value,
                label: format!("{value:.decimals$}"),
            }
        })
        .collect()
}

fn nice_step(raw: f64) -> f64 {
    if !(raw.is_finite() && raw > 0.0) {
        return 0.0;
    }
    let magnitude = 10f64.powf(raw.log10().floor());
    let residual = raw / magnitude;
    let nice = if residual <= 1.0 {
        1.0
    } else if residual <= 2.0 {
        2.0
    } else if residual <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}
