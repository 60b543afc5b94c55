//! Line-and-marker time-series charts.
//!
//! The x axis is categorical (one slot per label, in order), the y axis is
//! linear with "nice" tick values. Tick labels on the x axis are drawn
//! rotated so that long `HH:MM:SS` labels do not overlap.

use image::{imageops, Rgba, RgbaImage};
use imageproc::drawing::{
    draw_filled_circle_mut, draw_hollow_rect_mut, draw_line_segment_mut, draw_text_mut, text_size,
};
use imageproc::geometric_transformations::{rotate_about_center, Interpolation};
use imageproc::rect::Rect;
use rusttype::{Font, Scale};

use crate::error::{RenderError, RenderResult};
use crate::png::create_png;

/// Embedded font data - DejaVu Sans Mono (a clean, readable monospace font)
const FONT_DATA: &[u8] = include_bytes!("../assets/DejaVuSansMono.ttf");

const MARGIN_LEFT: u32 = 90;
const MARGIN_RIGHT: u32 = 30;
const MARGIN_TOP: u32 = 50;
const MARGIN_BOTTOM: u32 = 110;

/// Parallel labels and values to plot.
#[derive(Debug, Clone)]
pub struct ChartData {
    pub title: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl ChartData {
    pub fn new(title: impl Into<String>, labels: Vec<String>, values: Vec<f64>) -> Self {
        Self {
            title: title.into(),
            labels,
            values,
        }
    }

    fn validate(&self) -> RenderResult<()> {
        if self.labels.len() != self.values.len() {
            return Err(RenderError::LengthMismatch {
                labels: self.labels.len(),
                values: self.values.len(),
            });
        }
        if self.values.is_empty() {
            return Err(RenderError::Empty);
        }
        if !self.values.iter().any(|v| v.is_finite()) {
            return Err(RenderError::NoFiniteValues);
        }
        Ok(())
    }
}

/// Visual configuration for [`render_line_chart`].
#[derive(Debug, Clone)]
pub struct ChartStyle {
    pub width: u32,
    pub height: u32,
    pub x_label: String,
    pub y_label: String,
    pub background: Rgba<u8>,
    pub line_color: Rgba<u8>,
    pub axis_color: Rgba<u8>,
    pub grid_color: Rgba<u8>,
    pub text_color: Rgba<u8>,
    /// Dash and gap lengths in pixels; a zero gap draws a solid line
    pub dash: (f32, f32),
    pub marker_radius: i32,
    /// Counter-clockwise rotation of x tick labels in degrees
    pub x_label_rotation: f32,
    pub font_size: f32,
    pub title_font_size: f32,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 600,
            x_label: "Time (UTC)".to_string(),
            y_label: "Temperature (°C)".to_string(),
            background: Rgba([255, 255, 255, 255]),
            line_color: Rgba([128, 0, 128, 255]),
            axis_color: Rgba([0, 0, 0, 255]),
            grid_color: Rgba([210, 210, 210, 255]),
            text_color: Rgba([0, 0, 0, 255]),
            dash: (8.0, 5.0),
            marker_radius: 4,
            x_label_rotation: 45.0,
            font_size: 13.0,
            title_font_size: 16.0,
        }
    }
}

/// Pixel geometry of the plot area for a given data set.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartLayout {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
    pub count: usize,
    /// Y tick values, ascending; the first and last bound the y range
    pub y_ticks: Vec<f64>,
}

impl ChartLayout {
    pub fn new(style: &ChartStyle, values: &[f64]) -> RenderResult<Self> {
        if style.width <= MARGIN_LEFT + MARGIN_RIGHT || style.height <= MARGIN_TOP + MARGIN_BOTTOM {
            return Err(RenderError::InvalidSize {
                width: style.width,
                height: style.height,
            });
        }

        let (min, max) = values
            .iter()
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        if !min.is_finite() {
            return Err(RenderError::NoFiniteValues);
        }

        Ok(Self {
            left: MARGIN_LEFT as f32,
            right: (style.width - MARGIN_RIGHT) as f32,
            top: MARGIN_TOP as f32,
            bottom: (style.height - MARGIN_BOTTOM) as f32,
            count: values.len(),
            y_ticks: nice_ticks(min, max, 6),
        })
    }

    /// Pixel x of the i-th category, with 5% padding on both sides.
    pub fn x_for(&self, index: usize) -> f32 {
        let width = self.right - self.left;
        let pad = width * 0.05;
        if self.count <= 1 {
            return self.left + width / 2.0;
        }
        self.left + pad + (width - 2.0 * pad) * index as f32 / (self.count - 1) as f32
    }

    /// Pixel y of a value on the tick-bounded axis.
    pub fn y_for(&self, value: f64) -> f32 {
        let lo = self.y_ticks[0];
        let hi = self.y_ticks[self.y_ticks.len() - 1];
        let frac = ((value - lo) / (hi - lo)) as f32;
        self.bottom - frac * (self.bottom - self.top)
    }
}

/// Tick values covering `[min, max]` with a 1/2/5 × 10^k step.
pub fn nice_ticks(min: f64, max: f64, target: usize) -> Vec<f64> {
    let (min, max) = if (max - min).abs() < f64::EPSILON {
        (min - 1.0, max + 1.0)
    } else {
        (min, max)
    };

    let raw_step = (max - min) / target.max(1) as f64;
    let magnitude = 10f64.powf(raw_step.log10().floor());
    let step = [1.0, 2.0, 5.0, 10.0]
        .iter()
        .map(|m| m * magnitude)
        .find(|s| *s >= raw_step)
        .unwrap_or(10.0 * magnitude);

    let start = (min / step).floor() as i64;
    let end = (max / step).ceil() as i64;
    (start..=end).map(|i| i as f64 * step).collect()
}

/// Show every n-th x label so that labels are at least `min_spacing` apart.
pub fn label_stride(count: usize, available: f32, min_spacing: f32) -> usize {
    if count <= 1 || min_spacing <= 0.0 {
        return 1;
    }
    let spacing = available / (count - 1) as f32;
    ((min_spacing / spacing).ceil() as usize).max(1)
}

fn tick_decimals(ticks: &[f64]) -> usize {
    if ticks.len() < 2 {
        return 0;
    }
    let step = ticks[1] - ticks[0];
    if step >= 1.0 {
        0
    } else {
        (-step.log10() - 1e-9).ceil() as usize
    }
}

/// Render a line-and-marker chart of `data`.
pub fn render_line_chart(data: &ChartData, style: &ChartStyle) -> RenderResult<RgbaImage> {
    data.validate()?;
    let layout = ChartLayout::new(style, &data.values)?;
    let font = Font::try_from_bytes(FONT_DATA).ok_or(RenderError::Font)?;
    let scale = Scale::uniform(style.font_size);

    let mut img = RgbaImage::from_pixel(style.width, style.height, style.background);

    // Horizontal grid lines and y tick labels
    let decimals = tick_decimals(&layout.y_ticks);
    for &tick in &layout.y_ticks {
        let y = layout.y_for(tick);
        draw_line_segment_mut(&mut img, (layout.left, y), (layout.right, y), style.grid_color);

        let text = format!("{:.*}", decimals, tick);
        let (w, h) = text_size(scale, &font, &text);
        draw_text_mut(
            &mut img,
            style.text_color,
            layout.left as i32 - w - 8,
            y as i32 - h / 2,
            scale,
            &font,
            &text,
        );
    }

    // Vertical grid lines and rotated x tick labels
    let (char_w, char_h) = text_size(scale, &font, "0");
    let stride = label_stride(
        data.labels.len(),
        layout.x_for(data.labels.len().saturating_sub(1)) - layout.x_for(0),
        char_h as f32 * 1.8,
    );
    for (i, label) in data.labels.iter().enumerate().step_by(stride) {
        let x = layout.x_for(i);
        draw_line_segment_mut(&mut img, (x, layout.top), (x, layout.bottom), style.grid_color);
        draw_line_segment_mut(
            &mut img,
            (x, layout.bottom),
            (x, layout.bottom + 5.0),
            style.axis_color,
        );
        let text_w = text_size(scale, &font, label).0.max(char_w);
        let angle = style.x_label_rotation.to_radians();
        // Anchor the end of the label just below the tick
        let cx = x - (text_w as f32 / 2.0) * angle.cos();
        let cy = layout.bottom + 10.0 + (text_w as f32 / 2.0) * angle.sin();
        draw_rotated_text(&mut img, (cx, cy), label, style.x_label_rotation, scale, &font, style.text_color);
    }

    // Plot frame
    draw_hollow_rect_mut(
        &mut img,
        Rect::at(layout.left as i32, layout.top as i32).of_size(
            (layout.right - layout.left) as u32 + 1,
            (layout.bottom - layout.top) as u32 + 1,
        ),
        style.axis_color,
    );

    // Title and axis titles
    let title_scale = Scale::uniform(style.title_font_size);
    let (title_w, _) = text_size(title_scale, &font, &data.title);
    draw_text_mut(
        &mut img,
        style.text_color,
        (style.width as i32 - title_w) / 2,
        (MARGIN_TOP as i32 - style.title_font_size as i32) / 2,
        title_scale,
        &font,
        &data.title,
    );

    let (xl_w, xl_h) = text_size(scale, &font, &style.x_label);
    draw_text_mut(
        &mut img,
        style.text_color,
        ((layout.left + layout.right) / 2.0) as i32 - xl_w / 2,
        style.height as i32 - xl_h - 8,
        scale,
        &font,
        &style.x_label,
    );
    draw_rotated_text(
        &mut img,
        (18.0, (layout.top + layout.bottom) / 2.0),
        &style.y_label,
        90.0,
        scale,
        &font,
        style.text_color,
    );

    // Series: dashed line broken at missing values, then markers on top
    let points: Vec<Option<(f32, f32)>> = data
        .values
        .iter()
        .enumerate()
        .map(|(i, &v)| v.is_finite().then(|| (layout.x_for(i), layout.y_for(v))))
        .collect();

    let mut dasher = Dasher::new(style.dash);
    for pair in points.windows(2) {
        match (pair[0], pair[1]) {
            (Some(a), Some(b)) => dasher.segment(&mut img, a, b, style.line_color),
            _ => dasher.reset(),
        }
    }

    for &(x, y) in points.iter().flatten() {
        draw_filled_circle_mut(&mut img, (x.round() as i32, y.round() as i32), style.marker_radius, style.line_color);
    }

    Ok(img)
}

/// Render and encode as PNG, storing the chart title as PNG metadata.
pub fn render_line_chart_png(data: &ChartData, style: &ChartStyle) -> RenderResult<Vec<u8>> {
    let img = render_line_chart(data, style)?;
    let (width, height) = img.dimensions();
    tracing::debug!(width, height, points = data.values.len(), "Encoding chart");
    create_png(
        img.as_raw(),
        width as usize,
        height as usize,
        &[("Title", data.title.as_str()), ("Software", "era5-point")],
    )
}

/// Draw `text` centred on `center`, rotated counter-clockwise by `degrees`.
fn draw_rotated_text(
    img: &mut RgbaImage,
    center: (f32, f32),
    text: &str,
    degrees: f32,
    scale: Scale,
    font: &Font,
    color: Rgba<u8>,
) {
    let (w, h) = text_size(scale, font, text);
    let side = ((w * w + h * h) as f32).sqrt().ceil() as u32 + 4;
    let mut tile = RgbaImage::from_pixel(side, side, Rgba([0, 0, 0, 0]));
    draw_text_mut(
        &mut tile,
        color,
        (side as i32 - w) / 2,
        (side as i32 - h) / 2,
        scale,
        font,
        text,
    );

    // imageproc rotates clockwise for positive angles in image coordinates
    let rotated = rotate_about_center(
        &tile,
        -degrees.to_radians(),
        Interpolation::Bilinear,
        Rgba([0, 0, 0, 0]),
    );
    let x = center.0.round() as i64 - side as i64 / 2;
    let y = center.1.round() as i64 - side as i64 / 2;
    imageops::overlay(img, &rotated, x, y);
}

/// Draws a dashed polyline, carrying the dash phase across segments.
struct Dasher {
    dash: f32,
    gap: f32,
    /// Distance already consumed in the current dash or gap
    phase: f32,
    drawing: bool,
}

impl Dasher {
    fn new((dash, gap): (f32, f32)) -> Self {
        Self {
            dash: dash.max(1.0),
            gap: gap.max(0.0),
            phase: 0.0,
            drawing: true,
        }
    }

    fn reset(&mut self) {
        self.phase = 0.0;
        self.drawing = true;
    }

    fn segment(&mut self, img: &mut RgbaImage, a: (f32, f32), b: (f32, f32), color: Rgba<u8>) {
        let (dx, dy) = (b.0 - a.0, b.1 - a.1);
        let length = (dx * dx + dy * dy).sqrt();
        if length == 0.0 {
            return;
        }
        if self.gap == 0.0 {
            thick_line(img, a, b, color);
            return;
        }

        let mut pos = 0.0;
        while pos < length {
            let span = if self.drawing { self.dash } else { self.gap };
            let step = (span - self.phase).min(length - pos);
            if self.drawing {
                let p0 = (a.0 + dx * pos / length, a.1 + dy * pos / length);
                let p1 = (a.0 + dx * (pos + step) / length, a.1 + dy * (pos + step) / length);
                thick_line(img, p0, p1, color);
            }
            pos += step;
            self.phase += step;
            if self.phase >= span {
                self.phase = 0.0;
                self.drawing = !self.drawing;
            }
        }
    }
}

// Two pixels wide
fn thick_line(img: &mut RgbaImage, a: (f32, f32), b: (f32, f32), color: Rgba<u8>) {
    draw_line_segment_mut(img, a, b, color);
    draw_line_segment_mut(img, (a.0, a.1 + 1.0), (b.0, b.1 + 1.0), color);
}
