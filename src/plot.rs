// X-over-time and Y-over-time line charts of a gesture.
// Visual: two PNG charts; solid blue/red lines for the user's X and Y, dashed gray
// lines for the mapped template when the drawing was made in follow mode.

use crate::draw::glyph5x7;
use crate::error::{Error, Result};
use crate::export::{file_stamp, FileSink};
use crate::recorder::Gesture;
use crate::types::MappedSample;
use chrono::{DateTime, Utc};
use image::{ImageFormat, RgbImage};
use log::info;
use plotters::prelude::*;
use plotters_backend::{
    text_anchor, BackendColor, BackendCoord, BackendStyle, BackendTextStyle, DrawingBackend,
    DrawingErrorKind,
};
use std::io::Cursor;
use std::ops::Range;
use std::path::PathBuf;

const USER_X_COLOR: u32 = 0x00_00_00_FF;
const USER_Y_COLOR: u32 = 0x00_FF_00_00;
const TEMPLATE_COLOR: u32 = 0x00_80_80_80;

// dashed template series: ink / gap lengths in pixels
const DASH_PX: u32 = 5;
const GAP_PX: u32 = 5;

// 5x7 glyphs advance 6 px per character at scale 1
const GLYPH_ADVANCE: i32 = 6;
const GLYPH_HEIGHT: i32 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    pub fn as_str(&self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesStyle {
    pub color: u32,
    pub width: f32,
    pub dashed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub values: Vec<f64>,
    pub style: SeriesStyle,
}

/// One line chart: `labels` are the shared time axis, one value per label in each series.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub axis: Axis,
    pub labels: Vec<f64>,
    pub series: Vec<Series>,
}

/// Anything that can show charts.
pub trait Plotter {
    /// Show `charts` as one set taken at `at`, replacing the set shown before.
    /// On error the previous set stays in place.
    fn show(&mut self, charts: &[Chart], at: DateTime<Utc>) -> Result<()>;
    /// Dispose of previously shown charts.
    fn clear(&mut self);
}

/// Build the X and Y charts for `gesture`. The dashed template series are only added
/// when a mapping is supplied.
pub fn build_charts(gesture: &Gesture, mapped: Option<&[MappedSample]>) -> [Chart; 2] {
    let samples = gesture.samples();
    let labels: Vec<f64> = samples.iter().map(|s| s.t).collect();
    let user = |color| SeriesStyle { color, width: 1.5, dashed: false };
    let reference = SeriesStyle { color: TEMPLATE_COLOR, width: 1.0, dashed: true };

    let mut x = Chart {
        axis: Axis::X,
        labels: labels.clone(),
        series: vec![Series {
            name: "User X".into(),
            values: samples.iter().map(|s| s.x).collect(),
            style: user(USER_X_COLOR),
        }],
    };
    let mut y = Chart {
        axis: Axis::Y,
        labels,
        series: vec![Series {
            name: "User Y".into(),
            values: samples.iter().map(|s| s.y).collect(),
            style: user(USER_Y_COLOR),
        }],
    };

    if let Some(mapped) = mapped {
        x.series.push(Series {
            name: "Template X (Mapped)".into(),
            values: mapped.iter().map(MappedSample::template_x).collect(),
            style: reference,
        });
        y.series.push(Series {
            name: "Template Y (Mapped)".into(),
            values: mapped.iter().map(MappedSample::template_y).collect(),
            style: reference,
        });
    }

    [x, y]
}

fn rgb(color: u32) -> RGBColor {
    RGBColor((color >> 16) as u8, (color >> 8) as u8, color as u8)
}

/// Range covering `values`, padded by `pad` of its span on both ends.
/// A flat or empty series still gets a unit-wide range.
fn axis_range(values: impl Iterator<Item = f64>, pad: f64) -> Range<f64> {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if !lo.is_finite() {
        return 0.0..1.0;
    }
    if hi - lo < 1e-9 {
        return (lo - 0.5)..(hi + 0.5);
    }
    let margin = (hi - lo) * pad;
    (lo - margin)..(hi + margin)
}

fn draw_chart<DB>(root: &DrawingArea<DB, plotters::coord::Shift>, chart: &Chart) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;

    let t_range = axis_range(chart.labels.iter().copied(), 0.0);
    let v_range = axis_range(chart.series.iter().flat_map(|s| s.values.iter().copied()), 0.05);
    let title = format!("{} over time", chart.axis.as_str().to_uppercase());

    let mut ctx = ChartBuilder::on(root)
        .caption(title, ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(36)
        .y_label_area_size(56)
        .build_cartesian_2d(t_range, v_range)?;

    ctx.configure_mesh()
        .x_desc("Time (ms)")
        .x_labels(6)
        .y_labels(6)
        .x_label_formatter(&|t| format!("{:.0}", t))
        .y_label_formatter(&|v| format!("{:.1}", v))
        .label_style(("sans-serif", 12))
        .draw()?;

    let single = chart.labels.len() == 1;
    for series in &chart.series {
        let style = plotters::style::Color::stroke_width(&rgb(series.style.color), (series.style.width.round() as u32).max(1));
        let points = chart.labels.iter().copied().zip(series.values.iter().copied());
        let anno = if series.style.dashed {
            ctx.draw_series(DashedLineSeries::new(points, DASH_PX, GAP_PX, style))?
        } else {
            ctx.draw_series(LineSeries::new(points, style).point_size(if single { 3 } else { 0 }))?
        };
        anno.label(series.name.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
    }

    ctx.configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .label_font(("sans-serif", 12))
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK.mix(0.3))
        .draw()?;

    Ok(())
}

/// Draw `chart` into an RGB buffer with plotters and encode it as PNG.
pub fn render_png(chart: &Chart, width: u32, height: u32) -> Result<Vec<u8>> {
    let mut buf = vec![0u8; width as usize * height as usize * 3];
    {
        let root = GlyphText::new(BitMapBackend::with_buffer(&mut buf, (width, height))).into_drawing_area();
        draw_chart(&root, chart)?;
        root.present()?;
    }
    let img = RgbImage::from_raw(width, height, buf)
        .ok_or_else(|| Error::Plot(format!("chart buffer does not fit {width}x{height}")))?;
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

/// Backend wrapper that draws all chart text with the built-in 5x7 glyphs, so charts
/// render the same with or without system fonts. Rotated text is drawn unrotated.
struct GlyphText<DB> {
    inner: DB,
}

impl<DB> GlyphText<DB> {
    fn new(inner: DB) -> Self {
        Self { inner }
    }
}

fn glyph_scale(size: f64) -> i32 {
    ((size / 10.0).floor() as i32).max(1)
}

fn glyph_extent(text: &str, scale: i32) -> (i32, i32) {
    let n = text.chars().count() as i32;
    ((n * GLYPH_ADVANCE - 1).max(0) * scale, GLYPH_HEIGHT * scale)
}

impl<DB: DrawingBackend> DrawingBackend for GlyphText<DB> {
    type ErrorType = DB::ErrorType;

    fn get_size(&self) -> (u32, u32) {
        self.inner.get_size()
    }

    fn ensure_prepared(&mut self) -> std::result::Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.ensure_prepared()
    }

    fn present(&mut self) -> std::result::Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.present()
    }

    fn draw_pixel(
        &mut self,
        point: BackendCoord,
        color: BackendColor,
    ) -> std::result::Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.draw_pixel(point, color)
    }

    fn draw_line<S: BackendStyle>(
        &mut self,
        from: BackendCoord,
        to: BackendCoord,
        style: &S,
    ) -> std::result::Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.draw_line(from, to, style)
    }

    fn draw_rect<S: BackendStyle>(
        &mut self,
        upper_left: BackendCoord,
        bottom_right: BackendCoord,
        style: &S,
        fill: bool,
    ) -> std::result::Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.draw_rect(upper_left, bottom_right, style, fill)
    }

    fn draw_path<S: BackendStyle, I: IntoIterator<Item = BackendCoord>>(
        &mut self,
        path: I,
        style: &S,
    ) -> std::result::Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.draw_path(path, style)
    }

    fn draw_circle<S: BackendStyle>(
        &mut self,
        center: BackendCoord,
        radius: u32,
        style: &S,
        fill: bool,
    ) -> std::result::Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.draw_circle(center, radius, style, fill)
    }

    fn draw_text<S: BackendTextStyle>(
        &mut self,
        text: &str,
        style: &S,
        pos: BackendCoord,
    ) -> std::result::Result<(), DrawingErrorKind<Self::ErrorType>> {
        let color = style.color();
        if color.alpha == 0.0 || text.trim().is_empty() {
            return Ok(());
        }

        let scale = glyph_scale(style.size());
        let (width, height) = glyph_extent(text, scale);
        let anchor = style.anchor();
        let dx = match anchor.h_pos {
            text_anchor::HPos::Left => 0,
            text_anchor::HPos::Center => -width / 2,
            text_anchor::HPos::Right => -width,
        };
        let dy = match anchor.v_pos {
            text_anchor::VPos::Top => 0,
            text_anchor::VPos::Center => -height / 2,
            text_anchor::VPos::Bottom => -height,
        };

        let (mut x, y) = (pos.0 + dx, pos.1 + dy);
        for ch in text.chars() {
            if let Some(rows) = glyph5x7(ch) {
                for (ry, bits) in rows.iter().enumerate() {
                    for rx in 0..5 {
                        if bits & (1 << (4 - rx)) == 0 {
                            continue;
                        }
                        let (px, py) = (x + rx * scale, y + ry as i32 * scale);
                        for sy in 0..scale {
                            for sx in 0..scale {
                                self.inner.draw_pixel((px + sx, py + sy), color)?;
                            }
                        }
                    }
                }
            }
            x += GLYPH_ADVANCE * scale;
        }
        Ok(())
    }

    fn estimate_text_size<S: BackendTextStyle>(
        &self,
        text: &str,
        style: &S,
    ) -> std::result::Result<(u32, u32), DrawingErrorKind<Self::ErrorType>> {
        let (w, h) = glyph_extent(text, glyph_scale(style.size()));
        Ok((w as u32, h as u32))
    }

    fn blit_bitmap(
        &mut self,
        pos: BackendCoord,
        (iw, ih): (u32, u32),
        src: &[u8],
    ) -> std::result::Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.blit_bitmap(pos, (iw, ih), src)
    }
}

/// Renders charts to PNG and offers them as `spiral_plot_<axis>_<timestamp>.png`.
pub struct PngPlotter<F: FileSink> {
    sink: F,
    width: u32,
    height: u32,
    rendered: Vec<PathBuf>,
}

impl<F: FileSink> PngPlotter<F> {
    pub fn new(sink: F, width: usize, height: usize) -> Self {
        Self { sink, width: width as u32, height: height as u32, rendered: Vec::new() }
    }

    /// Charts shown since the last `clear`.
    pub fn rendered(&self) -> &[PathBuf] { &self.rendered }

    pub fn sink(&self) -> &F { &self.sink }
}

impl<F: FileSink> Plotter for PngPlotter<F> {
    fn show(&mut self, charts: &[Chart], at: DateTime<Utc>) -> Result<()> {
        // every chart is encoded before the first file is offered
        let stamp = file_stamp(at);
        let pngs = charts
            .iter()
            .map(|chart| {
                let name = format!("spiral_plot_{}_{}.png", chart.axis.as_str(), stamp);
                render_png(chart, self.width, self.height).map(|png| (name, png))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut paths = Vec::with_capacity(pngs.len());
        for (name, png) in &pngs {
            let path = self.sink.offer(name, png)?;
            info!("Plot saved to {}.", path.display());
            paths.push(path);
        }
        self.rendered = paths;
        Ok(())
    }

    fn clear(&mut self) {
        self.rendered.clear();
    }
}
