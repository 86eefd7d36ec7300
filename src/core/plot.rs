//! Two-panel translation/rotation figure rendered with plotters.
use std::ffi::OsString;
use std::ops::Range;
use std::path::{Path, PathBuf};

use ndarray::ArrayView2;
use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::{debug, info};

use crate::core::motion::MotionRegressors;
use crate::core::params::PlotParams;
use crate::error::{Error, Result};
use crate::types::PlotFormat;

pub const TRANSLATION_TITLE: &str = "Estimated translation";
pub const TRANSLATION_LABEL: &str = "Estimated translation (mm)";
pub const ROTATION_TITLE: &str = "Estimated rotation";
pub const ROTATION_LABEL: &str = "Estimated rotation (deg)";
pub const LEGEND: [&str; 3] = ["x", "y", "z"];

// matplotlib "tab10" cycle
const SERIES_COLORS: [RGBColor; 3] = [
    RGBColor(0x1f, 0x77, 0xb4),
    RGBColor(0xff, 0x7f, 0x0e),
    RGBColor(0x2c, 0xa0, 0x2c),
];

const FONT: &str = "sans-serif";

// plotters treats a font size as the line height and draws glyphs at
// size / 1.24, so point sizes are scaled up by the same factor.
const FONT_LINE_HEIGHT: f64 = 1.24;

struct Panel<'a> {
    title: &'a str,
    y_label: &'a str,
    data: ArrayView2<'a, f64>,
}

/// Sizes in backend units, derived from typographic points.
struct FigureStyle {
    title_px: u32,
    label_px: u32,
    tick_px: u32,
    line_px: u32,
    margin_px: u32,
    x_label_area_px: u32,
    y_label_area_px: u32,
    legend_len_px: i32,
}

impl FigureStyle {
    fn new(scale: f64) -> Self {
        let pt = |points: f64| (points * scale).round().max(1.0) as u32;
        let font = |points: f64| pt(points * FONT_LINE_HEIGHT);
        Self {
            title_px: font(12.0),
            label_px: font(10.0),
            tick_px: font(10.0),
            line_px: pt(1.5),
            margin_px: pt(10.0),
            x_label_area_px: pt(24.0),
            y_label_area_px: pt(60.0),
            legend_len_px: pt(20.0) as i32,
        }
    }
}

/// Render the motion figure to `output`; the format follows its extension.
///
/// The figure is drawn into a hidden sibling file and renamed over `output`
/// once complete, so a failed run leaves any earlier `output` untouched.
pub fn render_motion_plot(
    motion: &MotionRegressors,
    output: &Path,
    params: &PlotParams,
) -> Result<()> {
    let format = PlotFormat::from_path(output)?;
    if params.dpi == 0 || !(params.width_in > 0.0) || !(params.height_in > 0.0) {
        return Err(Error::InvalidArgument {
            arg: "figure",
            value: format!("{}x{}in @ {}dpi", params.width_in, params.height_in, params.dpi),
        });
    }

    let size = params.canvas_size(format);
    let style = FigureStyle::new(params.point_scale(format));
    let panels = [
        Panel {
            title: TRANSLATION_TITLE,
            y_label: TRANSLATION_LABEL,
            data: motion.translation(),
        },
        Panel {
            title: ROTATION_TITLE,
            y_label: ROTATION_LABEL,
            data: motion.rotation(),
        },
    ];

    let staging = staging_path(output);
    debug!("Rendering {} figure {}x{} to {:?}", format, size.0, size.1, staging);
    let rendered = if format.is_vector() {
        draw_figure(SVGBackend::new(&staging, size).into_drawing_area(), &panels, &style)
    } else {
        draw_figure(BitMapBackend::new(&staging, size).into_drawing_area(), &panels, &style)
    }
    .and_then(|()| std::fs::rename(&staging, output).map_err(Error::from));

    if let Err(e) = rendered {
        let _ = std::fs::remove_file(&staging);
        return Err(e);
    }
    info!("Saved {} samples to {:?}", motion.samples(), output);
    Ok(())
}

/// `dir/.name.partial.ext`. Stays in the output's directory for the rename and
/// keeps its extension, which the bitmap encoder reads the format from.
fn staging_path(output: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    name.push(output.file_stem().unwrap_or_default());
    name.push(".partial");
    if let Some(ext) = output.extension() {
        name.push(".");
        name.push(ext);
    }
    output.with_file_name(name)
}

fn draw_figure<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    panels: &[Panel<'_>],
    style: &FigureStyle,
) -> Result<()> {
    root.fill(&WHITE).map_err(Error::render)?;
    let areas = root.split_evenly((panels.len(), 1));
    for (area, panel) in areas.iter().zip(panels) {
        draw_panel(area, panel, style)?;
    }
    root.present().map_err(Error::render)?;
    Ok(())
}

fn draw_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    panel: &Panel<'_>,
    style: &FigureStyle,
) -> Result<()> {
    let x_range = axis_range((0..panel.data.nrows()).map(|i| i as f64));
    let y_range = axis_range(panel.data.iter().copied());

    let mut chart = ChartBuilder::on(area)
        .caption(panel.title, (FONT, style.title_px))
        .margin(style.margin_px)
        .x_label_area_size(style.x_label_area_px)
        .y_label_area_size(style.y_label_area_px)
        .build_cartesian_2d(x_range, y_range)
        .map_err(Error::render)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(6)
        .y_labels(6)
        .y_desc(panel.y_label)
        .axis_desc_style((FONT, style.label_px))
        .label_style((FONT, style.tick_px))
        .axis_style(BLACK.stroke_width(style.line_px.div_ceil(2)))
        .draw()
        .map_err(Error::render)?;

    let legend_len = style.legend_len_px;
    for (col, (label, color)) in LEGEND.iter().zip(SERIES_COLORS).enumerate() {
        let line_style = color.stroke_width(style.line_px);
        let segments = finite_segments(panel.data.column(col).iter().copied());
        for (i, segment) in segments.into_iter().enumerate() {
            let series = chart
                .draw_series(LineSeries::new(segment, line_style))
                .map_err(Error::render)?;
            if i == 0 {
                series.label(*label).legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + legend_len, y)], line_style)
                });
            }
        }
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .label_font((FONT, style.label_px))
        .legend_area_size(legend_len + 5)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK.mix(0.2))
        .draw()
        .map_err(Error::render)?;

    Ok(())
}

/// Runs of consecutive finite samples as `(index, value)` points.
///
/// Always returns at least one (possibly empty) run so every column gets a
/// legend entry.
fn finite_segments<I: Iterator<Item = f64>>(values: I) -> Vec<Vec<(f64, f64)>> {
    let mut segments = vec![Vec::new()];
    for (i, v) in values.enumerate() {
        if v.is_finite() {
            if let Some(current) = segments.last_mut() {
                current.push((i as f64, v));
            }
        } else if segments.last().is_some_and(|s| !s.is_empty()) {
            segments.push(Vec::new());
        }
    }
    if segments.len() > 1 && segments.last().is_some_and(|s| s.is_empty()) {
        segments.pop();
    }
    segments
}

/// Data limits over finite values with a 5% margin on each side.
/// A constant series gets a unit-wide range; no finite values gives `0..1`.
fn axis_range<I: Iterator<Item = f64>>(values: I) -> Range<f64> {
    let (min, max) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

    if !min.is_finite() {
        return 0.0..1.0;
    }
    let span = max - min;
    if span == 0.0 {
        return (min - 0.5)..(max + 0.5);
    }
    let pad = 0.05 * span;
    (min - pad)..(max + pad)
}
