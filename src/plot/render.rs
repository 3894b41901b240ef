//! Drawing figures to image files with plotters

// internal modules
use crate::plot::figure::{Colour, Figure, Panel, Scale, Style};
use crate::utils::{f, NumberFmt};

// standard library
use std::fs;
use std::path::Path;
use std::process::Command;

// external crates
use anyhow::{Context, Result};
use log::{debug, warn};
use plotters::coord::ranged1d::{AsRangedCoord, ValueFormatter};
use plotters::coord::Shift;
use plotters::prelude::*;

/// Default colour cycle, the same ten colours most plotting tools use
const CYCLE: [RGBColor; 10] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
];

/// Ends of the gradient used for families of curves
const GRADIENT: (RGBColor, RGBColor) = (RGBColor(68, 1, 84), RGBColor(253, 231, 37));

type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

/// Render a figure to an image file, format chosen by the file extension
///
/// The drawing backend is released before returning, whether or not drawing
/// succeeded.
pub fn render(figure: &Figure, path: &Path) -> Result<()> {
    debug!("Rendering {} panel(s) to {}", figure.panels.len(), path.display());

    let root = BitMapBackend::new(path, figure.size).into_drawing_area();
    root.fill(&WHITE)?;

    let root = match &figure.suptitle {
        Some(title) => root.titled(title, ("sans-serif", 28))?,
        None => root,
    };

    let (shared_x, shared_y) = shared_ranges(figure);
    let areas = root.split_evenly((1, figure.panels.len().max(1)));

    for (i, (area, panel)) in areas.iter().zip(figure.panels.iter()).enumerate() {
        let x_data = shared_x.or_else(|| panel.x_data_range());
        let y_data = shared_y.or_else(|| panel.y_data_range());
        let x = axis_range(panel.xlim, x_data, panel.xscale);
        let y = axis_range(panel.ylim, y_data, panel.yscale);
        let show_ylabel = panel.labels_y_axis(i);
        draw_scaled(area, panel, show_ylabel, x, y)?;
    }

    root.present()
        .with_context(|| f!("Unable to write {}", path.display()))?;
    Ok(())
}

/// Create the output directory and any missing parents
pub fn ensure_directory(path: &Path) -> Result<()> {
    fs::create_dir_all(path).with_context(|| f!("Unable to create {}", path.display()))?;
    debug!("Output directory {}", path.display());
    Ok(())
}

/// Open an image with the default viewer of the platform
///
/// Failing to launch a viewer is not fatal, the image is already saved.
pub fn show(path: &Path) {
    let mut command = match std::env::consts::OS {
        "macos" => Command::new("open"),
        "windows" => {
            let mut c = Command::new("cmd");
            c.args(["/C", "start", ""]);
            c
        }
        _ => Command::new("xdg-open"),
    };

    if let Err(e) = command.arg(path).spawn() {
        warn!("Unable to display {}: {e}", path.display());
    }
}

/// Combined data ranges over all panels, if the figure shares axes
fn shared_ranges(figure: &Figure) -> (Option<(f64, f64)>, Option<(f64, f64)>) {
    if !figure.share_axes {
        return (None, None);
    }

    let union = |a: Option<(f64, f64)>, b: Option<(f64, f64)>| match (a, b) {
        (Some((a0, a1)), Some((b0, b1))) => Some((a0.min(b0), a1.max(b1))),
        (a, None) => a,
        (None, b) => b,
    };

    figure.panels.iter().fold((None, None), |(x, y), panel| {
        (union(x, panel.x_data_range()), union(y, panel.y_data_range()))
    })
}

/// Axis limits from user limits if valid, otherwise from the data
fn axis_range(limits: Option<(f64, f64)>, data: Option<(f64, f64)>, scale: Scale) -> (f64, f64) {
    match limits {
        Some((lo, hi)) if scale == Scale::Log && (lo <= 0.0 || hi <= 0.0) => {
            warn!("Ignoring non-positive limits ({lo}, {hi}) on a log axis");
        }
        Some(limits) => return limits,
        None => {}
    }

    match (data, scale) {
        (None, Scale::Log) => (1.0, 10.0),
        (None, Scale::Linear) => (0.0, 1.0),
        (Some((lo, hi)), Scale::Log) if lo == hi => (lo / 10.0, hi * 10.0),
        (Some((lo, hi)), Scale::Log) => (lo, hi),
        (Some((lo, hi)), Scale::Linear) if lo == hi => (lo - 1.0, hi + 1.0),
        (Some((lo, hi)), Scale::Linear) => {
            let pad = 0.05 * (hi - lo);
            (lo - pad, hi + pad)
        }
    }
}

/// Dispatch on the axis scales, which determine the coordinate types
fn draw_scaled(
    area: &Area,
    panel: &Panel,
    show_ylabel: bool,
    x: (f64, f64),
    y: (f64, f64),
) -> Result<()> {
    let (x, y) = (x.0..x.1, y.0..y.1);
    match (panel.xscale, panel.yscale) {
        (Scale::Log, Scale::Log) => draw_panel(area, panel, show_ylabel, x.log_scale(), y.log_scale()),
        (Scale::Log, Scale::Linear) => draw_panel(area, panel, show_ylabel, x.log_scale(), y),
        (Scale::Linear, Scale::Log) => draw_panel(area, panel, show_ylabel, x, y.log_scale()),
        (Scale::Linear, Scale::Linear) => draw_panel(area, panel, show_ylabel, x, y),
    }
}

/// Draw the axes, series, and legend of a single panel
fn draw_panel<X, Y>(area: &Area, panel: &Panel, show_ylabel: bool, x: X, y: Y) -> Result<()>
where
    X: AsRangedCoord<Value = f64>,
    Y: AsRangedCoord<Value = f64>,
    X::CoordDescType: ValueFormatter<f64>,
    Y::CoordDescType: ValueFormatter<f64>,
{
    let mut builder = ChartBuilder::on(area);
    builder
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(80);

    if let Some(title) = &panel.title {
        builder.caption(title, ("sans-serif", 22));
    }

    let mut chart = builder.build_cartesian_2d(x, y)?;

    let x_formatter = tick_formatter(panel.xscale);
    let y_formatter = tick_formatter(panel.yscale);

    let mut mesh = chart.configure_mesh();
    mesh.x_desc(panel.xlabel.as_str())
        .x_label_formatter(&x_formatter)
        .y_label_formatter(&y_formatter)
        .axis_desc_style(("sans-serif", 16));
    match show_ylabel {
        true => mesh.y_desc(panel.ylabel.as_str()),
        false => mesh.y_labels(0),
    };
    mesh.draw()?;

    for series in &panel.series {
        let colour = rgb(series.colour);
        let points = series
            .points
            .iter()
            .copied()
            .filter(|(x, y)| is_drawable(*x, panel.xscale) && is_drawable(*y, panel.yscale))
            .collect::<Vec<(f64, f64)>>();

        let annotation = match series.style {
            Style::Solid => chart.draw_series(LineSeries::new(points, colour.stroke_width(2)))?,
            Style::Dotted => chart.draw_series(DashedLineSeries::new(
                points,
                2,
                4,
                colour.stroke_width(2),
            ))?,
            Style::Markers => chart.draw_series(
                points
                    .into_iter()
                    .map(|p| Circle::new(p, 4, colour.filled())),
            )?,
        };

        if !panel.legend {
            continue;
        }

        annotation.label(series.label.as_str());
        match series.style {
            Style::Markers => {
                annotation.legend(move |(x, y)| Circle::new((x + 10, y), 4, colour.filled()));
            }
            _ => {
                annotation.legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], colour.stroke_width(2))
                });
            }
        }
    }

    if panel.legend && !panel.series.is_empty() {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .label_font(("sans-serif", 14))
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }

    Ok(())
}

/// Points that cannot be placed on an axis are dropped
fn is_drawable(value: f64, scale: Scale) -> bool {
    value.is_finite() && (scale == Scale::Linear || value > 0.0)
}

/// Tick labels, scientific on log axes
fn tick_formatter(scale: Scale) -> fn(&f64) -> String {
    match scale {
        Scale::Log => |v: &f64| v.sci(0, 1),
        Scale::Linear => |v: &f64| f!("{}", (v * 1000.0).round() / 1000.0),
    }
}

fn rgb(colour: Colour) -> RGBColor {
    match colour {
        Colour::Black => BLACK,
        Colour::Cycle(i) => CYCLE[i % CYCLE.len()],
        Colour::Gradient(t) => {
            let t = t.clamp(0.0, 1.0);
            let (a, b) = GRADIENT;
            let mix = |lo: u8, hi: u8| (lo as f64 + t * (hi as f64 - lo as f64)).round() as u8;
            RGBColor(mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
        }
    }
}
