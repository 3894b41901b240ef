// internal modules
use crate::utils::data_range;

/// Axis scaling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scale {
    Linear,
    Log,
}

/// How a series is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    /// Dotted line, used for reference curves
    Dotted,
    /// Solid line
    Solid,
    /// Circular markers with no connecting line
    Markers,
}

/// Series colour
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Colour {
    Black,
    /// Position in the default colour cycle
    Cycle(usize),
    /// Position along a colour gradient, from 0.0 to 1.0
    Gradient(f64),
}

/// A single labelled set of points on a panel
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub points: Vec<(f64, f64)>,
    pub style: Style,
    pub colour: Colour,
}

impl Series {
    /// Pair up x and y values into a series
    pub fn new(label: &str, x: &[f64], y: &[f64], style: Style, colour: Colour) -> Self {
        Self {
            label: label.to_string(),
            points: x.iter().copied().zip(y.iter().copied()).collect(),
            style,
            colour,
        }
    }
}

/// One set of axes within a figure
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub title: Option<String>,
    pub xlabel: String,
    pub ylabel: String,
    pub xscale: Scale,
    pub yscale: Scale,
    /// Explicit x-axis limits, otherwise taken from the data
    pub xlim: Option<(f64, f64)>,
    /// Explicit y-axis limits, otherwise taken from the data
    pub ylim: Option<(f64, f64)>,
    pub series: Vec<Series>,
    /// Draw a legend of the series labels
    pub legend: bool,
    /// Only label axes on the outer edge of the figure
    pub label_outer: bool,
}

impl Default for Panel {
    fn default() -> Self {
        Self {
            title: None,
            xlabel: String::new(),
            ylabel: String::new(),
            xscale: Scale::Linear,
            yscale: Scale::Linear,
            xlim: None,
            ylim: None,
            series: Vec::new(),
            legend: false,
            label_outer: false,
        }
    }
}

impl Panel {
    /// Number of series drawn with a given style
    pub fn count_style(&self, style: Style) -> usize {
        self.series.iter().filter(|s| s.style == style).count()
    }

    /// Whether the y axis title and tick labels are drawn at `position` in the row
    ///
    /// With `label_outer` set only the leftmost panel is labelled.
    pub fn labels_y_axis(&self, position: usize) -> bool {
        !self.label_outer || position == 0
    }

    /// Range of the x data that can be drawn on this panel's scale
    pub fn x_data_range(&self) -> Option<(f64, f64)> {
        data_range(
            self.series.iter().flat_map(|s| s.points.iter().map(|p| p.0)),
            self.xscale == Scale::Log,
        )
    }

    /// Range of the y data that can be drawn on this panel's scale
    pub fn y_data_range(&self) -> Option<(f64, f64)> {
        data_range(
            self.series.iter().flat_map(|s| s.points.iter().map(|p| p.1)),
            self.yscale == Scale::Log,
        )
    }
}

/// A row of panels with an optional overall title
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub suptitle: Option<String>,
    pub panels: Vec<Panel>,
    /// Size in pixels
    pub size: (u32, u32),
    /// Panels share the same x and y ranges
    pub share_axes: bool,
}

impl Figure {
    /// An empty figure of the given size
    pub fn new(size: (u32, u32)) -> Self {
        Self {
            suptitle: None,
            panels: Vec::new(),
            size,
            share_axes: false,
        }
    }
}
