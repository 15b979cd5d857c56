//! Chart adapters.
//!
//! Map aggregator output into declarative chart descriptions: plain
//! serialisable data (series, axes, colours) that the rendering layer draws
//! without further computation. An empty aggregate yields a chart with the
//! same layout and no series.

pub mod bar;
pub mod boxplot;
pub mod scatter;

pub use bar::{bar_chart, BarChart, BarPoint, BarSeries};
pub use boxplot::{box_chart, BoxChart, BoxSeries, BoxStats};
pub use scatter::{scatter_chart, ScatterChart, ScatterPoint, ScatterSeries};

use serde::Serialize;

/// Tick format for rate axes (decimal fraction shown as percent).
pub const RATE_TICK_FORMAT: &str = ",.2%";

/// Tick format for amount axes.
pub const AMOUNT_TICK_FORMAT: &str = "$,.0f";

/// Qualitative palette assigned to series in order, cycling when exhausted.
pub const PALETTE: [&str; 9] = [
    "#E41A1C", "#377EB8", "#4DAF4A", "#984EA3", "#FF7F00", "#FFFF33", "#A65628", "#F781BF",
    "#999999",
];

/// Colour of the `index`-th series.
pub fn palette_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

/// One chart axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Axis {
    /// Axis title
    pub title: String,
    /// d3-style tick format
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tick_format: Option<String>,
    /// Tick label rotation in degrees
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tick_angle: Option<i32>,
}

impl Axis {
    fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            tick_format: None,
            tick_angle: None,
        }
    }

    fn rate(title: &str) -> Self {
        Self {
            tick_format: Some(RATE_TICK_FORMAT.to_string()),
            ..Self::new(title)
        }
    }
}

/// Title, axes and legend shared by every chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartLayout {
    /// Chart title
    pub title: String,
    /// Horizontal axis
    pub x_axis: Axis,
    /// Vertical axis
    pub y_axis: Axis,
    /// Legend title, when the chart has a legend
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend_title: Option<String>,
}

/// Assigns series in first-appearance order and remembers their index.
#[derive(Debug, Default)]
pub(crate) struct SeriesIndex {
    names: Vec<String>,
}

impl SeriesIndex {
    /// Index of `name`, registering it if new.
    pub(crate) fn index_of(&mut self, name: &str) -> (usize, bool) {
        match self.names.iter().position(|n| n == name) {
            Some(i) => (i, false),
            None => {
                self.names.push(name.to_string());
                (self.names.len() - 1, true)
            }
        }
    }
}
