//! Box plot of nominal rates per credit rating.

use serde::Serialize;

use super::{palette_color, Axis, ChartLayout};
use crate::aggregate::RatingGroups;

/// Five-number summary of one rating's rates.
///
/// Quartiles use linear interpolation between closest ranks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoxStats {
    /// Number of rates
    pub count: usize,
    /// Smallest rate
    pub min: f64,
    /// First quartile
    pub q1: f64,
    /// Median
    pub median: f64,
    /// Third quartile
    pub q3: f64,
    /// Largest rate
    pub max: f64,
    /// Arithmetic mean
    pub mean: f64,
}

impl BoxStats {
    /// Summarise `values`; `None` when empty.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        Some(Self {
            count: sorted.len(),
            min: sorted[0],
            q1: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            q3: quantile(&sorted, 0.75),
            max: sorted[sorted.len() - 1],
            mean: sorted.iter().sum::<f64>() / sorted.len() as f64,
        })
    }
}

/// Linear-interpolated quantile of sorted, non-empty data.
fn quantile(sorted: &[f64], p: f64) -> f64 {
    let pos = p * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Rates of one rating.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxSeries {
    /// Rating (x category and legend entry)
    pub rating: String,
    /// Series colour
    pub color: &'static str,
    /// Defined rates of the rating's rows
    pub values: Vec<f64>,
    /// Summary of `values`; `None` when every row lacked a rate
    pub stats: Option<BoxStats>,
}

/// Box plot description.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxChart {
    /// Title and axes
    pub layout: ChartLayout,
    /// Ratings present, strongest first
    pub categories: Vec<String>,
    /// One series per category, same order
    pub series: Vec<BoxSeries>,
}

impl BoxChart {
    /// Whether there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

fn layout() -> ChartLayout {
    ChartLayout {
        title: "Distribución de Tasas de Interés por Rating".to_string(),
        x_axis: Axis::new("Rating"),
        y_axis: Axis::rate("Tasa Nominal %"),
        legend_title: Some("Rating".to_string()),
    }
}

/// Build the box plot from rating-ordered rows.
pub fn box_chart(groups: &RatingGroups) -> BoxChart {
    let series = groups
        .order
        .iter()
        .enumerate()
        .map(|(i, rating)| {
            let values: Vec<f64> = groups
                .rows
                .iter()
                .filter(|row| &row.rating == rating)
                .filter_map(|row| row.nominal_rate)
                .filter(|v| v.is_finite())
                .collect();
            BoxSeries {
                rating: rating.clone(),
                color: palette_color(i),
                stats: BoxStats::from_values(&values),
                values,
            }
        })
        .collect();

    BoxChart {
        layout: layout(),
        categories: groups.order.clone(),
        series,
    }
}
