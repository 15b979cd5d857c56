//! Grouped bar chart of mean rate per currency and institution.

use serde::Serialize;

use super::{palette_color, Axis, ChartLayout, SeriesIndex};
use crate::aggregate::CurrencyInstitutionMean;

/// One bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarPoint {
    /// Currency category on the x axis
    pub category: String,
    /// Mean rate (decimal fraction)
    pub value: f64,
}

/// Bars of one institution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSeries {
    /// Institution name (legend entry)
    pub name: String,
    /// Series colour
    pub color: &'static str,
    /// Bars in category order
    pub points: Vec<BarPoint>,
}

/// Grouped bar chart description.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    /// Title, axes and legend
    pub layout: ChartLayout,
    /// Currency categories in display order
    pub categories: Vec<String>,
    /// One series per institution, in first-appearance order
    pub series: Vec<BarSeries>,
}

impl BarChart {
    /// Whether there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

fn layout() -> ChartLayout {
    ChartLayout {
        title: "Distribución de Tasas de Interés Promedio por Banco".to_string(),
        x_axis: Axis {
            tick_angle: Some(-45),
            ..Axis::new("Moneda")
        },
        y_axis: Axis::rate("Tasa de Interés (%)"),
        legend_title: Some("Banco".to_string()),
    }
}

/// Build the bar chart from sorted (currency, institution) means.
///
/// Category and series order follow the input order, which the currency
/// aggregator has already sorted.
pub fn bar_chart(rows: &[CurrencyInstitutionMean]) -> BarChart {
    let mut categories: Vec<String> = Vec::new();
    let mut index = SeriesIndex::default();
    let mut series: Vec<BarSeries> = Vec::new();

    for row in rows {
        if !categories.contains(&row.currency) {
            categories.push(row.currency.clone());
        }

        let (i, is_new) = index.index_of(&row.institution);
        if is_new {
            series.push(BarSeries {
                name: row.institution.clone(),
                color: palette_color(i),
                points: Vec::new(),
            });
        }
        series[i].points.push(BarPoint {
            category: row.currency.clone(),
            value: row.mean_rate,
        });
    }

    BarChart {
        layout: layout(),
        categories,
        series,
    }
}
