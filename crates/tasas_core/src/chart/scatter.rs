//! Scatter of loan amount against nominal rate, one series per institution.

use serde::Serialize;

use super::{palette_color, Axis, ChartLayout, SeriesIndex, AMOUNT_TICK_FORMAT};
use crate::aggregate::ScatterPair;

/// One loan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    /// Loan amount
    pub x: Option<f64>,
    /// Nominal rate (decimal fraction)
    pub y: Option<f64>,
    /// Borrowing company (hover text)
    pub company: String,
    /// Currency type (hover text)
    pub currency: String,
}

/// Loans of one institution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterSeries {
    /// Institution name (legend entry)
    pub name: String,
    /// Series colour
    pub color: &'static str,
    /// Points in view order
    pub points: Vec<ScatterPoint>,
}

/// Scatter chart description.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterChart {
    /// Title, axes and legend
    pub layout: ChartLayout,
    /// One series per institution, in first-appearance order
    pub series: Vec<ScatterSeries>,
}

impl ScatterChart {
    /// Whether there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Total number of points across series.
    pub fn point_count(&self) -> usize {
        self.series.iter().map(|s| s.points.len()).sum()
    }
}

fn layout() -> ChartLayout {
    ChartLayout {
        title: "Relación entre Monto del Crédito y Tasa de Interés".to_string(),
        x_axis: Axis {
            tick_format: Some(AMOUNT_TICK_FORMAT.to_string()),
            ..Axis::new("Monto Total (M$)")
        },
        y_axis: Axis::rate("Tasa Nominal %"),
        legend_title: Some("Banco".to_string()),
    }
}

/// Build the scatter chart from per-row pairs.
pub fn scatter_chart(pairs: &[ScatterPair]) -> ScatterChart {
    let mut index = SeriesIndex::default();
    let mut series: Vec<ScatterSeries> = Vec::new();

    for pair in pairs {
        let (i, is_new) = index.index_of(&pair.institution);
        if is_new {
            series.push(ScatterSeries {
                name: pair.institution.clone(),
                color: palette_color(i),
                points: Vec::new(),
            });
        }
        series[i].points.push(ScatterPoint {
            x: pair.amount,
            y: pair.nominal_rate,
            company: pair.company.clone(),
            currency: pair.currency.clone(),
        });
    }

    ScatterChart {
        layout: layout(),
        series,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(institution: &str, amount: f64, rate: f64) -> ScatterPair {
        ScatterPair {
            amount: Some(amount),
            nominal_rate: Some(rate),
            institution: institution.to_string(),
            company: "Acme".to_string(),
            currency: "CLP".to_string(),
        }
    }

    #[test]
    fn test_every_pair_becomes_a_point() {
        let pairs = vec![
            pair("Banco X", 100.0, 0.08),
            pair("Banco Y", 200.0, 0.07),
            pair("Banco X", 300.0, 0.09),
        ];
        let chart = scatter_chart(&pairs);

        assert_eq!(chart.point_count(), pairs.len());
        assert_eq!(chart.series[0].name, "Banco X");
        assert_eq!(chart.series[0].points[1].x, Some(300.0));
        assert_eq!(chart.layout.x_axis.tick_format.as_deref(), Some(AMOUNT_TICK_FORMAT));
    }

    #[test]
    fn test_empty_scatter() {
        let chart = scatter_chart(&[]);
        assert!(chart.is_empty());
        assert_eq!(chart.point_count(), 0);
    }
}
