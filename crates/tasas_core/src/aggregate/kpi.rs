//! KPI summarizer.
//!
//! With exactly one institution selected the KPI is that institution's mean
//! rate. Otherwise it reports the institutions with the highest and lowest
//! mean rate plus the overall mean. All rates are expressed in percent.
//!
//! Ties on the highest/lowest mean resolve to the lexicographically smallest
//! institution name.

use std::collections::BTreeMap;

use serde::Serialize;

use super::{mean, MeanAccumulator};
use crate::filter::{FilteredView, Selection};

/// Note attached to the overall average.
pub const POOLED_CURRENCY_NOTE: &str =
    "Nota: El promedio de tasa de interés incluye todas las monedas ofrecidas por el banco.";

/// An institution with its mean rate in percent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstitutionRate {
    /// Institution name
    pub institution: String,
    /// Mean nominal rate × 100
    pub rate_pct: f64,
}

/// Headline metrics for the current selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum KpiResult {
    /// Exactly one institution selected
    SingleInstitution {
        /// Selected institution
        institution: String,
        /// Mean nominal rate × 100 over the view
        average_pct: f64,
    },
    /// Zero or several institutions selected
    Summary {
        /// Institution with the highest mean rate
        highest: InstitutionRate,
        /// Institution with the lowest mean rate
        lowest: InstitutionRate,
        /// Mean nominal rate × 100 over the view, all currencies pooled
        average_pct: f64,
        /// Explanation of the pooled average
        note: &'static str,
    },
    /// No row with a defined rate matched
    NotAvailable,
}

/// One rendered KPI card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KpiCard {
    /// Formatted value, e.g. `"8.50%"`
    pub value: String,
    /// Caption under the value
    pub label: String,
}

/// Format a percentage with two decimals.
///
/// ```
/// use tasas_core::aggregate::format_pct;
/// assert_eq!(format_pct(8.5), "8.50%");
/// ```
pub fn format_pct(pct: f64) -> String {
    format!("{:.2}%", pct)
}

impl KpiResult {
    /// Whether metrics could be computed.
    pub fn is_available(&self) -> bool {
        !matches!(self, KpiResult::NotAvailable)
    }

    /// Formatted main figure: the single institution's mean or the overall mean.
    pub fn headline(&self) -> Option<String> {
        match self {
            KpiResult::SingleInstitution { average_pct, .. }
            | KpiResult::Summary { average_pct, .. } => Some(format_pct(*average_pct)),
            KpiResult::NotAvailable => None,
        }
    }

    /// Cards for the rendering layer.
    pub fn cards(&self) -> Vec<KpiCard> {
        match self {
            KpiResult::SingleInstitution {
                institution,
                average_pct,
            } => vec![KpiCard {
                value: format_pct(*average_pct),
                label: format!("Tasa de Interés Promedio del {}", institution),
            }],
            KpiResult::Summary {
                highest,
                lowest,
                average_pct,
                ..
            } => vec![
                KpiCard {
                    value: format_pct(highest.rate_pct),
                    label: format!("Tasa de Interés más Alta Promedio - {}", highest.institution),
                },
                KpiCard {
                    value: format_pct(lowest.rate_pct),
                    label: format!("Tasa de Interés más Baja Promedio - {}", lowest.institution),
                },
                KpiCard {
                    value: format_pct(*average_pct),
                    label: "Promedio Tasa de Interés".to_string(),
                },
            ],
            KpiResult::NotAvailable => vec![KpiCard {
                value: "N/D".to_string(),
                label: "Sin datos para la selección".to_string(),
            }],
        }
    }
}

/// Compute the KPI for `view` under `selection`.
pub fn summarize(view: &FilteredView<'_>, selection: &Selection) -> KpiResult {
    let overall = mean(view.iter().map(|r| r.nominal_rate));

    if let Some(institution) = selection.single_institution() {
        return match overall {
            Some(m) => KpiResult::SingleInstitution {
                institution: institution.to_string(),
                average_pct: m * 100.0,
            },
            None => KpiResult::NotAvailable,
        };
    }

    let Some(overall) = overall else {
        return KpiResult::NotAvailable;
    };

    let mut groups: BTreeMap<&str, MeanAccumulator> = BTreeMap::new();
    for record in view.iter() {
        groups
            .entry(record.institution.as_str())
            .or_default()
            .push(record.nominal_rate);
    }

    let mut highest: Option<(&str, f64)> = None;
    let mut lowest: Option<(&str, f64)> = None;
    for (institution, m) in groups
        .iter()
        .filter_map(|(name, acc)| acc.mean().map(|m| (*name, m)))
    {
        if highest.map_or(true, |(_, best)| m > best) {
            highest = Some((institution, m));
        }
        if lowest.map_or(true, |(_, best)| m < best) {
            lowest = Some((institution, m));
        }
    }

    match (highest, lowest) {
        (Some(hi), Some(lo)) => KpiResult::Summary {
            highest: InstitutionRate {
                institution: hi.0.to_string(),
                rate_pct: hi.1 * 100.0,
            },
            lowest: InstitutionRate {
                institution: lo.0.to_string(),
                rate_pct: lo.1 * 100.0,
            },
            average_pct: overall * 100.0,
            note: POOLED_CURRENCY_NOTE,
        },
        _ => KpiResult::NotAvailable,
    }
}
