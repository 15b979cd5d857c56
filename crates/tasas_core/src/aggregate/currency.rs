//! Mean rate per (currency, institution).
//!
//! Output order drives the bar chart's category layout: currency ascending
//! (lexicographic), then mean rate ascending. Groups with equal currency and
//! equal mean keep institution-name order.

use std::collections::BTreeMap;

use serde::Serialize;

use super::MeanAccumulator;
use crate::filter::FilteredView;

/// Mean nominal rate of one institution in one currency.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrencyInstitutionMean {
    /// Currency type
    pub currency: String,
    /// Creditor institution
    pub institution: String,
    /// Mean nominal rate (decimal fraction)
    pub mean_rate: f64,
}

/// Group `view` by (currency, institution) and sort by (currency, mean rate).
///
/// Groups whose rows all lack a rate have no mean and are omitted.
pub fn group_by_currency_and_institution(view: &FilteredView<'_>) -> Vec<CurrencyInstitutionMean> {
    let mut groups: BTreeMap<(&str, &str), MeanAccumulator> = BTreeMap::new();
    for record in view.iter() {
        groups
            .entry((record.currency.as_str(), record.institution.as_str()))
            .or_default()
            .push(record.nominal_rate);
    }

    let mut rows: Vec<CurrencyInstitutionMean> = groups
        .into_iter()
        .filter_map(|((currency, institution), acc)| {
            acc.mean().map(|mean_rate| CurrencyInstitutionMean {
                currency: currency.to_string(),
                institution: institution.to_string(),
                mean_rate,
            })
        })
        .collect();

    rows.sort_by(|a, b| {
        a.currency
            .cmp(&b.currency)
            .then(a.mean_rate.total_cmp(&b.mean_rate))
    });
    rows
}
