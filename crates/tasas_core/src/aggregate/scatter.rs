//! Amount-versus-rate pairs.

use serde::Serialize;

use crate::filter::FilteredView;

/// One point of the amount/rate scatter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPair {
    /// Loan amount (source `Total` column)
    pub amount: Option<f64>,
    /// Nominal rate (decimal fraction)
    pub nominal_rate: Option<f64>,
    /// Creditor institution
    pub institution: String,
    /// Borrowing company
    pub company: String,
    /// Currency type
    pub currency: String,
}

/// Project every row of `view` to a scatter pair, in view order.
pub fn scatter_pairs(view: &FilteredView<'_>) -> Vec<ScatterPair> {
    view.iter()
        .map(|r| ScatterPair {
            amount: r.total,
            nominal_rate: r.nominal_rate,
            institution: r.institution.clone(),
            company: r.company.clone(),
            currency: r.currency.clone(),
        })
        .collect()
}
