//! Distinct values offered by the selection dropdowns.

use serde::Serialize;

use crate::filter::CREDITOR_COUNTRY;
use crate::loader::Dataset;

/// Dropdown choices, each in first-appearance order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    /// All borrowing companies
    pub companies: Vec<String>,
    /// All sectors
    pub sectors: Vec<String>,
    /// Chilean creditor institutions only
    pub institutions: Vec<String>,
    /// Non-empty loan terms
    pub terms: Vec<String>,
}

fn push_unique(values: &mut Vec<String>, value: &str) {
    if !value.is_empty() && !values.iter().any(|v| v == value) {
        values.push(value.to_string());
    }
}

impl FilterOptions {
    /// Collect the dropdown choices from `dataset`.
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let mut options = Self::default();
        for record in dataset.records() {
            push_unique(&mut options.companies, &record.company);
            push_unique(&mut options.sectors, &record.sector);
            if record.creditor_country == CREDITOR_COUNTRY {
                push_unique(&mut options.institutions, &record.institution);
            }
            if let Some(term) = &record.term {
                push_unique(&mut options.terms, term);
            }
        }
        options
    }
}
