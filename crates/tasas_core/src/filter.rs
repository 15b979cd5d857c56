//! Filter engine.
//!
//! A [`Selection`] holds the user's dropdown choices; [`filter`] derives the
//! [`FilteredView`] of matching rows. Rows whose creditor is not Chilean are
//! always excluded, independent of the selection.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::loader::Dataset;
use crate::types::LoanRecord;

/// Creditor country every chart and KPI is restricted to.
pub const CREDITOR_COUNTRY: &str = "Chile";

/// Current dropdown selections.
///
/// Each dimension is `None` or an empty set when no filter applies to it.
/// A `null` or missing field in JSON deserialises to `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Selection {
    /// Chosen borrowing companies
    pub companies: Option<BTreeSet<String>>,
    /// Chosen sectors
    pub sectors: Option<BTreeSet<String>>,
    /// Chosen creditor institutions
    pub institutions: Option<BTreeSet<String>>,
    /// Chosen loan terms
    pub terms: Option<BTreeSet<String>>,
}

fn to_set<I, S>(values: I) -> Option<BTreeSet<String>>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Some(values.into_iter().map(Into::into).collect())
}

/// Active constraint of one dimension; `None` when unconstrained.
fn active(set: &Option<BTreeSet<String>>) -> Option<&BTreeSet<String>> {
    set.as_ref().filter(|s| !s.is_empty())
}

fn admits(set: &Option<BTreeSet<String>>, value: &str) -> bool {
    active(set).map_or(true, |s| s.contains(value))
}

impl Selection {
    /// Restrict to the given companies.
    pub fn with_companies<I, S>(mut self, companies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.companies = to_set(companies);
        self
    }

    /// Restrict to the given sectors.
    pub fn with_sectors<I, S>(mut self, sectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sectors = to_set(sectors);
        self
    }

    /// Restrict to the given creditor institutions.
    pub fn with_institutions<I, S>(mut self, institutions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.institutions = to_set(institutions);
        self
    }

    /// Restrict to the given loan terms.
    pub fn with_terms<I, S>(mut self, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.terms = to_set(terms);
        self
    }

    /// Whether no dimension is constrained.
    pub fn is_unfiltered(&self) -> bool {
        active(&self.companies).is_none()
            && active(&self.sectors).is_none()
            && active(&self.institutions).is_none()
            && active(&self.terms).is_none()
    }

    /// The institution name when exactly one institution is selected.
    pub fn single_institution(&self) -> Option<&str> {
        match active(&self.institutions) {
            Some(set) if set.len() == 1 => set.iter().next().map(String::as_str),
            _ => None,
        }
    }

    /// Whether `record` satisfies the Chile rule and every active constraint.
    ///
    /// Under an active term constraint, records without a term never match.
    pub fn matches(&self, record: &LoanRecord) -> bool {
        record.creditor_country == CREDITOR_COUNTRY
            && admits(&self.companies, &record.company)
            && admits(&self.sectors, &record.sector)
            && admits(&self.institutions, &record.institution)
            && match active(&self.terms) {
                None => true,
                Some(terms) => record.term.as_ref().is_some_and(|t| terms.contains(t)),
            }
    }
}

/// Rows of a [`Dataset`] matching a [`Selection`], in source order.
///
/// Borrows the dataset; recomputed on every selection change and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredView<'a> {
    rows: Vec<&'a LoanRecord>,
}

impl<'a> FilteredView<'a> {
    /// Build a view directly from rows.
    pub fn from_rows(rows: Vec<&'a LoanRecord>) -> Self {
        Self { rows }
    }

    /// Matching rows in source order.
    pub fn rows(&self) -> &[&'a LoanRecord] {
        &self.rows
    }

    /// Iterate over the matching rows.
    pub fn iter(&self) -> impl Iterator<Item = &'a LoanRecord> + '_ {
        self.rows.iter().copied()
    }

    /// Number of matching rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether no row matched.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Derive the rows of `dataset` matching `selection` (plus the Chile rule).
pub fn filter<'a>(dataset: &'a Dataset, selection: &Selection) -> FilteredView<'a> {
    FilteredView {
        rows: dataset
            .records()
            .iter()
            .filter(|r| selection.matches(r))
            .collect(),
    }
}
