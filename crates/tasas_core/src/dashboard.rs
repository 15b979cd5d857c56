//! Dashboard recomputation and the selection binder.
//!
//! [`Dashboard::compute`] is the whole pipeline as one pure function:
//! filter, run every aggregator, adapt every chart. [`SelectionBinder`]
//! holds the current selection and replays that function on each change.
//! There is no caching and no incremental update; every change recomputes
//! everything from the immutable dataset.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::aggregate::{
    group_by_currency_and_institution, group_by_rating, scatter_pairs, summarize, KpiCard,
    KpiResult,
};
use crate::chart::{bar_chart, box_chart, scatter_chart, BarChart, BoxChart, ScatterChart};
use crate::filter::{filter, Selection};
use crate::loader::Dataset;

/// Everything the rendering layer needs for one selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    /// Rows in the filtered view
    pub row_count: usize,
    /// Headline metrics
    pub kpi: KpiResult,
    /// Rendered KPI cards
    pub kpi_cards: Vec<KpiCard>,
    /// Mean rate per currency and institution
    pub bar: BarChart,
    /// Amount against rate
    pub scatter: ScatterChart,
    /// Rate distribution per rating
    pub boxplot: BoxChart,
}

/// Namespace for the pure recomputation function.
pub struct Dashboard;

impl Dashboard {
    /// Recompute the full dashboard for `selection`.
    pub fn compute(dataset: &Dataset, selection: &Selection) -> DashboardView {
        let view = filter(dataset, selection);

        let kpi = summarize(&view, selection);
        let bar = bar_chart(&group_by_currency_and_institution(&view));
        let scatter = scatter_chart(&scatter_pairs(&view));
        let boxplot = box_chart(&group_by_rating(&view));

        debug!(
            rows = view.len(),
            bars = bar.series.len(),
            ratings = boxplot.categories.len(),
            kpi_available = kpi.is_available(),
            "Dashboard recomputed"
        );

        DashboardView {
            row_count: view.len(),
            kpi_cards: kpi.cards(),
            kpi,
            bar,
            scatter,
            boxplot,
        }
    }
}

/// A user change to one selection dimension.
///
/// JSON form: `{"field": "institutions", "values": ["Banco X"]}`;
/// `null` or `[]` values clear that dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "values", rename_all = "snake_case")]
pub enum SelectionChange {
    /// Replace the company choice
    Companies(Option<BTreeSet<String>>),
    /// Replace the sector choice
    Sectors(Option<BTreeSet<String>>),
    /// Replace the institution choice
    Institutions(Option<BTreeSet<String>>),
    /// Replace the term choice
    Terms(Option<BTreeSet<String>>),
    /// Replace the whole selection
    Replace(Selection),
    /// Drop every filter
    Clear,
}

impl SelectionChange {
    fn apply_to(self, selection: &mut Selection) {
        match self {
            SelectionChange::Companies(v) => selection.companies = v,
            SelectionChange::Sectors(v) => selection.sectors = v,
            SelectionChange::Institutions(v) => selection.institutions = v,
            SelectionChange::Terms(v) => selection.terms = v,
            SelectionChange::Replace(s) => *selection = s,
            SelectionChange::Clear => *selection = Selection::default(),
        }
    }
}

/// Current selection plus the view computed from it.
///
/// Single state: idle with a current selection. [`apply`](Self::apply)
/// updates the selection and recomputes before returning, so the held view
/// always matches the held selection.
#[derive(Debug, Clone)]
pub struct SelectionBinder {
    dataset: Arc<Dataset>,
    selection: Selection,
    view: DashboardView,
    revision: u64,
}

impl SelectionBinder {
    /// Start with no filters applied.
    pub fn new(dataset: Arc<Dataset>) -> Self {
        let selection = Selection::default();
        let view = Dashboard::compute(&dataset, &selection);
        Self {
            dataset,
            selection,
            view,
            revision: 0,
        }
    }

    /// Apply a change, recompute, and return the new view.
    pub fn apply(&mut self, change: SelectionChange) -> &DashboardView {
        change.apply_to(&mut self.selection);
        self.view = Dashboard::compute(&self.dataset, &self.selection);
        self.revision += 1;
        &self.view
    }

    /// Current selection.
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// View for the current selection.
    pub fn view(&self) -> &DashboardView {
        &self.view
    }

    /// Number of changes applied so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LoanRecord;

    fn dataset() -> Arc<Dataset> {
        Arc::new(Dataset::from_records(vec![
            LoanRecord::new("Acme", "Retail", "Banco X", "Chile", "CLP", Some(0.08), Some(100.0))
                .with_rating("BBB"),
            LoanRecord::new("Acme", "Retail", "Banco X", "Chile", "UF", Some(0.10), Some(200.0))
                .with_rating("AA-"),
            LoanRecord::new("Beta", "Mining", "Banco Y", "Chile", "CLP", Some(0.06), Some(50.0)),
            LoanRecord::new("Gamma", "Energy", "Bank Z", "USA", "USD", Some(0.03), Some(10.0)),
        ]))
    }

    #[test]
    fn test_compute_fills_every_output() {
        let dataset = dataset();
        let view = Dashboard::compute(&dataset, &Selection::default());

        assert_eq!(view.row_count, 3);
        assert!(view.kpi.is_available());
        assert_eq!(view.kpi_cards.len(), 3);
        assert_eq!(view.bar.categories, vec!["CLP", "UF"]);
        assert_eq!(view.scatter.point_count(), 3);
        assert_eq!(view.boxplot.categories, vec!["AA-", "BBB"]);
    }

    #[test]
    fn test_compute_is_deterministic() {
        let dataset = dataset();
        let selection = Selection::default().with_sectors(["Retail"]);
        assert_eq!(
            Dashboard::compute(&dataset, &selection),
            Dashboard::compute(&dataset, &selection)
        );
    }

    #[test]
    fn test_empty_result_degrades_gracefully() {
        let dataset = dataset();
        let view = Dashboard::compute(&dataset, &Selection::default().with_companies(["Gamma"]));

        assert_eq!(view.row_count, 0);
        assert_eq!(view.kpi, KpiResult::NotAvailable);
        assert!(view.bar.is_empty());
        assert!(view.scatter.is_empty());
        assert!(view.boxplot.is_empty());
    }

    #[test]
    fn test_binder_recomputes_on_change() {
        let mut binder = SelectionBinder::new(dataset());
        assert_eq!(binder.view().row_count, 3);
        assert_eq!(binder.revision(), 0);

        let institutions = ["Banco X".to_string()].into_iter().collect();
        let view = binder.apply(SelectionChange::Institutions(Some(institutions)));
        assert_eq!(view.row_count, 2);
        assert_eq!(view.kpi.headline().as_deref(), Some("9.00%"));

        binder.apply(SelectionChange::Companies(Some(
            ["Beta".to_string()].into_iter().collect(),
        )));
        assert_eq!(binder.view().row_count, 0);
        assert_eq!(binder.revision(), 2);

        binder.apply(SelectionChange::Clear);
        assert!(binder.selection().is_unfiltered());
        assert_eq!(binder.view().row_count, 3);
    }

    #[test]
    fn test_binder_view_matches_pure_function() {
        let dataset = dataset();
        let mut binder = SelectionBinder::new(dataset.clone());
        binder.apply(SelectionChange::Sectors(Some(
            ["Mining".to_string()].into_iter().collect(),
        )));

        let expected = Dashboard::compute(&dataset, binder.selection());
        assert_eq!(binder.view(), &expected);
    }

    #[test]
    fn test_selection_change_json() {
        let change: SelectionChange =
            serde_json::from_str(r#"{"field": "institutions", "values": ["Banco X"]}"#).unwrap();
        assert_eq!(
            change,
            SelectionChange::Institutions(Some(["Banco X".to_string()].into_iter().collect()))
        );

        let change: SelectionChange =
            serde_json::from_str(r#"{"field": "terms", "values": null}"#).unwrap();
        assert_eq!(change, SelectionChange::Terms(None));

        let change: SelectionChange = serde_json::from_str(r#"{"field": "clear"}"#).unwrap();
        assert_eq!(change, SelectionChange::Clear);
    }
}
