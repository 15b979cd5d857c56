//! # tasas_core: Interest-Rate Analytics for Chilean Corporate Loans
//!
//! Pure computation behind the interest-rate dashboard. The pipeline is:
//!
//! ```text
//! loader -> Dataset (immutable) -> filter(Selection) -> aggregate -> chart
//! ```
//!
//! - `loader`: reads the source spreadsheet (or CSV) once into a [`Dataset`]
//! - `filter`: [`Selection`] and the Chile-only [`FilteredView`]
//! - `aggregate`: KPI summary, currency/bank means, rating-ordered rates, scatter pairs
//! - `chart`: declarative bar/scatter/box descriptions for the rendering layer
//! - `dashboard`: the `(dataset, selection) -> view` function and the [`SelectionBinder`]
//! - `options`: distinct values for the selection dropdowns
//! - `export`: CSV download of the Chile-creditor rows
//!
//! Nothing here performs I/O after load; every derived value is recomputed
//! from the immutable dataset on each selection change.
//!
//! ## Usage Examples
//!
//! ```rust
//! use tasas_core::{Dashboard, Dataset, LoanRecord, Selection};
//!
//! let dataset = Dataset::from_records(vec![
//!     LoanRecord::new("Acme", "Retail", "Banco X", "Chile", "CLP", Some(0.08), Some(100.0)),
//!     LoanRecord::new("Acme", "Retail", "Banco X", "Chile", "CLP", Some(0.10), Some(200.0)),
//! ]);
//!
//! let selection = Selection::default().with_institutions(["Banco X"]);
//! let view = Dashboard::compute(&dataset, &selection);
//! assert_eq!(view.kpi.headline(), Some("9.00%".to_string()));
//! ```

#![deny(missing_docs)]

pub mod aggregate;
pub mod chart;
pub mod dashboard;
pub mod export;
pub mod filter;
pub mod loader;
pub mod options;
pub mod types;

pub use dashboard::{Dashboard, DashboardView, SelectionBinder, SelectionChange};
pub use filter::{FilteredView, Selection, CREDITOR_COUNTRY};
pub use loader::{DataSource, Dataset, SourceTable};
pub use options::FilterOptions;
pub use types::{ExportError, LoadError, LoanRecord};
