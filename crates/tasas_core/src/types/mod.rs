//! Domain types shared by every stage of the pipeline.
//!
//! - `record`: [`LoanRecord`], one row of the source table, and its column names
//! - `rating`: the fixed credit-rating order and the rating guide
//! - `error`: [`LoadError`] and [`ExportError`]

pub mod error;
pub mod rating;
pub mod record;

pub use error::{ExportError, LoadError};
pub use rating::{rating_rank, RatingGuideEntry, RATING_GUIDE, RATING_MODIFIER_NOTE, RATING_ORDER};
pub use record::{columns, LoanRecord};
