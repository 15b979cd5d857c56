//! CSV export of the Chile-creditor rows.

use chrono::NaiveDate;
use tracing::info;

use crate::filter::Selection;
use crate::loader::Dataset;
use crate::types::{columns, ExportError};

/// CSV of every Chile-creditor row with all source columns.
///
/// Header and cells are written as loaded, so columns the dashboard does not
/// model (identifiers, other rates, dates) survive the download. A dataset
/// without a header row gets the required column names.
///
/// # Errors
///
/// Returns [`ExportError`] if the CSV writer fails.
pub fn chile_csv(dataset: &Dataset) -> Result<Vec<u8>, ExportError> {
    let table = dataset.table();
    let chile_only = Selection::default();
    let mut writer = csv::Writer::from_writer(Vec::new());

    if table.header.is_empty() {
        writer.write_record(columns::REQUIRED)?;
    } else {
        writer.write_record(&table.header)?;
    }

    let mut rows = 0usize;
    for (record, row) in dataset.records().iter().zip(&table.rows) {
        if chile_only.matches(record) {
            writer.write_record(row)?;
            rows += 1;
        }
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Buffer(e.to_string()))?;

    info!(rows, columns = table.header.len(), bytes = bytes.len(), "CSV export generated");
    Ok(bytes)
}

/// Download filename stamped with `date`, e.g. `data_19-10-26.csv`.
pub fn csv_filename(date: NaiveDate) -> String {
    format!("data_{}.csv", date.format("%d-%m-%y"))
}
