//! Dataset loader.
//!
//! Reads the interest-rate table once at startup. Spreadsheets
//! (`.xlsx`, `.xlsm`, `.xls`, `.ods`) are read with `calamine` from a named
//! sheet; `.csv` files are read with the `csv` crate. Both paths normalise
//! into the same cell representation before records are built, so column
//! matching and numeric validation behave identically.
//!
//! Blank cells, spreadsheet error cells and the common missing-value tokens
//! (`NaN`, `#N/A`, `N/A`, `null`, ...) all load as missing.

use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Reader};
use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::types::{columns, LoadError, LoanRecord};

/// Where the table comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSource {
    /// Path to the spreadsheet or CSV file
    pub path: PathBuf,
    /// Sheet to read (ignored for CSV)
    pub sheet: String,
}

impl DataSource {
    /// Create a data source.
    pub fn new(path: impl Into<PathBuf>, sheet: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            sheet: sheet.into(),
        }
    }
}

/// Immutable in-memory table of loan records.
///
/// Built once and shared read-only (typically behind an `Arc`) by the
/// dashboard computation and the download handlers.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<LoanRecord>,
    table: SourceTable,
    source: Option<DataSource>,
}

/// The loaded sheet as text, every source column kept.
///
/// `rows[i]` is the source row `records[i]` was built from; each row has
/// exactly `header.len()` cells. Missing and error cells are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceTable {
    /// Header row, trimmed
    pub header: Vec<String>,
    /// Data rows in source order
    pub rows: Vec<Vec<String>>,
}

impl SourceTable {
    /// Rebuild a table from the modeled fields only.
    ///
    /// `Rating` and `Plazo` columns are included only when some record
    /// carries a value for them.
    fn from_records(records: &[LoanRecord]) -> Self {
        let with_rating = records.iter().any(|r| r.rating.is_some());
        let with_term = records.iter().any(|r| r.term.is_some());
        let number = |v: Option<f64>| v.and_then(|v| Cell::Number(v).text()).unwrap_or_default();

        let mut header: Vec<String> = columns::REQUIRED.iter().map(|c| c.to_string()).collect();
        if with_rating {
            header.push(columns::RATING.to_string());
        }
        if with_term {
            header.push(columns::TERM.to_string());
        }

        let rows = records
            .iter()
            .map(|r| {
                let mut row = vec![
                    r.company.clone(),
                    r.sector.clone(),
                    r.institution.clone(),
                    r.creditor_country.clone(),
                    r.currency.clone(),
                    number(r.nominal_rate),
                    number(r.total),
                ];
                if with_rating {
                    row.push(r.rating.clone().unwrap_or_default());
                }
                if with_term {
                    row.push(r.term.clone().unwrap_or_default());
                }
                row
            })
            .collect();

        Self { header, rows }
    }
}

impl Dataset {
    /// Wrap already-built records.
    pub fn from_records(records: Vec<LoanRecord>) -> Self {
        Self {
            table: SourceTable::from_records(&records),
            records,
            source: None,
        }
    }

    /// Load the table described by `source`.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] when the file is missing or unreadable, the
    /// sheet does not exist or is empty, a required column is absent, or a
    /// numeric column holds text that is not a missing-value token.
    pub fn load(source: &DataSource) -> Result<Self, LoadError> {
        let table = match SourceFormat::detect(&source.path)? {
            SourceFormat::Spreadsheet => read_spreadsheet(&source.path, &source.sheet)?,
            SourceFormat::Csv => read_csv(&source.path)?,
        };
        let (records, table) = build_records(table)?;

        info!(
            path = %source.path.display(),
            sheet = %source.sheet,
            rows = records.len(),
            columns = table.header.len(),
            "Dataset loaded"
        );

        Ok(Self {
            records,
            table,
            source: Some(source.clone()),
        })
    }

    /// All records in source order.
    pub fn records(&self) -> &[LoanRecord] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Every source column as text, row-aligned with [`Dataset::records`].
    pub fn table(&self) -> &SourceTable {
        &self.table
    }

    /// Source the table was loaded from, if any.
    pub fn source(&self) -> Option<&DataSource> {
        self.source.as_ref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceFormat {
    Spreadsheet,
    Csv,
}

impl SourceFormat {
    fn detect(path: &Path) -> Result<Self, LoadError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("xlsx" | "xlsm" | "xlsb" | "xls" | "ods") => Ok(SourceFormat::Spreadsheet),
            Some("csv") => Ok(SourceFormat::Csv),
            _ => Err(LoadError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// Text read as a missing value in any column, as spreadsheet exports and
/// pandas-produced files write it.
const MISSING_TOKENS: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN", "<NA>",
    "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Cell value after format-specific decoding.
#[derive(Debug, Clone, PartialEq)]
enum Cell {
    Empty,
    Text(String),
    Number(f64),
}

impl Cell {
    fn from_text(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || MISSING_TOKENS.contains(&trimmed) {
            Cell::Empty
        } else {
            Cell::Text(trimmed.to_string())
        }
    }

    fn text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) => Some(s.clone()),
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => Some(format!("{}", *n as i64)),
            Cell::Number(n) => Some(n.to_string()),
        }
    }

    /// Numeric value of the cell. Missing and non-finite values are `None`.
    fn number(&self, row: usize, column: &'static str) -> Result<Option<f64>, LoadError> {
        let value = match self {
            Cell::Empty => return Ok(None),
            Cell::Number(n) => *n,
            Cell::Text(s) => parse_number(s).ok_or_else(|| LoadError::InvalidNumber {
                row,
                column,
                value: s.clone(),
            })?,
        };

        if value.is_finite() {
            Ok(Some(value))
        } else {
            debug!(row, column, "Non-finite number read as missing");
            Ok(None)
        }
    }
}

/// Parse a numeric cell, accepting a decimal comma when no point is present.
fn parse_number(s: &str) -> Option<f64> {
    let s = s.trim();
    s.parse::<f64>().ok().or_else(|| {
        if s.contains(',') && !s.contains('.') {
            s.replace(',', ".").parse::<f64>().ok()
        } else {
            None
        }
    })
}

struct RawTable {
    header: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

fn read_spreadsheet(path: &Path, sheet: &str) -> Result<RawTable, LoadError> {
    if !path.exists() {
        return Err(LoadError::Io {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        });
    }

    let mut workbook =
        open_workbook_auto(path).map_err(|e| LoadError::Spreadsheet(e.to_string()))?;

    let names = workbook.sheet_names();
    if !names.iter().any(|n| n == sheet) {
        return Err(LoadError::SheetNotFound {
            sheet: sheet.to_string(),
            available: names.join(", "),
        });
    }

    let range = workbook
        .worksheet_range(sheet)
        .map_err(|e| LoadError::Spreadsheet(e.to_string()))?;

    let mut rows = range.rows();
    let header = rows
        .next()
        .ok_or(LoadError::Empty)?
        .iter()
        .map(|c| c.to_string().trim().to_string())
        .collect();

    let rows = rows
        .map(|row| row.iter().map(decode_spreadsheet_cell).collect())
        .collect();

    Ok(RawTable { header, rows })
}

fn decode_spreadsheet_cell(cell: &Data) -> Cell {
    match cell {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::String(s) => Cell::from_text(s),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(value) => Cell::Text(format_datetime(value)),
            None => Cell::Number(dt.as_f64()),
        },
        other => Cell::from_text(&other.to_string()),
    }
}

/// Dates without a time of day print as `YYYY-MM-DD`.
fn format_datetime(value: NaiveDateTime) -> String {
    if value.time() == NaiveTime::MIN {
        value.format("%Y-%m-%d").to_string()
    } else {
        value.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

fn read_csv(path: &Path) -> Result<RawTable, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(file);

    let header: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();
    if header.iter().all(|h| h.is_empty()) {
        return Err(LoadError::Empty);
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(Cell::from_text).collect());
    }

    Ok(RawTable { header, rows })
}

/// Column positions resolved from the header row.
struct ColumnIndex {
    company: usize,
    sector: usize,
    institution: usize,
    creditor_country: usize,
    currency: usize,
    nominal_rate: usize,
    total: usize,
    term: Option<usize>,
    rating: Option<usize>,
}

impl ColumnIndex {
    fn resolve(header: &[String]) -> Result<Self, LoadError> {
        let find = |name: &str| header.iter().position(|h| h == name);
        let require = |name: &'static str| find(name).ok_or(LoadError::MissingColumn(name));

        Ok(Self {
            company: require(columns::COMPANY)?,
            sector: require(columns::SECTOR)?,
            institution: require(columns::INSTITUTION)?,
            creditor_country: require(columns::CREDITOR_COUNTRY)?,
            currency: require(columns::CURRENCY)?,
            nominal_rate: require(columns::NOMINAL_RATE)?,
            total: require(columns::TOTAL)?,
            term: find(columns::TERM),
            rating: find(columns::RATING),
        })
    }
}

fn build_records(table: RawTable) -> Result<(Vec<LoanRecord>, SourceTable), LoadError> {
    let index = ColumnIndex::resolve(&table.header)?;
    let empty = Cell::Empty;
    let width = table.header.len();
    let mut records = Vec::with_capacity(table.rows.len());
    let mut text_rows: Vec<Vec<String>> = Vec::with_capacity(table.rows.len());
    let mut skipped = 0usize;

    for (i, row) in table.rows.iter().enumerate() {
        if row.iter().all(|c| *c == Cell::Empty) {
            skipped += 1;
            continue;
        }

        let row_no = i + 1;
        let cell = |idx: usize| row.get(idx).unwrap_or(&empty);
        let text = |idx: usize| cell(idx).text().unwrap_or_default();

        records.push(LoanRecord {
            company: text(index.company),
            sector: text(index.sector),
            institution: text(index.institution),
            creditor_country: text(index.creditor_country),
            currency: text(index.currency),
            nominal_rate: cell(index.nominal_rate).number(row_no, columns::NOMINAL_RATE)?,
            total: cell(index.total).number(row_no, columns::TOTAL)?,
            term: index.term.and_then(|idx| cell(idx).text()),
            rating: index.rating.and_then(|idx| cell(idx).text()),
        });
        text_rows.push((0..width).map(text).collect());
    }

    if skipped > 0 {
        debug!(skipped, "Blank rows skipped");
    }

    let table = SourceTable {
        header: table.header,
        rows: text_rows,
    };
    Ok((records, table))
}
