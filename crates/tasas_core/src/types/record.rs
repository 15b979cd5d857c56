//! Loan record: one row of the interest-rate table.

use serde::{Deserialize, Serialize};

/// Header names of the source spreadsheet.
///
/// The loader matches headers after trimming surrounding whitespace; the CSV
/// export writes them back verbatim so a download reopens in the same tools.
pub mod columns {
    /// Borrowing company.
    pub const COMPANY: &str = "Empresa";
    /// Economic sector of the borrower.
    pub const SECTOR: &str = "Sector";
    /// Creditor institution name.
    pub const INSTITUTION: &str = "Nombre entidad acreedora";
    /// Country of the creditor institution.
    pub const CREDITOR_COUNTRY: &str = "Pais Empresa Acreedora";
    /// Currency of the loan.
    pub const CURRENCY: &str = "Tipo Moneda";
    /// Nominal rate as a decimal fraction.
    pub const NOMINAL_RATE: &str = "Tasa nominal";
    /// Total amount of the loan.
    pub const TOTAL: &str = "Total";
    /// Credit rating of the borrower (optional column).
    pub const RATING: &str = "Rating";
    /// Loan term (optional column, later dataset variant only).
    pub const TERM: &str = "Plazo";

    /// Columns that must be present for a dataset to load.
    pub const REQUIRED: [&str; 7] = [
        COMPANY,
        SECTOR,
        INSTITUTION,
        CREDITOR_COUNTRY,
        CURRENCY,
        NOMINAL_RATE,
        TOTAL,
    ];
}

/// A single loan taken by a company.
///
/// Immutable once loaded. Numeric cells left blank in the source are `None`
/// and are skipped by every mean computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRecord {
    /// Borrowing company
    pub company: String,
    /// Sector of the borrowing company
    pub sector: String,
    /// Creditor institution (bank or lender)
    pub institution: String,
    /// Country of the creditor institution
    pub creditor_country: String,
    /// Currency type (e.g. "CLP", "UF", "USD")
    pub currency: String,
    /// Nominal rate as a decimal fraction (0.085 = 8.5%)
    pub nominal_rate: Option<f64>,
    /// Total amount of the loan
    pub total: Option<f64>,
    /// Contractual term, present only in the later dataset variant
    pub term: Option<String>,
    /// Credit rating of the borrower
    pub rating: Option<String>,
}

impl LoanRecord {
    /// Build a record without term or rating.
    pub fn new(
        company: impl Into<String>,
        sector: impl Into<String>,
        institution: impl Into<String>,
        creditor_country: impl Into<String>,
        currency: impl Into<String>,
        nominal_rate: Option<f64>,
        total: Option<f64>,
    ) -> Self {
        Self {
            company: company.into(),
            sector: sector.into(),
            institution: institution.into(),
            creditor_country: creditor_country.into(),
            currency: currency.into(),
            nominal_rate,
            total,
            term: None,
            rating: None,
        }
    }

    /// Set the loan term.
    pub fn with_term(mut self, term: impl Into<String>) -> Self {
        self.term = Some(term.into());
        self
    }

    /// Set the borrower's credit rating.
    pub fn with_rating(mut self, rating: impl Into<String>) -> Self {
        self.rating = Some(rating.into());
        self
    }
}
