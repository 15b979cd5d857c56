//! Download endpoints
//!
//! - `GET /download_csv`: Chile-creditor rows as CSV, filename stamped with
//!   today's date
//! - `GET /download_excel`: the configured spreadsheet, byte for byte

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    routing::get,
    Router,
};
use std::path::Path;
use tasas_core::export;

use super::AppState;
use crate::error::ApiError;

const XLSX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Build the download routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/download_csv", get(download_csv))
        .route("/download_excel", get(download_excel))
}

/// `Content-Disposition` value for `filename`.
///
/// Names that are not plain printable ASCII get an ASCII fallback plus an
/// RFC 5987 `filename*` parameter so the header value stays valid.
fn attachment(filename: &str) -> String {
    let fallback: String = filename
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c == ' ' || c.is_ascii_graphic() => c,
            _ => '_',
        })
        .collect();

    if fallback == filename {
        format!("attachment; filename=\"{}\"", filename)
    } else {
        format!(
            "attachment; filename=\"{}\"; filename*=UTF-8''{}",
            fallback,
            encode_rfc5987(filename)
        )
    }
}

fn encode_rfc5987(value: &str) -> String {
    let mut out = String::with_capacity(value.len() * 3);
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' => out.push(byte as char),
            b'!' | b'#' | b'$' | b'&' | b'+' | b'-' | b'.' | b'^' | b'_' | b'`' | b'|' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

fn content_type_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("xlsx" | "xlsm") => XLSX_CONTENT_TYPE,
        Some("xls") => "application/vnd.ms-excel",
        Some("ods") => "application/vnd.oasis.opendocument.spreadsheet",
        Some("csv") => "text/csv; charset=utf-8",
        _ => "application/octet-stream",
    }
}

/// GET /download_csv - Chile rows as CSV
async fn download_csv(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let bytes = export::chile_csv(&state.dataset)?;
    let filename = export::csv_filename(chrono::Local::now().date_naive());

    tracing::info!(%filename, bytes = bytes.len(), "Serving CSV download");

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, attachment(&filename)),
        ],
        bytes,
    ))
}

/// GET /download_excel - Source spreadsheet verbatim
async fn download_excel(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let path = state.config.excel_download_path().to_path_buf();

    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ApiError::NotFound(path.display().to_string()));
        }
        Err(e) => return Err(e.into()),
    };

    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "tasas_interes.xlsx".to_string());

    tracing::info!(path = %path.display(), bytes = bytes.len(), "Serving spreadsheet download");

    Ok((
        [
            (header::CONTENT_TYPE, content_type_for(&path).to_string()),
            (header::CONTENT_DISPOSITION, attachment(&filename)),
        ],
        bytes,
    ))
}
