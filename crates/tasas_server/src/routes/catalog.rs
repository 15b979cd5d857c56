//! Reference data endpoints
//!
//! Dropdown options derived from the loaded dataset, and the fixed rating
//! scale with its plain-language guide.

use axum::{extract::State, response::Json, routing::get, Router};
use serde::Serialize;
use tasas_core::options::FilterOptions;
use tasas_core::types::{RatingGuideEntry, RATING_GUIDE, RATING_MODIFIER_NOTE, RATING_ORDER};

use super::AppState;

/// Rating scale response
#[derive(Debug, Clone, Serialize)]
pub struct RatingsResponse {
    /// Full rating order, strongest first
    pub order: &'static [&'static str],
    /// Meaning of each base category
    pub guide: &'static [RatingGuideEntry],
    /// Note on `+`/`-` modifiers
    pub note: &'static str,
}

/// Build the catalog routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/options", get(options_handler))
        .route("/api/v1/ratings", get(ratings_handler))
}

/// GET /api/v1/options - Dropdown choices
async fn options_handler(State(state): State<AppState>) -> Json<FilterOptions> {
    Json(FilterOptions::from_dataset(&state.dataset))
}

/// GET /api/v1/ratings - Rating scale and guide
async fn ratings_handler() -> Json<RatingsResponse> {
    Json(RatingsResponse {
        order: &RATING_ORDER,
        guide: &RATING_GUIDE,
        note: RATING_MODIFIER_NOTE,
    })
}
