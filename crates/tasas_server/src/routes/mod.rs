//! Route modules for the dashboard server
//!
//! This module contains endpoint group-specific routers:
//! - dashboard: recomputation and the shared selection binder
//! - catalog: dropdown options and the rating guide
//! - download: CSV and Excel downloads
//! - health: Health check and readiness endpoints

pub mod catalog;
pub mod dashboard;
pub mod download;
pub mod health;

use axum::Router;
use std::sync::Arc;
use tasas_core::{Dataset, SelectionBinder};
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Server configuration
    pub config: Arc<ServerConfig>,
    /// Loaded dataset, read-only for the process lifetime
    pub dataset: Arc<Dataset>,
    /// Selection shared by every client of this process
    pub binder: Arc<RwLock<SelectionBinder>>,
    /// Server start time for uptime calculation
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Create a new AppState
    pub fn new(config: Arc<ServerConfig>, dataset: Arc<Dataset>) -> Self {
        let binder = SelectionBinder::new(dataset.clone());
        Self {
            config,
            dataset,
            binder: Arc::new(RwLock::new(binder)),
            start_time: std::time::Instant::now(),
        }
    }
}

/// Build the main application router by merging all route modules
pub fn build_router(config: Arc<ServerConfig>, dataset: Arc<Dataset>) -> Router {
    let state = AppState::new(config, dataset);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(health::routes())
        .merge(dashboard::routes())
        .merge(catalog::routes())
        .merge(download::routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use tasas_core::LoanRecord;

    pub fn sample_dataset() -> Dataset {
        Dataset::from_records(vec![
            LoanRecord::new("Acme", "Retail", "Banco X", "Chile", "CLP", Some(0.08), Some(100.0))
                .with_rating("BBB")
                .with_term("12"),
            LoanRecord::new("Acme", "Retail", "Banco X", "Chile", "UF", Some(0.10), Some(250.0))
                .with_rating("AA-")
                .with_term("36"),
            LoanRecord::new("Beta", "Mining", "Banco Y", "Chile", "CLP", Some(0.06), Some(80.0))
                .with_rating("B"),
            LoanRecord::new("Gamma", "Energy", "Bank Z", "USA", "USD", Some(0.03), Some(40.0)),
        ])
    }

    pub fn create_test_state() -> AppState {
        AppState::new(
            Arc::new(ServerConfig::default()),
            Arc::new(sample_dataset()),
        )
    }

    pub fn create_test_router() -> Router {
        build_router(
            Arc::new(ServerConfig::default()),
            Arc::new(sample_dataset()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_router_merges_all_route_groups() {
        let router = create_test_router();

        for uri in [
            "/health",
            "/ready",
            "/api/v1/selection",
            "/api/v1/options",
            "/api/v1/ratings",
            "/download_csv",
        ] {
            let response = router
                .clone()
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK, "GET {uri}");
        }

        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/dashboard")
                    .header("content-type", "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_route_returns_404() {
        let response = create_test_router()
            .oneshot(
                Request::builder()
                    .uri("/unknown/path")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_app_state_starts_unfiltered() {
        let state = create_test_state();
        let binder = state.binder.read().await;

        assert!(binder.selection().is_unfiltered());
        assert_eq!(binder.view().row_count, 3);
        assert_eq!(state.dataset.len(), 4);
    }
}
