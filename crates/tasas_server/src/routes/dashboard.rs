//! Dashboard endpoints
//!
//! `POST /api/v1/dashboard` recomputes the view for the posted selection
//! without touching server state. `/api/v1/selection` exposes the process-wide
//! [`SelectionBinder`](tasas_core::SelectionBinder): `GET` returns the current
//! selection and view, `PUT` applies one change and returns the recomputed view.

use axum::{
    extract::State,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use tasas_core::{Dashboard, DashboardView, Selection, SelectionChange};

use super::AppState;

/// Binder snapshot
#[derive(Debug, Serialize)]
pub struct SelectionResponse<'a> {
    /// Number of changes applied since startup
    pub revision: u64,
    /// Current selection
    pub selection: &'a Selection,
    /// View for the current selection
    pub view: &'a DashboardView,
}

/// Build the dashboard routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/dashboard", post(compute_handler))
        .route(
            "/api/v1/selection",
            get(get_selection_handler).put(put_selection_handler),
        )
}

/// POST /api/v1/dashboard - Recompute for a selection
async fn compute_handler(
    State(state): State<AppState>,
    Json(selection): Json<Selection>,
) -> Json<DashboardView> {
    Json(Dashboard::compute(&state.dataset, &selection))
}

/// GET /api/v1/selection - Current binder state
async fn get_selection_handler(State(state): State<AppState>) -> Response {
    let binder = state.binder.read().await;
    Json(SelectionResponse {
        revision: binder.revision(),
        selection: binder.selection(),
        view: binder.view(),
    })
    .into_response()
}

/// PUT /api/v1/selection - Apply a selection change
async fn put_selection_handler(
    State(state): State<AppState>,
    Json(change): Json<SelectionChange>,
) -> Response {
    let mut binder = state.binder.write().await;
    binder.apply(change);

    tracing::info!(
        revision = binder.revision(),
        rows = binder.view().row_count,
        "Selection updated"
    );

    Json(SelectionResponse {
        revision: binder.revision(),
        selection: binder.selection(),
        view: binder.view(),
    })
    .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_support::create_test_state;
    use approx::assert_relative_eq;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    async fn send(router: Router, method: &str, uri: &str, body: &str) -> (StatusCode, Value) {
        let response = router
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_compute_unfiltered() {
        let router = routes().with_state(create_test_state());
        let (status, view) = send(router, "POST", "/api/v1/dashboard", "{}").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["row_count"], 3);
        assert_eq!(view["kpi"]["kind"], "summary");
        assert_eq!(view["kpi"]["highest"]["institution"], "Banco X");
        assert_eq!(view["bar"]["categories"], serde_json::json!(["CLP", "UF"]));
        assert_eq!(view["boxplot"]["categories"], serde_json::json!(["AA-", "BBB", "B"]));
    }

    #[tokio::test]
    async fn test_compute_single_institution() {
        let router = routes().with_state(create_test_state());
        let (status, view) = send(
            router,
            "POST",
            "/api/v1/dashboard",
            r#"{"institutions": ["Banco X"], "companies": null}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["kpi"]["kind"], "single_institution");
        assert_relative_eq!(view["kpi"]["average_pct"].as_f64().unwrap(), 9.0, epsilon = 1e-9);
        assert_eq!(view["kpi_cards"][0]["value"], "9.00%");
    }

    #[tokio::test]
    async fn test_compute_empty_result() {
        let router = routes().with_state(create_test_state());
        let (status, view) = send(
            router,
            "POST",
            "/api/v1/dashboard",
            r#"{"companies": ["Gamma"]}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["row_count"], 0);
        assert_eq!(view["kpi"]["kind"], "not_available");
        assert_eq!(view["bar"]["series"], serde_json::json!([]));
        assert_eq!(view["scatter"]["series"], serde_json::json!([]));
        assert_eq!(view["boxplot"]["series"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_compute_rejects_malformed_body() {
        let router = routes().with_state(create_test_state());
        let (status, _) = send(router, "POST", "/api/v1/dashboard", "not json").await;
        assert!(status.is_client_error());
    }

    #[tokio::test]
    async fn test_selection_put_updates_shared_binder() {
        let state = create_test_state();
        let router = routes().with_state(state.clone());

        let (status, body) = send(
            router.clone(),
            "PUT",
            "/api/v1/selection",
            r#"{"field": "sectors", "values": ["Mining"]}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["revision"], 1);
        assert_eq!(body["selection"]["sectors"], serde_json::json!(["Mining"]));
        assert_eq!(body["view"]["row_count"], 1);

        let (status, body) = send(router, "GET", "/api/v1/selection", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["revision"], 1);
        assert_eq!(body["view"]["row_count"], 1);

        assert_eq!(state.binder.read().await.revision(), 1);
    }

    #[tokio::test]
    async fn test_selection_clear() {
        let router = routes().with_state(create_test_state());

        send(
            router.clone(),
            "PUT",
            "/api/v1/selection",
            r#"{"field": "companies", "values": ["Beta"]}"#,
        )
        .await;
        let (_, body) = send(router, "PUT", "/api/v1/selection", r#"{"field": "clear"}"#).await;

        assert_eq!(body["revision"], 2);
        assert_eq!(body["view"]["row_count"], 3);
        assert_eq!(body["selection"]["companies"], Value::Null);
    }
}
