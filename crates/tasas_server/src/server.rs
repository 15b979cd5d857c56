//! Server startup and binding
//!
//! Binds the configured host/port and serves the dashboard router until
//! ctrl-c is received.

use std::sync::Arc;

use axum::Router;
use tasas_core::Dataset;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::routes;

/// Server instance that can be started
pub struct Server {
    /// Server configuration
    config: Arc<ServerConfig>,
    /// The built router
    router: Router,
}

impl Server {
    /// Create a new server over an already loaded dataset
    pub fn new(config: ServerConfig, dataset: Dataset) -> Self {
        let config = Arc::new(config);
        let router = routes::build_router(config.clone(), Arc::new(dataset));

        Self { config, router }
    }

    /// Address string the server will bind to
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Run the server on the configured host/port
    pub async fn run(self) -> Result<(), std::io::Error> {
        let listener = TcpListener::bind(self.socket_addr()).await?;
        self.run_with_listener(listener).await
    }

    /// Run the server with a specific listener
    ///
    /// Tests bind port 0 and pass the listener in to get a free port.
    pub async fn run_with_listener(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }

    /// Spawn a server on a random port and return the bound address
    #[cfg(test)]
    pub async fn spawn_test_server(
        config: ServerConfig,
        dataset: Dataset,
    ) -> (std::net::SocketAddr, tokio::task::JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = Self::new(config, dataset);
        let handle = tokio::spawn(async move {
            server.run_with_listener(listener).await.ok();
        });

        tokio::time::sleep(std::time::Duration::from_millis(10)).await;

        (addr, handle)
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_support::sample_dataset;
    use reqwest::StatusCode;
    use serde_json::{json, Value};

    #[test]
    fn test_server_socket_addr() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
            ..Default::default()
        };

        let server = Server::new(config, sample_dataset());

        assert_eq!(server.socket_addr(), "127.0.0.1:3000");
        assert_eq!(server.config().port, 3000);
    }

    #[tokio::test]
    async fn test_server_health_endpoint() {
        let (addr, handle) = Server::spawn_test_server(ServerConfig::default(), sample_dataset()).await;

        let response = reqwest::get(format!("http://{}/health", addr)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = response.json().await.unwrap();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["dataset"]["rows"], 4);

        handle.abort();
    }

    #[tokio::test]
    async fn test_selection_flow_over_http() {
        let (addr, handle) = Server::spawn_test_server(ServerConfig::default(), sample_dataset()).await;
        let client = reqwest::Client::new();

        let response = client
            .put(format!("http://{}/api/v1/selection", addr))
            .json(&json!({ "field": "institutions", "values": ["Banco X"] }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = client
            .get(format!("http://{}/api/v1/selection", addr))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["revision"], 1);
        assert_eq!(body["view"]["kpi"]["kind"], "single_institution");
        assert_eq!(body["view"]["kpi_cards"][0]["value"], "9.00%");

        handle.abort();
    }

    #[tokio::test]
    async fn test_server_csv_download() {
        let (addr, handle) = Server::spawn_test_server(ServerConfig::default(), sample_dataset()).await;

        let response = reqwest::get(format!("http://{}/download_csv", addr)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let text = response.text().await.unwrap();
        assert_eq!(text.lines().count(), 4);

        handle.abort();
    }

    #[tokio::test]
    async fn test_server_unknown_route_returns_404() {
        let (addr, handle) = Server::spawn_test_server(ServerConfig::default(), sample_dataset()).await;

        let response = reqwest::get(format!("http://{}/unknown/path", addr)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        handle.abort();
    }
}
