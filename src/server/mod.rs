//! HTTP API exposing the scrape pipeline.
//!
//! Provides three endpoints:
//! - `/` - service description
//! - `/api/health` - liveness, uptime and attempt counters
//! - `/api/scrape?keyword=...` - runs one scrape
//!
//! Every other route answers 404 with the JSON error shape.

mod handlers;
mod types;

use std::future::Future;
use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;

use handlers::{health_handler, index_handler, not_found_handler, scrape_handler};
pub use types::AppState;

use crate::Scraper;

/// Builds the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/api/health", get(health_handler))
        .route("/api/scrape", get(scrape_handler))
        .fallback(not_found_handler)
        .with_state(state)
}

/// Serves the API on `listener` until `shutdown` resolves.
///
/// # Errors
///
/// Returns an error if the server fails while accepting connections.
pub async fn serve_on<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<(), anyhow::Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| anyhow::anyhow!("API server error: {}", e))
}

/// Binds `bind:port` and serves the API until Ctrl-C.
///
/// On Ctrl-C the scraper is shut down, which cancels in-flight scrapes so the
/// graceful shutdown does not wait out their retry loops.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails.
pub async fn start_server(scraper: Arc<Scraper>, bind: &str, port: u16) -> Result<(), anyhow::Error> {
    let listener = TcpListener::bind((bind, port))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind API server to {}:{}: {}", bind, port, e))?;

    log::info!("API server listening on http://{}:{}/", bind, port);
    log::info!("  - Scrape: http://{}:{}/api/scrape?keyword=...", bind, port);
    log::info!("  - Health: http://{}:{}/api/health", bind, port);

    let on_signal = Arc::clone(&scraper);
    let shutdown = async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl-C: {}", e);
            return;
        }
        log::info!("Shutdown signal received, cancelling in-flight scrapes");
        on_signal.shutdown();
    };

    serve_on(listener, AppState::new(scraper), shutdown).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    async fn spawn_server() -> (String, Arc<Scraper>, tokio::sync::oneshot::Sender<()>) {
        let config = Config {
            // Nothing listens on the discard port, so any scrape would fail fast
            base_url: "http://127.0.0.1:9".to_string(),
            max_retries: 1,
            initial_delay_min_ms: 0,
            initial_delay_max_ms: 0,
            ..Default::default()
        };
        let scraper = Arc::new(Scraper::new(config).unwrap());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let state = AppState::new(Arc::clone(&scraper));
        tokio::spawn(serve_on(listener, state, async {
            let _ = rx.await;
        }));
        (format!("http://{addr}"), scraper, tx)
    }

    async fn get_json(url: String) -> (u16, serde_json::Value) {
        let response = reqwest::get(url).await.unwrap();
        let status = response.status().as_u16();
        let body = serde_json::from_str(&response.text().await.unwrap()).unwrap();
        (status, body)
    }

    #[tokio::test]
    async fn test_index_describes_endpoints() {
        let (base, _scraper, _stop) = spawn_server().await;
        let (status, body) = get_json(format!("{base}/")).await;
        assert_eq!(status, 200);
        assert_eq!(body["endpoints"]["health"], "/api/health");
        assert!(body["version"].is_string());
    }

    #[tokio::test]
    async fn test_health_reports_ok() {
        let (base, _scraper, _stop) = spawn_server().await;
        let (status, body) = get_json(format!("{base}/api/health")).await;
        assert_eq!(status, 200);
        assert_eq!(body["status"], "OK");
        assert_eq!(body["stats"]["attempts"], 0);
        assert!(body["uptime"].is_number());
    }

    #[tokio::test]
    async fn test_missing_keyword_is_bad_request() {
        let (base, scraper, _stop) = spawn_server().await;
        for path in ["/api/scrape", "/api/scrape?keyword=", "/api/scrape?keyword=%20%20"] {
            let (status, body) = get_json(format!("{base}{path}")).await;
            assert_eq!(status, 400, "{path}");
            assert_eq!(body["success"], false);
            assert_eq!(body["error"], "Keyword parameter is required");
            assert_eq!(body["message"], "Please provide a valid search keyword");
        }
        assert_eq!(scraper.stats().total_attempts(), 0);
    }

    #[tokio::test]
    async fn test_fetch_failure_is_server_error() {
        let (base, scraper, _stop) = spawn_server().await;
        let (status, body) = get_json(format!("{base}/api/scrape?keyword=mouse")).await;
        assert_eq!(status, 500);
        assert_eq!(body["error"], "Failed to scrape products");
        assert!(body["message"]
            .as_str()
            .unwrap()
            .starts_with("Failed to fetch data after 1 attempts"));
        assert_eq!(scraper.stats().failed_scrapes(), 1);
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let (base, _scraper, _stop) = spawn_server().await;
        let (status, body) = get_json(format!("{base}/api/nope")).await;
        assert_eq!(status, 404);
        assert_eq!(body["error"], "Route not found");
        assert_eq!(body["message"], "Cannot GET /api/nope");
    }
}
