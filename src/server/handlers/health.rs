//! Index, health and fallback handlers.

use axum::{
    extract::State,
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;

use super::super::types::{AppState, Endpoints, HealthResponse, IndexResponse, StatsCounts};
use crate::error_handling::AttemptKind;
use crate::models::ErrorResponse;

/// Describes the service and its endpoints.
pub async fn index_handler() -> Json<IndexResponse> {
    Json(IndexResponse {
        message: "Product scraper API",
        version: env!("CARGO_PKG_VERSION"),
        endpoints: Endpoints {
            scrape: "/api/scrape?keyword=<search term>",
            health: "/api/health",
        },
    })
}

/// Liveness plus the attempt and scrape counters
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let stats = state.scraper.stats();
    Json(HealthResponse {
        status: "OK",
        timestamp: Utc::now(),
        uptime: state.start_time.elapsed().as_secs_f64(),
        stats: StatsCounts {
            attempts: stats.total_attempts(),
            successes: stats.get_attempt_count(AttemptKind::Success),
            timeouts: stats.get_attempt_count(AttemptKind::Timeout),
            network_errors: stats.get_attempt_count(AttemptKind::NetworkError),
            status_errors: stats.get_attempt_count(AttemptKind::StatusError),
            blocked: stats.get_attempt_count(AttemptKind::Blocked),
            scrapes: stats.total_scrapes(),
            failed_scrapes: stats.failed_scrapes(),
        },
    })
}

/// JSON 404 for every unknown route.
pub async fn not_found_handler(method: Method, uri: Uri) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new(
            "Route not found",
            format!("Cannot {} {}", method, uri.path()),
        )),
    )
        .into_response()
}
