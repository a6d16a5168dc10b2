//! Scrape handler.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::super::types::{AppState, ScrapeQuery};
use crate::error_handling::ScrapeError;
use crate::models::ErrorResponse;

/// Runs one scrape per request. Empty or missing keywords never reach the pipeline.
pub async fn scrape_handler(
    State(state): State<AppState>,
    Query(query): Query<ScrapeQuery>,
) -> Response {
    let keyword = query.keyword.unwrap_or_default();
    if keyword.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(
                "Keyword parameter is required",
                "Please provide a valid search keyword",
            )),
        )
            .into_response();
    }

    match state.scraper.scrape(&keyword).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => {
            let status = match &e {
                ScrapeError::InvalidKeyword => StatusCode::BAD_REQUEST,
                ScrapeError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
                ScrapeError::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
                ScrapeError::InvalidTarget(_) | ScrapeError::Fetch(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            };
            (
                status,
                Json(ErrorResponse::new("Failed to scrape products", e.to_string())),
            )
                .into_response()
        }
    }
}
