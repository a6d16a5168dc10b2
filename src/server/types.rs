//! Server state and response bodies.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Scraper;

/// Shared state for the API handlers
#[derive(Clone)]
pub struct AppState {
    /// Pipeline shared by every request
    pub scraper: Arc<Scraper>,
    /// Used for the uptime reported by `/api/health`
    pub start_time: Arc<Instant>,
}

impl AppState {
    /// Wraps `scraper` and starts the uptime clock.
    pub fn new(scraper: Arc<Scraper>) -> Self {
        AppState {
            scraper,
            start_time: Arc::new(Instant::now()),
        }
    }
}

/// Query string of `/api/scrape`
#[derive(Debug, Deserialize)]
pub(crate) struct ScrapeQuery {
    pub keyword: Option<String>,
}

/// JSON response for `/`
#[derive(Serialize)]
pub(crate) struct IndexResponse {
    pub message: &'static str,
    pub version: &'static str,
    pub endpoints: Endpoints,
}

#[derive(Serialize)]
pub(crate) struct Endpoints {
    pub scrape: &'static str,
    pub health: &'static str,
}

/// JSON response for `/api/health`
#[derive(Serialize)]
pub(crate) struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    /// Seconds since the server started
    pub uptime: f64,
    pub stats: StatsCounts,
}

#[derive(Serialize)]
pub(crate) struct StatsCounts {
    pub attempts: usize,
    pub successes: usize,
    pub timeouts: usize,
    pub network_errors: usize,
    pub status_errors: usize,
    pub blocked: usize,
    pub scrapes: usize,
    pub failed_scrapes: usize,
}
