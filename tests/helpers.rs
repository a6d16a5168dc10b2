// Shared test helpers: sleepers, configuration and HTML fixtures.
//
// This module provides common utilities used across multiple test files to reduce duplication.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::http::{header::USER_AGENT, HeaderMap, StatusCode};
use axum::routing::get;
use axum::Router;
use futures::future::BoxFuture;
use httptest::Server;
use tokio::net::TcpListener;

use product_scraper::{Config, Scraper, Sleeper};

/// Records every requested delay and returns immediately, so backoff never
/// costs wall-clock time.
#[derive(Default)]
pub struct RecordingSleeper {
    delays: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    #[allow(dead_code)] // Used by other test files
    pub fn delays(&self) -> Vec<Duration> {
        self.delays.lock().unwrap().clone()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()> {
        self.delays.lock().unwrap().push(duration);
        Box::pin(async {})
    }
}

/// A sleeper whose delays never finish; only cancellation ends them.
#[allow(dead_code)] // Used by other test files
pub struct PendingSleeper;

impl Sleeper for PendingSleeper {
    fn sleep(&self, _duration: Duration) -> BoxFuture<'static, ()> {
        Box::pin(futures::future::pending())
    }
}

/// Configuration pointing at the local test server with default pacing windows.
pub fn test_config(server: &Server) -> Config {
    Config {
        base_url: server.url_str("/"),
        max_retries: 3,
        timeout_seconds: 5,
        scrape_timeout_seconds: 30,
        ..Default::default()
    }
}

/// Starts a search endpoint that always answers 503 and records the
/// User-Agent of every request it receives, in arrival order.
///
/// Returns the base URL and the recorded User-Agents.
#[allow(dead_code)] // Used by other test files
pub async fn start_user_agent_recorder() -> (String, Arc<Mutex<Vec<String>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let app = Router::new().route(
        "/s",
        get(move |headers: HeaderMap| {
            let sink = Arc::clone(&sink);
            async move {
                let user_agent = headers
                    .get(USER_AGENT)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                sink.lock().unwrap().push(user_agent);
                StatusCode::SERVICE_UNAVAILABLE
            }
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to get address");
    tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("Recorder server failed");
    });

    (format!("http://{}/", addr), seen)
}

/// Builds a scraper against `server` that records delays instead of sleeping.
#[allow(dead_code)] // Used by other test files
pub fn recording_scraper(server: &Server) -> (Scraper, Arc<RecordingSleeper>) {
    let sleeper = Arc::new(RecordingSleeper::default());
    let scraper = Scraper::with_sleeper(test_config(server), sleeper.clone())
        .expect("Failed to build scraper");
    (scraper, sleeper)
}

/// Wraps product cards in a search results page skeleton.
#[allow(dead_code)] // Used by other test files
pub fn results_page(cards: &[String]) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><title>Amazon.com : search</title></head>
<body>
  <div class="s-main-slot s-result-list">
    {}
  </div>
</body>
</html>"#,
        cards.join("\n")
    )
}

/// One product card in current search result markup.
#[allow(dead_code)] // Used by other test files
pub fn card(title: &str) -> String {
    format!(
        r#"<div data-component-type="s-search-result" data-asin="B0TEST">
      <h2><span>{title}</span></h2>
    </div>"#
    )
}

/// A fully populated product card.
#[allow(dead_code)] // Used by other test files
pub fn full_card(title: &str, asin: &str, price: &str, rating: &str, reviews: &str) -> String {
    format!(
        r#"<div data-component-type="s-search-result" data-asin="{asin}">
      <div class="s-product-image-container">
        <img class="s-image" src="//m.media-amazon.com/images/I/{asin}.jpg" alt="">
      </div>
      <h2 class="a-size-mini"><a class="a-link-normal" href="/Product-{asin}/dp/{asin}/ref=sr_1_1"><span>{title}</span></a></h2>
      <div class="a-row">
        <span class="a-icon-alt">{rating}</span>
        <span class="a-size-base s-underline-text">{reviews}</span>
      </div>
      <span class="a-price"><span class="a-offscreen">{price}</span><span aria-hidden="true">{price}</span></span>
      <span class="a-color-success">Em estoque</span>
    </div>"#
    )
}
