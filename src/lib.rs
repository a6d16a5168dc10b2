//! product_scraper library: resilient fetch-and-extract for search result pages
//!
//! This library fetches one search results page from a storefront that actively
//! resists scraping and turns its HTML into an ordered list of product records.
//! Fetches rotate browser identities, pace themselves like a human, retry with
//! exponential backoff and refuse to parse block or CAPTCHA pages. Extraction
//! walks ordered locator tables, so a missing field is reported next to the
//! record instead of failing the whole page.
//!
//! # Example
//!
//! ```no_run
//! use product_scraper::{Config, Scraper};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     max_retries: 5,
//!     ..Default::default()
//! };
//!
//! let scraper = Scraper::new(config)?;
//! let result = scraper.scrape("wireless mouse").await?;
//! for product in &result.products {
//!     println!("{}. {} {:?}", product.id, product.title, product.price);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

#![warn(missing_docs)]

mod assemble;
pub mod config;
mod detection;
mod error_handling;
mod extract;
mod fetch;
mod identity;
pub mod initialization;
mod models;
mod normalize;
mod pacing;
pub mod server;
mod utils;

// Re-export public API
pub use config::{Config, CurrencyStyle, LogFormat, LogLevel};
pub use detection::{classify, BlockReason, PageClass};
pub use error_handling::{
    AttemptFailure, AttemptKind, ConfigError, FetchError, InitializationError, ProcessingStats,
    ScrapeError, ScrapeOutcome,
};
pub use fetch::{FetchAttempt, RawPage, ResponseSnapshot};
pub use identity::{BrowserFamily, IdentityPool, RequestIdentity};
pub use models::{ErrorResponse, Field, FieldError, FieldResult, ProductRecord, ScrapeResult};
pub use pacing::{Sleeper, TokioSleeper};
pub use run::Scraper;

// Internal run module (contains the pipeline wiring)
mod run {
    use std::sync::Arc;

    use log::{info, warn};
    use scraper::Html;
    use tokio_util::sync::CancellationToken;
    use url::Url;

    use crate::assemble::assemble;
    use crate::config::Config;
    use crate::error_handling::{
        InitializationError, ProcessingStats, ScrapeError, ScrapeOutcome,
    };
    use crate::extract::extract_products;
    use crate::fetch::{build_search_url, RequestExecutor};
    use crate::identity::IdentityPool;
    use crate::initialization::init_client;
    use crate::models::ScrapeResult;
    use crate::normalize::{normalize, NormalizedProduct};
    use crate::pacing::{PacingController, PacingSettings, Sleeper, TokioSleeper};

    /// The scrape pipeline: validate, pace, fetch, classify, parse, extract,
    /// normalize, assemble.
    ///
    /// A `Scraper` holds only read-only configuration, an immutable identity
    /// pool snapshot and atomic counters, so one instance can serve any number
    /// of concurrent scrapes through a shared reference.
    pub struct Scraper {
        config: Config,
        origin: Url,
        executor: RequestExecutor,
        stats: Arc<ProcessingStats>,
        cancel: CancellationToken,
    }

    impl Scraper {
        /// Builds a scraper that sleeps on the tokio timer.
        ///
        /// # Errors
        ///
        /// Returns an error if the configuration is invalid or the HTTP client
        /// cannot be built.
        pub fn new(config: Config) -> Result<Self, InitializationError> {
            Self::with_sleeper(config, Arc::new(TokioSleeper))
        }

        /// Builds a scraper whose pacing delays go through `sleeper`.
        ///
        /// # Errors
        ///
        /// Returns an error if the configuration is invalid or the HTTP client
        /// cannot be built.
        pub fn with_sleeper(
            config: Config,
            sleeper: Arc<dyn Sleeper>,
        ) -> Result<Self, InitializationError> {
            config.validate()?;
            let origin = config.target_origin()?;

            let identities = IdentityPool::builtin(origin.as_str())
                .with_additional(&config.user_agents, origin.as_str());
            let stats = Arc::new(ProcessingStats::new());
            let pacing = PacingController::new(PacingSettings::from_config(&config), sleeper);
            let executor = RequestExecutor::new(
                init_client(&config)?,
                identities,
                pacing,
                config.request_timeout(),
                Arc::clone(&stats),
            );

            Ok(Scraper {
                config,
                origin,
                executor,
                stats,
                cancel: CancellationToken::new(),
            })
        }

        /// The validated configuration.
        pub fn config(&self) -> &Config {
            &self.config
        }

        /// Attempt and scrape counters shared by every scrape on this instance.
        pub fn stats(&self) -> Arc<ProcessingStats> {
            Arc::clone(&self.stats)
        }

        /// Cancels every in-flight and future scrape on this instance.
        pub fn shutdown(&self) {
            self.cancel.cancel();
        }

        /// Scrapes the search results for `keyword`.
        ///
        /// The query uses the trimmed keyword while the result carries it as
        /// given; an empty keyword is rejected before any network activity. Zero products is a successful, empty result.
        ///
        /// # Errors
        ///
        /// - `ScrapeError::InvalidKeyword` for an empty keyword
        /// - `ScrapeError::Fetch` once every attempt failed
        /// - `ScrapeError::Timeout` when the overall scrape timeout elapsed
        /// - `ScrapeError::Cancelled` after `shutdown`
        pub async fn scrape(&self, keyword: &str) -> Result<ScrapeResult, ScrapeError> {
            let result = self.scrape_with_limits(keyword).await;

            let outcome = match &result {
                Ok(result) if result.products.is_empty() => ScrapeOutcome::Empty,
                Ok(_) => ScrapeOutcome::Succeeded,
                Err(e) => {
                    warn!("Scrape for '{}' failed: {}", keyword.trim(), e);
                    ScrapeOutcome::from(e)
                }
            };
            self.stats.record_outcome(outcome);

            result
        }

        async fn scrape_with_limits(&self, keyword: &str) -> Result<ScrapeResult, ScrapeError> {
            let query = keyword.trim();
            if query.is_empty() {
                return Err(ScrapeError::InvalidKeyword);
            }
            let url = build_search_url(&self.origin, query)?;
            info!("Scraping '{}' from {}", query, url);

            let limit = self.config.scrape_timeout();
            tokio::select! {
                _ = self.cancel.cancelled() => Err(ScrapeError::Cancelled),
                result = tokio::time::timeout(limit, self.run_pipeline(keyword, &url)) => {
                    result.unwrap_or(Err(ScrapeError::Timeout(limit)))
                }
            }
        }

        async fn run_pipeline(&self, keyword: &str, url: &Url) -> Result<ScrapeResult, ScrapeError> {
            self.executor.pacing().initial_delay().await;
            let page = self
                .executor
                .fetch(url.as_str(), self.config.max_retries)
                .await?;

            // Html is not Send; keep it out of any await
            let raw = {
                let document = Html::parse_document(&page.body);
                extract_products(&document, &self.origin)
            };
            let products: Vec<NormalizedProduct> = raw
                .into_iter()
                .map(|product| normalize(product, self.config.currency))
                .collect();

            let result = assemble(keyword, products);
            info!(
                "Extracted {} products for '{}'",
                result.total_products, keyword
            );
            Ok(result)
        }
    }
}
