//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::time::Duration;

use clap::{Parser, ValueEnum};
use url::Url;

use crate::config::constants::*;
use crate::error_handling::ConfigError;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Currency display style for extracted prices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum CurrencyStyle {
    /// Brazilian real, pt-BR grouping: `R$ 1.234,56`
    Brl,
    /// US dollar, en-US grouping: `$1,234.56`
    Usd,
}

/// Library configuration.
///
/// Parsed from the command line by the binary, or constructed programmatically
/// by library callers.
///
/// # Examples
///
/// ```no_run
/// use product_scraper::Config;
///
/// let config = Config {
///     max_retries: 5,
///     user_agents: vec!["Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0".into()],
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Parser)]
#[command(
    name = "product_scraper",
    about = "Scrapes a search results page into structured product records."
)]
pub struct Config {
    /// Search keyword for a one-shot scrape (results are printed as JSON)
    #[arg(value_parser)]
    pub keyword: Option<String>,

    /// Serve the HTTP API instead of running a one-shot scrape
    #[arg(long)]
    pub serve: bool,

    /// Port for the HTTP API
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Bind address for the HTTP API
    #[arg(long, default_value = DEFAULT_BIND)]
    pub bind: String,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Storefront origin to search
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Maximum fetch attempts per scrape (including the first)
    #[arg(long, default_value_t = RETRY_MAX_ATTEMPTS)]
    pub max_retries: u32,

    /// Per-attempt request timeout in seconds
    #[arg(long = "timeout", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_seconds: u64,

    /// Overall timeout for one scrape in seconds
    #[arg(long = "scrape-timeout", default_value_t = DEFAULT_SCRAPE_TIMEOUT_SECS)]
    pub scrape_timeout_seconds: u64,

    /// Minimum delay before the first attempt, in milliseconds
    #[arg(long, default_value_t = INITIAL_DELAY_MIN_MS)]
    pub initial_delay_min_ms: u64,

    /// Maximum delay before the first attempt, in milliseconds
    #[arg(long, default_value_t = INITIAL_DELAY_MAX_MS)]
    pub initial_delay_max_ms: u64,

    /// Backoff base in milliseconds (attempt n waits base * 2^n plus jitter)
    #[arg(long, default_value_t = RETRY_BASE_DELAY_MS)]
    pub retry_base_delay_ms: u64,

    /// Jitter window added to every backoff, in milliseconds
    #[arg(long, default_value_t = RETRY_JITTER_MS)]
    pub retry_jitter_ms: u64,

    /// Cap on the backoff lower bound, in seconds
    #[arg(long, default_value_t = RETRY_MAX_DELAY_SECS)]
    pub retry_max_delay_secs: u64,

    /// Extra User-Agent strings appended to the built-in identity pool (repeatable)
    #[arg(long = "user-agent")]
    pub user_agents: Vec<String>,

    /// Currency style used to format prices: brl|usd
    #[arg(long, value_enum, default_value_t = CurrencyStyle::Brl)]
    pub currency: CurrencyStyle,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            keyword: None,
            serve: false,
            port: DEFAULT_PORT,
            bind: DEFAULT_BIND.to_string(),
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            base_url: DEFAULT_BASE_URL.to_string(),
            max_retries: RETRY_MAX_ATTEMPTS,
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            scrape_timeout_seconds: DEFAULT_SCRAPE_TIMEOUT_SECS,
            initial_delay_min_ms: INITIAL_DELAY_MIN_MS,
            initial_delay_max_ms: INITIAL_DELAY_MAX_MS,
            retry_base_delay_ms: RETRY_BASE_DELAY_MS,
            retry_jitter_ms: RETRY_JITTER_MS,
            retry_max_delay_secs: RETRY_MAX_DELAY_SECS,
            user_agents: Vec::new(),
            currency: CurrencyStyle::Brl,
        }
    }
}

impl Config {
    /// Checks the values that clap cannot check on its own.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` describing the first invalid setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_retries == 0 {
            return Err(ConfigError::ZeroRetries);
        }
        if self.max_retries > MAX_RETRY_ATTEMPTS {
            return Err(ConfigError::TooManyRetries {
                got: self.max_retries,
                max: MAX_RETRY_ATTEMPTS,
            });
        }
        if self.timeout_seconds == 0 {
            return Err(ConfigError::ZeroTimeout("timeout"));
        }
        if self.scrape_timeout_seconds == 0 {
            return Err(ConfigError::ZeroTimeout("scrape-timeout"));
        }
        if self.initial_delay_min_ms > self.initial_delay_max_ms {
            return Err(ConfigError::InvertedDelayWindow {
                min: self.initial_delay_min_ms,
                max: self.initial_delay_max_ms,
            });
        }
        self.target_origin()?;
        Ok(())
    }

    /// Parses `base_url` into the origin used for searching and link validation.
    pub fn target_origin(&self) -> Result<Url, ConfigError> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| ConfigError::InvalidBaseUrl(self.base_url.clone(), e.to_string()))?;
        if url.host_str().is_none() {
            return Err(ConfigError::InvalidBaseUrl(
                self.base_url.clone(),
                "missing host".to_string(),
            ));
        }
        Ok(url)
    }

    /// Per-attempt request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Overall timeout for one scrape.
    pub fn scrape_timeout(&self) -> Duration {
        Duration::from_secs(self.scrape_timeout_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(
            log::LevelFilter::from(LogLevel::Error),
            log::LevelFilter::Error
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Warn),
            log::LevelFilter::Warn
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Info),
            log::LevelFilter::Info
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Debug),
            log::LevelFilter::Debug
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Trace),
            log::LevelFilter::Trace
        );
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.timeout_seconds, 10);
        assert_eq!(config.base_url, "https://www.amazon.com");
        assert_eq!(config.currency, CurrencyStyle::Brl);
        assert!(config.user_agents.is_empty());
        assert!(!config.serve);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_parse_defaults_match_default_impl() {
        let parsed = Config::parse_from(["product_scraper", "wireless mouse"]);
        let default = Config::default();
        assert_eq!(parsed.keyword.as_deref(), Some("wireless mouse"));
        assert_eq!(parsed.max_retries, default.max_retries);
        assert_eq!(parsed.timeout_seconds, default.timeout_seconds);
        assert_eq!(parsed.retry_base_delay_ms, default.retry_base_delay_ms);
        assert_eq!(parsed.base_url, default.base_url);
    }

    #[test]
    fn test_config_parse_repeated_user_agents() {
        let parsed = Config::parse_from([
            "product_scraper",
            "--serve",
            "--user-agent",
            "UA-One",
            "--user-agent",
            "UA-Two",
            "--currency",
            "usd",
        ]);
        assert!(parsed.serve);
        assert_eq!(parsed.user_agents, vec!["UA-One", "UA-Two"]);
        assert_eq!(parsed.currency, CurrencyStyle::Usd);
    }

    #[test]
    fn test_validate_rejects_zero_retries() {
        let config = Config {
            max_retries: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroRetries)));
    }

    #[test]
    fn test_validate_rejects_retries_above_ceiling() {
        let at_ceiling = Config {
            max_retries: MAX_RETRY_ATTEMPTS,
            ..Default::default()
        };
        assert!(at_ceiling.validate().is_ok());

        let config = Config {
            max_retries: u32::MAX,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TooManyRetries { got: u32::MAX, max: MAX_RETRY_ATTEMPTS })
        ));
    }

    #[test]
    fn test_validate_rejects_inverted_delay_window() {
        let config = Config {
            initial_delay_min_ms: 500,
            initial_delay_max_ms: 100,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvertedDelayWindow { min: 500, max: 100 })
        ));
    }

    #[test]
    fn test_validate_rejects_bad_base_url() {
        let config = Config {
            base_url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidBaseUrl(..))
        ));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let config = Config {
            timeout_seconds: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ZeroTimeout("timeout"))
        ));
    }
}
