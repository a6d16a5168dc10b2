//! Logger initialization.

use std::io::Write;

use colored::*;
use log::LevelFilter;

use crate::config::LogFormat;
use crate::error_handling::InitializationError;

/// Dependencies that are chatty at debug level; capped regardless of `level`.
const NOISY_MODULES: &[(&str, LevelFilter)] = &[
    ("html5ever", LevelFilter::Error),
    ("selectors", LevelFilter::Warn),
    ("reqwest", LevelFilter::Info),
    ("hyper", LevelFilter::Info),
    ("hyper_util", LevelFilter::Info),
];

/// Applies the level filters in precedence order, lowest first.
///
/// Noisy dependency caps come first, then the module directives from
/// `env_filter` (the `RUST_LOG` syntax), then `level` as the global default.
/// A bare level in `env_filter` is therefore replaced by `level`, while a
/// module directive such as `product_scraper=trace` survives.
fn configure_filters(
    builder: &mut env_logger::Builder,
    env_filter: Option<&str>,
    level: LevelFilter,
) {
    for (module, cap) in NOISY_MODULES {
        builder.filter_module(module, (*cap).min(level));
    }
    if let Some(spec) = env_filter.filter(|spec| !spec.trim().is_empty()) {
        builder.parse_filters(spec);
    }
    builder.filter_level(level);
}

/// Initializes `env_logger` with the given level and output format.
///
/// `level` sets the global level. Module directives in `RUST_LOG` are kept,
/// so `RUST_LOG=product_scraper=trace` raises this crate's verbosity and
/// `RUST_LOG=reqwest=debug` lifts the cap on a noisy dependency.
///
/// # Errors
///
/// Returns `InitializationError::LoggerError` if a logger is already installed.
pub fn init_logger_with(level: LevelFilter, format: LogFormat) -> Result<(), InitializationError> {
    let mut builder = env_logger::Builder::new();
    if let Ok(style) = std::env::var("RUST_LOG_STYLE") {
        builder.parse_write_style(&style);
    }
    configure_filters(&mut builder, std::env::var("RUST_LOG").ok().as_deref(), level);

    match format {
        LogFormat::Json => {
            builder.format(|buf, record| {
                writeln!(
                    buf,
                    "{{\"ts\":{},\"level\":\"{}\",\"target\":\"{}\",\"msg\":{}}}",
                    chrono::Utc::now().timestamp_millis(),
                    record.level(),
                    record.target(),
                    serde_json::to_string(&record.args().to_string())
                        .unwrap_or_else(|_| "\"\"".into())
                )
            });
        }
        LogFormat::Plain => {
            builder.format(|buf, record| {
                let level = record.level();
                let colored_level = match level {
                    log::Level::Error => level.to_string().red(),
                    log::Level::Warn => level.to_string().yellow(),
                    log::Level::Info => level.to_string().green(),
                    log::Level::Debug => level.to_string().blue(),
                    log::Level::Trace => level.to_string().purple(),
                };
                writeln!(
                    buf,
                    "{} [{}] {}",
                    record.target().cyan(),
                    colored_level,
                    record.args()
                )
            });
        }
    }

    builder.try_init().map_err(InitializationError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::{Level, Log, Metadata};

    fn logger(env_filter: Option<&str>, level: LevelFilter) -> env_logger::Logger {
        let mut builder = env_logger::Builder::new();
        configure_filters(&mut builder, env_filter, level);
        builder.build()
    }

    fn enabled(logger: &env_logger::Logger, target: &str, level: Level) -> bool {
        logger.enabled(&Metadata::builder().target(target).level(level).build())
    }

    #[test]
    fn test_cli_level_without_env_filter() {
        let logger = logger(None, LevelFilter::Info);
        assert!(enabled(&logger, "product_scraper::fetch", Level::Info));
        assert!(!enabled(&logger, "product_scraper::fetch", Level::Debug));
        assert!(enabled(&logger, "reqwest::connect", Level::Info));
        assert!(!enabled(&logger, "html5ever::tree_builder", Level::Warn));
    }

    #[test]
    fn test_env_module_directive_survives_cli_level() {
        let logger = logger(Some("product_scraper=trace"), LevelFilter::Warn);
        assert!(enabled(&logger, "product_scraper::fetch", Level::Trace));
        assert!(!enabled(&logger, "tokio::runtime", Level::Info));
        assert!(enabled(&logger, "tokio::runtime", Level::Warn));
    }

    #[test]
    fn test_cli_level_replaces_bare_env_level() {
        let logger = logger(Some("debug"), LevelFilter::Warn);
        assert!(!enabled(&logger, "product_scraper::run", Level::Debug));
        assert!(!enabled(&logger, "tokio::runtime", Level::Info));
    }

    #[test]
    fn test_env_directive_lifts_noisy_cap() {
        assert!(!enabled(&logger(None, LevelFilter::Debug), "reqwest::connect", Level::Debug));
        let lifted = logger(Some("reqwest=debug"), LevelFilter::Debug);
        assert!(enabled(&lifted, "reqwest::connect", Level::Debug));
    }

    #[test]
    fn test_second_init_fails_without_panicking() {
        // Only one logger per process; whichever call comes second must error
        let first = init_logger_with(LevelFilter::Info, LogFormat::Plain);
        let second = init_logger_with(LevelFilter::Debug, LogFormat::Json);
        assert!(first.is_err() || second.is_err());
        assert!(matches!(second, Err(InitializationError::LoggerError(_))));
    }

    #[test]
    fn test_noisy_modules_never_exceed_requested_level() {
        for (_, cap) in NOISY_MODULES {
            assert!((*cap).min(LevelFilter::Warn) <= LevelFilter::Warn);
            assert!(*cap <= LevelFilter::Info);
        }
    }
}
