//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `product_scraper` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - Either a one-shot scrape printed as JSON, or the HTTP API (`--serve`)
//!
//! All core functionality is implemented in the library crate.

use std::process;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use product_scraper::initialization::init_logger_with;
use product_scraper::{server, Config, ErrorResponse, Scraper};

#[tokio::main]
async fn main() -> Result<()> {
    // .env next to the working directory first, then next to the executable
    if dotenvy::dotenv().is_err() {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let config = Config::parse();

    let log_level = config.log_level.clone();
    let log_format = config.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    let serve = config.serve;
    let keyword = config.keyword.clone();
    let (bind, port) = (config.bind.clone(), config.port);

    let scraper = Arc::new(Scraper::new(config).context("Failed to initialize scraper")?);

    if serve {
        return server::start_server(scraper, &bind, port).await;
    }

    let Some(keyword) = keyword else {
        eprintln!("product_scraper error: provide a search keyword or --serve");
        process::exit(2);
    };

    match scraper.scrape(&keyword).await {
        Ok(result) => {
            let json =
                serde_json::to_string_pretty(&result).context("Failed to serialize results")?;
            println!("{json}");
            Ok(())
        }
        Err(e) => {
            let error = if e.is_client_error() {
                ErrorResponse::new(e.to_string(), "Please provide a valid search keyword")
            } else {
                ErrorResponse::new("Failed to scrape products", e.to_string())
            };
            let json =
                serde_json::to_string_pretty(&error).context("Failed to serialize error")?;
            println!("{json}");
            eprintln!("product_scraper error: {:#}", e);
            process::exit(1);
        }
    }
}
