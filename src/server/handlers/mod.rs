//! API HTTP handlers.

mod health;
mod scrape;

pub use health::{health_handler, index_handler, not_found_handler};
pub use scrape::scrape_handler;
