// Land Plots - Core Library
// Exposes the catalog and filter pipeline for use in CLI, TUI, API server, and tests

pub mod catalog;
pub mod currency;
pub mod query;
pub mod pipeline;

// Re-export commonly used types
pub use catalog::{Catalog, Plot, ProjectType};
pub use currency::{convert, Currency, USD_TO_EUR_RATE};
pub use query::{FilterSpec, RawParams};
pub use pipeline::{evaluate, fold_location, price_bounds, suggest_locations, ResultItem};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
