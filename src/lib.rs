//! # Skillet - restaurant data extraction toolkit
//!
//! Pulls restaurant menus and search results out of a restaurant-discovery
//! site and turns them into flat, tabular data.
//!
//! ## Modules
//!
//! - **flatten**: nested JSON record -> single-level path-keyed record
//! - **reconcile**: batch of flat records -> one clean rectangular table
//! - **menu**: preloaded page state -> flattened menu items, plus a summary
//! - **search**: paginated restaurant search
//! - **writer**: CSV and JSON sinks
//!
//! ## Quick Start
//!
//! ```rust
//! use skillet::{flatten, reconcile, ReconcileConfig};
//! use serde_json::json;
//!
//! # fn main() -> anyhow::Result<()> {
//! let items = vec![
//!     json!({"name": "Soup", "price": "150", "tag_slugs": ["veg", "hot"]}),
//!     json!({"name": "Rice", "price": "80"}),
//! ];
//!
//! let batch: Vec<_> = items
//!     .iter()
//!     .map(|item| {
//!         let mut record = flatten(item);
//!         record.insert("category".into(), json!("Mains"));
//!         record
//!     })
//!     .collect();
//!
//! let table = reconcile(&batch, &ReconcileConfig::default())?;
//!
//! // columns: category, item_name, price, tag_slugs
//! // rows sorted by category, then price: Rice (80), Soup (150)
//! assert_eq!(table.get(0, "item_name").unwrap(), "Rice");
//! # Ok(())
//! # }
//! ```

use anyhow::Result;

pub mod error;
pub mod fetch;
pub mod flatten;
pub mod input;
pub mod menu;
pub mod reconcile;
pub mod search;
pub mod table;
pub mod types;
pub mod writer;

// Re-export commonly used types for convenience
pub use error::{ExtractError, FetchError, ReconcileError};
pub use fetch::{Fetcher, HttpConfig, HttpFetcher};
pub use flatten::{flatten, Flattener};
pub use menu::MenuSummary;
pub use reconcile::reconcile;
pub use search::{Restaurant, SearchConfig, SearchScraper};
pub use table::Table;
pub use types::{Cell, FlatRecord, FlattenConfig, RecordBatch, ReconcileConfig};
pub use writer::{write_csv, write_json_pretty, TableWriter};

/// Main entry point: fetch a restaurant page and reconcile its menu into a table
pub fn menu_table<F: Fetcher>(fetcher: &F, url: &str, config: &ReconcileConfig) -> Result<Table> {
    let flattener = Flattener::new(FlattenConfig {
        separator: config.separator.clone(),
    });
    let batch = menu::fetch_menu(fetcher, url, &flattener)?;
    Ok(reconcile(&batch, config)?)
}
