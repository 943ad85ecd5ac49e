//! Restaurant menu extraction
//!
//! A restaurant page embeds its whole client state as
//! `window.__PRELOADED_STATE__ = JSON.parse("...")`. This module pulls that
//! state out of the HTML, walks it down to the menu items and flattens each
//! item into a record ready for reconciliation.

pub mod extract;
pub mod state;
pub mod summary;

pub use extract::{menu_records, CATEGORY_KEY};
pub use state::{find_state_script, parse_state_script, preloaded_state};
pub use summary::{MenuSummary, PriceStats};

use crate::fetch::Fetcher;
use crate::flatten::Flattener;
use crate::types::RecordBatch;
use anyhow::{Context, Result};
use tracing::info;

/// Fetch a restaurant page and flatten its menu items
pub fn fetch_menu<F: Fetcher>(fetcher: &F, url: &str, flattener: &Flattener) -> Result<RecordBatch> {
    info!(url, "extracting menu data");
    let html = fetcher
        .get_text(url)
        .with_context(|| format!("Failed to fetch {}", url))?;
    menu_from_html(&html, flattener)
}

/// Flatten the menu items of an already downloaded page
pub fn menu_from_html(html: &str, flattener: &Flattener) -> Result<RecordBatch> {
    let state = preloaded_state(html).context("Failed to read preloaded state")?;
    let records = menu_records(&state, flattener).context("Failed to read menu list")?;
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use serde_json::{json, Value};

    struct PageFetcher(String);

    impl Fetcher for PageFetcher {
        fn get_text(&self, _url: &str) -> Result<String, FetchError> {
            Ok(self.0.clone())
        }

        fn post_json(&self, url: &str, _payload: &Value) -> Result<Value, FetchError> {
            Err(FetchError::Status {
                url: url.to_string(),
                status: 405,
            })
        }
    }

    fn page(state: &Value) -> String {
        let literal = serde_json::to_string(&serde_json::to_string(state).unwrap()).unwrap();
        format!(
            "<html><body><script>window.__PRELOADED_STATE__ = JSON.parse({});</script></body></html>",
            literal
        )
    }

    #[test]
    fn test_fetch_menu_end_to_end() {
        let state = json!({"pages": {"current": {"restaurant": {"42": {"order": {"menuList": {"menus": [
            {"menu": {"name": "Mains", "categories": [
                {"category": {"items": [{"item": {"name": "Rice", "price": "80"}}]}}
            ]}}
        ]}}}}}}});
        let fetcher = PageFetcher(page(&state));

        let records = fetch_menu(&fetcher, "https://example.test/r/42", &Flattener::default()).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("name").unwrap(), "Rice");
        assert_eq!(records[0].get("category").unwrap(), "Mains");
    }

    #[test]
    fn test_page_without_state_is_an_error() {
        let fetcher = PageFetcher("<html></html>".to_string());

        let err = fetch_menu(&fetcher, "https://example.test", &Flattener::default()).unwrap_err();

        assert!(format!("{:#}", err).contains("preloaded state not found"));
    }
}
