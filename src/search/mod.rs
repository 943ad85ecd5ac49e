//! Paginated restaurant search
//!
//! Posts one search request per page and collects the restaurants found.
//! The loop stops at the first page without a result section, or at the
//! first error, keeping everything collected so far.

pub mod cookies;
pub mod payload;
pub mod results;

pub use cookies::{cookie_value, parse_cookies};
pub use payload::{search_headers, search_payload, PAGE_SIZE};
pub use results::{parse_search_page, Restaurant, SearchPage, SITE_ROOT};

use crate::fetch::{Fetcher, HttpConfig, HttpFetcher};
use anyhow::{Context, Result};
use std::time::Duration;
use tracing::{debug, error, info};

/// Location, authentication and paging settings for a search run
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub endpoint: String,
    pub city_id: u32,
    pub city_name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub csrf_token: String,
    pub entity_id: u64,
    pub entity_type: String,
    /// Human readable location, sent as entity, place and display name
    pub location_name: String,
    pub country_id: u32,
    pub country_name: String,
    pub place_id: String,
    pub cell_id: String,
    pub delivery_subzone_id: u64,
    pub total_results: u64,
    pub cookies: Vec<(String, String)>,
    pub max_pages: u32,
    /// Fixed pause between pages
    pub page_delay: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            endpoint: format!("{}/webroutes/search/home", SITE_ROOT),
            city_id: 31,
            city_name: String::from("Mangalore"),
            latitude: 12.877367,
            longitude: 74.83755,
            csrf_token: String::new(),
            entity_id: 83931,
            entity_type: String::from("subzone"),
            location_name: String::from("Kodailbail, Mangaluru"),
            country_id: 1,
            country_name: String::from("India"),
            place_id: String::from("ChIJpRGFv1paozsRx99KGviuZec"),
            cell_id: String::from("4297377815256367104"),
            delivery_subzone_id: 18013,
            total_results: 1115,
            cookies: vec![],
            max_pages: 5,
            page_delay: Duration::from_secs(1),
        }
    }
}

impl SearchConfig {
    /// HTTP client settings carrying this run's headers and cookies
    pub fn http_config(&self) -> Result<HttpConfig> {
        let headers = search_headers(&self.csrf_token, SITE_ROOT)
            .context("CSRF token is not a valid header value")?;
        Ok(HttpConfig {
            user_agent: payload::SEARCH_USER_AGENT.to_string(),
            headers,
            cookies: self.cookies.clone(),
            cookie_url: Some(SITE_ROOT.to_string()),
            ..HttpConfig::default()
        })
    }
}

/// Runs a paginated search against a fetcher
pub struct SearchScraper<F: Fetcher> {
    fetcher: F,
    config: SearchConfig,
    search_id: String,
}

impl SearchScraper<HttpFetcher> {
    /// Scraper over a real HTTP client configured from `config`
    pub fn over_http(config: SearchConfig) -> Result<Self> {
        let fetcher = HttpFetcher::new(config.http_config()?)?;
        Ok(Self::new(fetcher, config))
    }
}

impl<F: Fetcher> SearchScraper<F> {
    /// Create a scraper with a fresh random search id
    pub fn new(fetcher: F, config: SearchConfig) -> Self {
        Self::with_search_id(fetcher, config, uuid::Uuid::new_v4().to_string())
    }

    pub fn with_search_id(fetcher: F, config: SearchConfig, search_id: String) -> Self {
        SearchScraper {
            fetcher,
            config,
            search_id,
        }
    }

    pub fn search_id(&self) -> &str {
        &self.search_id
    }

    /// Fetch pages until results run out, an error occurs, or `max_pages` is reached
    pub fn scrape(&self) -> Vec<Restaurant> {
        let mut all = Vec::new();

        for page in 1..=self.config.max_pages {
            match self.scrape_page(page) {
                Ok(Some(found)) => {
                    info!(page, found = found.entries, "scraped page");
                    all.extend(found.restaurants);
                }
                Ok(None) => {
                    info!(page, "no more results");
                    break;
                }
                Err(e) => {
                    error!(page, "error on page: {:#}", e);
                    break;
                }
            }

            if page < self.config.max_pages && !self.config.page_delay.is_zero() {
                std::thread::sleep(self.config.page_delay);
            }
        }

        all
    }

    fn scrape_page(&self, page: u32) -> Result<Option<SearchPage>> {
        let payload = search_payload(&self.config, &self.search_id, page);
        debug!(page, payload = %payload, "sending search request");

        let data = self.fetcher.post_json(&self.config.endpoint, &payload)?;
        let parsed = parse_search_page(&data)?;
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use serde_json::{json, Value};
    use std::cell::RefCell;

    /// Serves canned responses in order and records every request
    struct ScriptedFetcher {
        responses: RefCell<Vec<Result<Value, FetchError>>>,
        requests: RefCell<Vec<Value>>,
    }

    impl ScriptedFetcher {
        fn new(mut responses: Vec<Result<Value, FetchError>>) -> Self {
            responses.reverse();
            ScriptedFetcher {
                responses: RefCell::new(responses),
                requests: RefCell::new(vec![]),
            }
        }
    }

    impl Fetcher for ScriptedFetcher {
        fn get_text(&self, url: &str) -> Result<String, FetchError> {
            Err(FetchError::Status {
                url: url.to_string(),
                status: 405,
            })
        }

        fn post_json(&self, _url: &str, payload: &Value) -> Result<Value, FetchError> {
            self.requests.borrow_mut().push(payload.clone());
            self.responses
                .borrow_mut()
                .pop()
                .unwrap_or_else(|| Ok(json!({})))
        }
    }

    fn page_of(names: &[&str]) -> Value {
        let entries: Vec<Value> = names
            .iter()
            .map(|n| {
                json!({"type": "restaurant", "info": {
                    "name": n,
                    "locality": {"localityUrl": format!("/city/{}", n)}
                }})
            })
            .collect();
        json!({"sections": {"SECTION_SEARCH_RESULT": entries}})
    }

    fn config(max_pages: u32) -> SearchConfig {
        SearchConfig {
            max_pages,
            page_delay: Duration::ZERO,
            ..SearchConfig::default()
        }
    }

    #[test]
    fn test_stops_when_results_run_out() {
        let fetcher = ScriptedFetcher::new(vec![
            Ok(page_of(&["a", "b"])),
            Ok(page_of(&["c"])),
            Ok(json!({"sections": {}})),
            Ok(page_of(&["never"])),
        ]);
        let scraper = SearchScraper::with_search_id(fetcher, config(5), "sid".to_string());

        let restaurants = scraper.scrape();

        let names: Vec<&str> = restaurants.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(scraper.fetcher.requests.borrow().len(), 3);
    }

    #[test]
    fn test_error_keeps_collected_pages() {
        let fetcher = ScriptedFetcher::new(vec![
            Ok(page_of(&["a"])),
            Err(FetchError::Status {
                url: "x".to_string(),
                status: 403,
            }),
            Ok(page_of(&["b"])),
        ]);
        let scraper = SearchScraper::with_search_id(fetcher, config(5), "sid".to_string());

        let restaurants = scraper.scrape();

        assert_eq!(restaurants.len(), 1);
        assert_eq!(scraper.fetcher.requests.borrow().len(), 2);
    }

    #[test]
    fn test_respects_max_pages_and_paging() {
        let fetcher = ScriptedFetcher::new(vec![
            Ok(page_of(&["a"])),
            Ok(page_of(&["b"])),
            Ok(page_of(&["c"])),
        ]);
        let scraper = SearchScraper::with_search_id(fetcher, config(2), "sid".to_string());

        let restaurants = scraper.scrape();

        assert_eq!(restaurants.len(), 2);
        let requests = scraper.fetcher.requests.borrow();
        let pages: Vec<u64> = requests
            .iter()
            .map(|p| {
                let filters: Value = serde_json::from_str(p["filters"].as_str().unwrap()).unwrap();
                let postback: Value = serde_json::from_str(
                    filters["searchMetadata"]["postbackParams"].as_str().unwrap(),
                )
                .unwrap();
                postback["page"].as_u64().unwrap()
            })
            .collect();
        assert_eq!(pages, vec![1, 2]);
    }

    #[test]
    fn test_fresh_search_ids() {
        let a = SearchScraper::new(ScriptedFetcher::new(vec![]), config(1));
        let b = SearchScraper::new(ScriptedFetcher::new(vec![]), config(1));

        assert_ne!(a.search_id(), b.search_id());
        assert_eq!(a.search_id().len(), 36);
    }
}
