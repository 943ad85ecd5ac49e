//! Fetching pages and API payloads over HTTP

use crate::error::FetchError;
use reqwest::blocking::Client;
use reqwest::cookie::Jar;
use reqwest::header::HeaderMap;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};

/// Browser user agent sent with page requests
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Something that can retrieve a page body or a JSON API response
pub trait Fetcher {
    /// GET a URL and return the body as text
    fn get_text(&self, url: &str) -> Result<String, FetchError>;

    /// POST a JSON payload and parse the JSON response
    fn post_json(&self, url: &str, payload: &Value) -> Result<Value, FetchError>;
}

/// Blocking HTTP fetcher backed by reqwest
pub struct HttpFetcher {
    client: Client,
}

/// Options for building an `HttpFetcher`
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub timeout: Duration,
    pub user_agent: String,
    pub headers: HeaderMap,
    /// Cookies as (name, value) pairs, sent to `cookie_url`
    pub cookies: Vec<(String, String)>,
    pub cookie_url: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        HttpConfig {
            timeout: Duration::from_secs(30),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            headers: HeaderMap::new(),
            cookies: vec![],
            cookie_url: None,
        }
    }
}

impl HttpFetcher {
    pub fn new(config: HttpConfig) -> Result<Self, FetchError> {
        let mut builder = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent)
            .default_headers(config.headers);

        if let Some(cookie_url) = &config.cookie_url {
            let url: reqwest::Url = cookie_url
                .parse()
                .map_err(|_| FetchError::InvalidUrl(cookie_url.clone()))?;
            let jar = Jar::default();
            for (name, value) in &config.cookies {
                jar.add_cookie_str(&format!("{}={}", name, value), &url);
            }
            builder = builder.cookie_provider(Arc::new(jar));
        }

        let client = builder.build().map_err(FetchError::Client)?;
        Ok(HttpFetcher { client })
    }

    fn check_status(url: &str, status: reqwest::StatusCode) -> Result<(), FetchError> {
        if status.is_success() {
            Ok(())
        } else {
            Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            })
        }
    }
}

impl Fetcher for HttpFetcher {
    fn get_text(&self, url: &str) -> Result<String, FetchError> {
        debug!(url, "GET");
        let http = |source: reqwest::Error| FetchError::Http {
            url: url.to_string(),
            source,
        };

        let resp = self.client.get(url).send().map_err(http)?;
        Self::check_status(url, resp.status())?;
        resp.text().map_err(http)
    }

    fn post_json(&self, url: &str, payload: &Value) -> Result<Value, FetchError> {
        debug!(url, "POST");
        let http = |source: reqwest::Error| FetchError::Http {
            url: url.to_string(),
            source,
        };

        let resp = self.client.post(url).json(payload).send().map_err(http)?;
        let status = resp.status();
        let body = resp.text().map_err(http)?;
        trace!(status = status.as_u16(), body = %truncate(&body, 500), "response");
        Self::check_status(url, status)?;

        serde_json::from_str(&body).map_err(|source| FetchError::Json {
            url: url.to_string(),
            source,
        })
    }
}

fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("héllo", 2), "hé");
        assert_eq!(truncate("abc", 10), "abc");
    }

    #[test]
    fn test_http_fetcher_builds_with_cookies() {
        let config = HttpConfig {
            cookies: vec![("csrf".to_string(), "abc".to_string())],
            cookie_url: Some("https://www.zomato.com".to_string()),
            ..HttpConfig::default()
        };

        assert!(HttpFetcher::new(config).is_ok());
    }
}
