//! Turning search responses into restaurant records

use crate::error::ExtractError;
use serde::Serialize;
use serde_json::Value;

pub const SITE_ROOT: &str = "https://www.zomato.com";

const NOT_AVAILABLE: &str = "N/A";

/// One restaurant found by the search endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Restaurant {
    pub name: String,
    pub url: String,
    /// Aggregate rating as sent by the API, or "N/A"
    pub rating: Value,
    pub cuisine: Vec<String>,
    pub cost_for_two: String,
    pub address: String,
}

/// One page of search results
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPage {
    /// Number of result entries on the page, restaurants or not
    pub entries: usize,
    pub restaurants: Vec<Restaurant>,
}

/// Parse a search response, `None` when the page carries no result section
pub fn parse_search_page(data: &Value) -> Result<Option<SearchPage>, ExtractError> {
    let Some(results) = data
        .get("sections")
        .and_then(|s| s.get("SECTION_SEARCH_RESULT"))
    else {
        return Ok(None);
    };
    let entries = results.as_array().map(Vec::as_slice).unwrap_or(&[]);

    let mut restaurants = Vec::new();
    for entry in entries {
        if entry.get("type").and_then(Value::as_str) != Some("restaurant") {
            continue;
        }
        let info = entry
            .get("info")
            .ok_or_else(|| ExtractError::MissingPath("info".to_string()))?;
        restaurants.push(parse_restaurant(info)?);
    }

    Ok(Some(SearchPage {
        entries: entries.len(),
        restaurants,
    }))
}

fn parse_restaurant(info: &Value) -> Result<Restaurant, ExtractError> {
    let name = info
        .get("name")
        .map(text)
        .ok_or_else(|| ExtractError::MissingPath("info.name".to_string()))?;
    let locality_url = info
        .pointer("/locality/localityUrl")
        .map(text)
        .ok_or_else(|| ExtractError::MissingPath("info.locality.localityUrl".to_string()))?;

    let rating = match info.get("rating") {
        Some(rating) => rating
            .get("aggregate_rating")
            .cloned()
            .ok_or_else(|| ExtractError::MissingPath("info.rating.aggregate_rating".to_string()))?,
        None => Value::String(NOT_AVAILABLE.to_string()),
    };

    let cuisine: Vec<String> = info
        .get("cuisine")
        .and_then(Value::as_array)
        .map(|list| list.iter().filter_map(|c| c.get("name")).map(text).collect())
        .unwrap_or_default();

    let cost_for_two = info
        .pointer("/cft/text")
        .map(text)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());
    let address = info
        .pointer("/locality/address")
        .map(text)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    Ok(Restaurant {
        name,
        url: format!("{}{}", SITE_ROOT, locality_url),
        rating,
        cuisine,
        cost_for_two,
        address,
    })
}

fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
