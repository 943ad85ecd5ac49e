//! Request payload and headers for the search endpoint
//!
//! The endpoint expects `filters` as a JSON-encoded string, and several fields
//! inside it are JSON-encoded strings again.

use crate::search::SearchConfig;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, InvalidHeaderValue};
use serde_json::{json, Value};

/// Results per page, used to compute paging offsets
pub const PAGE_SIZE: u32 = 15;

pub const SEARCH_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:131.0) Gecko/20100101 Firefox/131.0";

fn encoded(value: Value) -> String {
    value.to_string()
}

/// Build the POST body for one page (pages start at 1)
pub fn search_payload(config: &SearchConfig, search_id: &str, page: u32) -> Value {
    let shown = page.saturating_sub(1) * PAGE_SIZE;

    let previous_search_params = encoded(json!({
        "PreviousSearchId": search_id,
        "PreviousSearchFilter": [
            encoded(json!({"category_context": "go_out_home"})),
            "",
            encoded(json!({"context": "dineout_home"}))
        ]
    }));
    let postback_params = encoded(json!({
        "total_restaurants_shown": shown,
        "total_results_shown": shown,
        "page": page,
        "solr_offset": shown,
        "vg_set": true,
        "search_id": search_id
    }));

    let filters = encoded(json!({
        "searchMetadata": {
            "previousSearchParams": previous_search_params,
            "postbackParams": postback_params,
            "totalResults": config.total_results,
            "hasMore": true,
            "getInactive": false
        },
        "dineoutAdsMetaData": {},
        "appliedFilter": [
            {
                "filterType": "category_sheet",
                "filterValue": "go_out_home",
                "isHidden": true,
                "isApplied": true,
                "postKey": encoded(json!({"category_context": "go_out_home"}))
            },
            {
                "filterType": "context",
                "filterValue": "dineout_home",
                "isHidden": true,
                "isApplied": true,
                "postKey": encoded(json!({"context": "dineout_home"}))
            }
        ],
        "urlParamsForAds": {}
    }));

    json!({
        "context": "dineout",
        "filters": filters,
        "addressId": 0,
        "entityId": config.entity_id,
        "entityType": config.entity_type,
        "locationType": "",
        "isOrderLocation": 1,
        "cityId": config.city_id,
        "latitude": config.latitude.to_string(),
        "longitude": config.longitude.to_string(),
        "userDefinedLatitude": config.latitude,
        "userDefinedLongitude": config.longitude,
        "entityName": config.location_name,
        "orderLocationName": config.location_name,
        "cityName": config.city_name,
        "countryId": config.country_id,
        "countryName": config.country_name,
        "displayTitle": config.location_name,
        "o2Serviceable": true,
        "placeId": config.place_id,
        "cellId": config.cell_id,
        "deliverySubzoneId": config.delivery_subzone_id,
        "placeType": "GOOGLE_PLACE",
        "placeName": config.location_name,
        "isO2City": true,
        "fetchFromGoogle": false,
        "fetchedFromCookie": true,
        "isO2OnlyCity": false,
        "address_template": [],
        "otherRestaurantsUrl": ""
    })
}

/// Default headers for search requests
///
/// Accept-Encoding is left to reqwest so bodies arrive decoded.
pub fn search_headers(csrf_token: &str, origin: &str) -> Result<HeaderMap, InvalidHeaderValue> {
    let mut headers = HeaderMap::new();
    let fixed = [
        ("accept", "*/*"),
        ("accept-language", "en-US,en;q=0.5"),
        ("content-type", "application/json"),
        ("sec-fetch-dest", "empty"),
        ("sec-fetch-mode", "cors"),
        ("sec-fetch-site", "same-origin"),
        ("cache-control", "no-cache"),
        ("pragma", "no-cache"),
    ];
    for (name, value) in fixed {
        headers.insert(HeaderName::from_static(name), HeaderValue::from_static(value));
    }
    headers.insert(
        HeaderName::from_static("x-zomato-csrft"),
        HeaderValue::from_str(csrf_token)?,
    );
    headers.insert(HeaderName::from_static("origin"), HeaderValue::from_str(origin)?);
    Ok(headers)
}
