//! Walking the preloaded state down to menu items

use crate::error::ExtractError;
use crate::flatten::Flattener;
use crate::types::RecordBatch;
use serde_json::Value;
use tracing::{debug, warn};

/// Key under which each flat item records its menu section name
pub const CATEGORY_KEY: &str = "category";

/// Flatten every menu item in a preloaded state tree
///
/// Items are read from `pages.current.restaurant.<first id>.order.menuList.menus`.
/// Each item's `category` is the name of the menu section holding it.
/// Malformed sections and items are skipped; a missing path above the menu
/// list is an error.
pub fn menu_records(state: &Value, flattener: &Flattener) -> Result<RecordBatch, ExtractError> {
    let restaurants = state
        .pointer("/pages/current/restaurant")
        .and_then(Value::as_object)
        .ok_or_else(|| ExtractError::MissingPath("pages.current.restaurant".to_string()))?;

    let (restaurant_id, restaurant) = restaurants
        .iter()
        .next()
        .ok_or_else(|| ExtractError::MissingPath("pages.current.restaurant.<id>".to_string()))?;
    debug!(restaurant_id = %restaurant_id, "found restaurant");

    let menus = restaurant
        .pointer("/order/menuList/menus")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            ExtractError::MissingPath(format!(
                "pages.current.restaurant.{}.order.menuList.menus",
                restaurant_id
            ))
        })?;

    let mut records = Vec::new();
    for (section_idx, section) in menus.iter().enumerate() {
        let Some(category) = section.pointer("/menu/name") else {
            warn!(section = section_idx, "menu section without a name, skipping");
            continue;
        };
        let Some(categories) = section.pointer("/menu/categories").and_then(Value::as_array) else {
            warn!(section = section_idx, "menu section without categories, skipping");
            continue;
        };

        for entry in categories {
            let Some(items) = entry.pointer("/category/items").and_then(Value::as_array) else {
                warn!(section = section_idx, "category without items, skipping");
                continue;
            };

            for item_data in items {
                let Some(item) = item_data.get("item") else {
                    continue;
                };
                let mut record = flattener.flatten(item);
                record.insert(CATEGORY_KEY.to_string(), category.clone());
                records.push(record);
            }
        }
    }

    debug!(items = records.len(), sections = menus.len(), "extracted menu items");
    Ok(records)
}
