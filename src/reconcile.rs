//! Column reconciliation - turn a batch of flat records into one clean table
//!
//! The pipeline runs in a fixed order:
//!
//! 1. union of keys across the batch
//! 2. indexed groups (`tag_slugs_0`, `tag_slugs_1`, ...) collapse into one column
//! 3. name cleanup (numeric suffix, `item_` prefix, `name` -> `item_name`)
//! 4. duplicate names keep their first column
//! 5. numeric coercion of price-like columns
//! 6. priority columns move to the front
//! 7. denylisted columns are dropped
//! 8. rows sort by category then price, missing values last
//!
//! Group collapsing looks at raw names, before cleanup strips the index suffix.

use crate::error::ReconcileError;
use crate::table::Table;
use crate::types::{Cell, FlatRecord, ReconcileConfig};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Number, Value};
use std::cmp::Ordering;
use std::collections::HashSet;
use tracing::debug;

static NUMERIC_SUFFIX_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"_\d+$").unwrap());

/// Reconcile a batch of flat records into a table
pub fn reconcile(batch: &[FlatRecord], config: &ReconcileConfig) -> Result<Table, ReconcileError> {
    if batch.is_empty() {
        return Err(ReconcileError::EmptyBatch);
    }

    let table = Table::from_records(batch);
    debug!(rows = table.len(), columns = table.columns().len(), "built raw table");

    let table = collapse_groups(table, config);
    let table = clean_column_names(table, config);
    let table = dedupe_columns(table);
    let table = coerce_numeric(table, &config.numeric_columns);
    let table = order_columns(table, &config.priority_columns);
    let table = drop_columns(table, &config.drop_columns);
    let table = sort_rows(table, &config.sort_by)?;

    debug!(rows = table.len(), columns = table.columns().len(), "reconciled table");
    Ok(table)
}

/// Clean a single raw column name
pub fn clean_column_name(name: &str, config: &ReconcileConfig) -> String {
    let stripped = NUMERIC_SUFFIX_REGEX.replace(name, "");
    let stripped = stripped
        .strip_prefix(config.strip_prefix.as_str())
        .unwrap_or(&stripped);

    let (from, to) = &config.rename_name;
    if stripped == from {
        return to.clone();
    }
    stripped.to_string()
}

/// Collapse `<group>_<digits>` columns into one delimited column per group
pub fn collapse_groups(table: Table, config: &ReconcileConfig) -> Table {
    let mut table = table;
    for group in &config.groups {
        let pattern = format!(
            "^{}{}\\d+$",
            regex::escape(group),
            regex::escape(&config.separator)
        );
        let Ok(re) = Regex::new(&pattern) else {
            continue;
        };

        let matched: Vec<usize> = table
            .columns()
            .iter()
            .enumerate()
            .filter(|(_, c)| re.is_match(c))
            .map(|(i, _)| i)
            .collect();
        if matched.is_empty() {
            continue;
        }

        debug!(group = %group, columns = matched.len(), "collapsing indexed group");
        let delimiter = config.group_delimiter.as_str();
        table = table.merge_columns(&matched, group.clone(), |cells| {
            let parts: Vec<String> = cells.into_iter().filter_map(non_empty_text).collect();
            Some(Value::String(parts.join(delimiter)))
        });
    }
    table
}

fn non_empty_text(cell: &Cell) -> Option<String> {
    match cell {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.is_empty() => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => Some(other.to_string()),
    }
}

/// Apply `clean_column_name` to every column
pub fn clean_column_names(table: Table, config: &ReconcileConfig) -> Table {
    table.rename(|name| clean_column_name(name, config))
}

/// Keep only the first column for each name
pub fn dedupe_columns(table: Table) -> Table {
    let keep: Vec<usize> = {
        let mut seen = HashSet::new();
        table
            .columns()
            .iter()
            .enumerate()
            .filter(|(_, c)| seen.insert(c.as_str()))
            .map(|(i, _)| i)
            .collect()
    };

    if keep.len() == table.columns().len() {
        return table;
    }
    table.select(&keep)
}

/// Parse string cells of the given columns as numbers, leaving unparseable values alone
pub fn coerce_numeric(table: Table, columns: &[String]) -> Table {
    columns
        .iter()
        .fold(table, |table, column| table.map_column(column, |cell| cell.map(to_number)))
}

fn to_number(value: Value) -> Value {
    let Value::String(s) = &value else {
        return value;
    };
    let text = s.trim();

    if let Ok(i) = text.parse::<i64>() {
        return Value::Number(i.into());
    }
    match text.parse::<f64>().ok().and_then(Number::from_f64) {
        Some(n) => Value::Number(n),
        None => value,
    }
}

/// Move priority columns to the front, in priority order
pub fn order_columns(table: Table, priority: &[String]) -> Table {
    let mut order: Vec<usize> = priority
        .iter()
        .filter_map(|p| table.column_index(p))
        .collect();
    let placed: HashSet<usize> = order.iter().copied().collect();
    order.extend((0..table.columns().len()).filter(|i| !placed.contains(i)));

    table.select(&order)
}

/// Drop every column named in `drop`
pub fn drop_columns(table: Table, drop: &[String]) -> Table {
    let keep: Vec<usize> = table
        .columns()
        .iter()
        .enumerate()
        .filter(|(_, c)| !drop.contains(c))
        .map(|(i, _)| i)
        .collect();

    table.select(&keep)
}

/// Stable ascending sort by the given columns, missing values last
pub fn sort_rows(table: Table, sort_by: &[String]) -> Result<Table, ReconcileError> {
    let mut keys = Vec::with_capacity(sort_by.len());
    for column in sort_by {
        let idx = table
            .column_index(column)
            .ok_or_else(|| ReconcileError::Schema {
                column: column.clone(),
            })?;
        keys.push(idx);
    }
    if keys.is_empty() {
        return Ok(table);
    }

    Ok(table.sort_rows_by(|a, b| {
        keys.iter()
            .map(|&k| compare_cells(&a[k], &b[k]))
            .find(|o| *o != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    }))
}

/// Sort rank of a cell: numbers, then text, then missing
#[derive(Debug, PartialEq, PartialOrd)]
enum SortKey<'a> {
    Number(f64),
    Text(std::borrow::Cow<'a, str>),
    Missing,
}

impl<'a> SortKey<'a> {
    fn of(cell: &'a Cell) -> Self {
        match cell {
            None | Some(Value::Null) => SortKey::Missing,
            Some(Value::Number(n)) => n.as_f64().map(SortKey::Number).unwrap_or(SortKey::Missing),
            Some(Value::String(s)) => SortKey::Text(s.as_str().into()),
            Some(other) => SortKey::Text(other.to_string().into()),
        }
    }
}

fn compare_cells(a: &Cell, b: &Cell) -> Ordering {
    SortKey::of(a)
        .partial_cmp(&SortKey::of(b))
        .unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> FlatRecord {
        serde_json::from_value(value).unwrap()
    }

    fn unsorted() -> ReconcileConfig {
        ReconcileConfig {
            sort_by: vec![],
            ..ReconcileConfig::default()
        }
    }

    #[test]
    fn test_empty_batch() {
        let result = reconcile(&[], &ReconcileConfig::default());
        assert!(matches!(result, Err(ReconcileError::EmptyBatch)));
    }

    #[test]
    fn test_missing_sort_column() {
        let batch = vec![record(json!({"category": "Mains", "name": "Rice"}))];

        let result = reconcile(&batch, &ReconcileConfig::default());

        match result {
            Err(ReconcileError::Schema { column }) => assert_eq!(column, "price"),
            other => panic!("Expected schema error, got {:?}", other),
        }
    }

    #[test]
    fn test_column_name_cleanup() {
        let config = ReconcileConfig::default();

        assert_eq!(clean_column_name("name", &config), "item_name");
        assert_eq!(clean_column_name("item_price_3", &config), "price");
        assert_eq!(clean_column_name("item_name", &config), "item_name");
        assert_eq!(clean_column_name("rating_value", &config), "rating_value");
        assert_eq!(clean_column_name("desc_12", &config), "desc");
        assert_eq!(clean_column_name("price_tag_1a", &config), "price_tag_1a");
        assert_eq!(clean_column_name("tracking_item_type", &config), "tracking_item_type");
        assert_eq!(clean_column_name("item_item_state", &config), "item_state");
    }

    #[test]
    fn test_single_record_batch() {
        let batch = vec![record(json!({
            "name": "Soup",
            "item_desc": "Hot",
            "tag_slugs_0": "veg"
        }))];

        let table = reconcile(&batch, &unsorted()).unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.columns(), &["item_name", "desc", "tag_slugs"]);
    }

    #[test]
    fn test_indexed_group_collapse() {
        let batch = vec![record(json!({
            "tag_slugs_0": "veg",
            "tag_slugs_1": "spicy",
            "tag_slugs_2": ""
        }))];

        let table = reconcile(&batch, &unsorted()).unwrap();

        assert_eq!(table.columns(), &["tag_slugs"]);
        assert_eq!(table.get(0, "tag_slugs").unwrap(), "veg, spicy");
    }

    #[test]
    fn test_group_collapse_tolerates_schema_drift() {
        let batch = vec![
            record(json!({"id": 1, "dietary_slugs_0": "veg", "dietary_slugs_1": "jain"})),
            record(json!({"id": 2})),
            record(json!({"id": 3, "dietary_slugs_0": null, "dietary_slugs_1": "egg"})),
        ];

        let table = reconcile(&batch, &unsorted()).unwrap();

        assert_eq!(table.columns(), &["dietary_slugs", "id"]);
        assert_eq!(table.get(0, "dietary_slugs").unwrap(), "veg, jain");
        assert_eq!(table.get(1, "dietary_slugs").unwrap(), "");
        assert_eq!(table.get(2, "dietary_slugs").unwrap(), "egg");
    }

    #[test]
    fn test_duplicate_names_keep_first_column() {
        let batch = vec![record(json!({
            "price": "120",
            "item_price": "999",
            "price_1": "5"
        }))];

        let table = reconcile(&batch, &unsorted()).unwrap();

        assert_eq!(table.columns(), &["price"]);
        assert_eq!(table.get(0, "price").unwrap(), 120);
    }

    #[test]
    fn test_numeric_coercion_is_permissive() {
        let batch = vec![
            record(json!({"price": "199", "rating_value": "4.5", "desc": "42"})),
            record(json!({"price": "N/A", "rating_value": 3})),
        ];

        let table = reconcile(&batch, &unsorted()).unwrap();

        assert_eq!(table.get(0, "price").unwrap(), 199);
        assert_eq!(table.get(0, "rating_value").unwrap(), 4.5);
        assert_eq!(table.get(0, "desc").unwrap(), "42");
        assert_eq!(table.get(1, "price").unwrap(), "N/A");
        assert_eq!(table.get(1, "rating_value").unwrap(), 3);
    }

    #[test]
    fn test_priority_order_and_pruning() {
        let batch = vec![record(json!({
            "id": "x1",
            "fb_slug": "noise",
            "tag_slugs_0": "veg",
            "price": 10,
            "name": "Dosa",
            "category": "Breakfast",
            "tag_images_0": "img.png"
        }))];

        let table = reconcile(&batch, &ReconcileConfig::default()).unwrap();

        assert_eq!(
            table.columns(),
            &["category", "item_name", "price", "tag_slugs", "id"]
        );
    }

    #[test]
    fn test_sort_by_category_then_price() {
        let batch = vec![
            record(json!({"category": "Starters", "price": "150", "name": "Soup"})),
            record(json!({"category": "Mains", "price": "80", "name": "Rice"})),
        ];

        let table = reconcile(&batch, &ReconcileConfig::default()).unwrap();

        assert_eq!(table.columns(), &["category", "item_name", "price"]);
        assert_eq!(table.get(0, "item_name").unwrap(), "Rice");
        assert_eq!(table.get(0, "price").unwrap(), 80);
        assert_eq!(table.get(1, "item_name").unwrap(), "Soup");
    }

    #[test]
    fn test_missing_sort_values_go_last() {
        let batch = vec![
            record(json!({"category": "Mains", "name": "a"})),
            record(json!({"category": "Mains", "price": "N/A", "name": "b"})),
            record(json!({"category": "Mains", "price": "300", "name": "c"})),
            record(json!({"price": "5", "name": "d"})),
            record(json!({"category": "Mains", "price": "20", "name": "e"})),
        ];

        let table = reconcile(&batch, &ReconcileConfig::default()).unwrap();

        let names: Vec<&Value> = (0..table.len())
            .map(|r| table.get(r, "item_name").unwrap())
            .collect();
        assert_eq!(names, vec!["e", "c", "b", "a", "d"]);
    }
}
