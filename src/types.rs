use serde_json::{Map, Value};

/// A single-level mapping from path key to scalar value
pub type FlatRecord = Map<String, Value>;

/// Flat records collected over one extraction run, key sets may differ
pub type RecordBatch = Vec<FlatRecord>;

/// One table cell. `None` marks a value the source record never had.
pub type Cell = Option<Value>;

/// Configuration for the flattening process
#[derive(Debug, Clone)]
pub struct FlattenConfig {
    /// Separator placed between path segments and list indices
    pub separator: String,
}

impl Default for FlattenConfig {
    fn default() -> Self {
        FlattenConfig {
            separator: String::from("_"),
        }
    }
}

/// Configuration for column reconciliation
#[derive(Debug, Clone)]
pub struct ReconcileConfig {
    /// Separator used by the flattener, needed to recognise indexed columns
    pub separator: String,

    /// Prefix token stripped from column names
    pub strip_prefix: String,

    /// Cleaned name that gets disambiguated, and what it becomes
    pub rename_name: (String, String),

    /// Indexed groups collapsed into one delimited column each
    pub groups: Vec<String>,

    /// Delimiter for collapsed group values
    pub group_delimiter: String,

    /// Columns whose values are parsed as numbers when possible
    pub numeric_columns: Vec<String>,

    /// Columns placed first, in this order, when present
    pub priority_columns: Vec<String>,

    /// Columns dropped from the output when present
    pub drop_columns: Vec<String>,

    /// Sort keys, ascending, missing values last. Empty disables sorting.
    pub sort_by: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        ReconcileConfig {
            separator: String::from("_"),
            strip_prefix: String::from("item_"),
            rename_name: (String::from("name"), String::from("item_name")),
            groups: strings(&["tag_slugs", "service_slugs", "dietary_slugs"]),
            group_delimiter: String::from(", "),
            numeric_columns: strings(&[
                "price",
                "rating_value",
                "min_price",
                "max_price",
                "default_price",
                "display_price",
            ]),
            priority_columns: strings(&[
                "category",
                "item_name",
                "price",
                "desc",
                "dietary_slugs",
                "rating_value",
                "rating_total_rating_text",
                "item_state",
                "tag_slugs",
                "service_slugs",
            ]),
            drop_columns: strings(&[
                "fb_slug",
                "name_slug",
                "item_metadata",
                "tracking_dish_type",
                "item_tag_image",
                "tag_images",
                "tag_texts",
                "tag_objects",
            ]),
            sort_by: strings(&["category", "price"]),
        }
    }
}
