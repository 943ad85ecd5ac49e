use crate::types::{FlatRecord, FlattenConfig};
use serde_json::{Map, Value};

/// Flattens nested JSON records into single-level path-keyed records
pub struct Flattener {
    config: FlattenConfig,
}

impl Flattener {
    pub fn new(config: FlattenConfig) -> Self {
        Flattener { config }
    }

    /// Flatten a JSON value into a flat record
    ///
    /// Nested objects contribute one key per scalar leaf, joined with the
    /// separator. Scalars inside arrays get their index appended; objects and
    /// arrays inside arrays are dropped.
    pub fn flatten(&self, value: &Value) -> FlatRecord {
        let mut record = Map::new();
        self.flatten_into(value, None, &mut record);
        record
    }

    /// `prefix` is `None` only at the root; an empty key is still a path
    fn flatten_into(&self, value: &Value, prefix: Option<&str>, record: &mut FlatRecord) {
        match value {
            Value::Object(obj) => self.flatten_object(obj, prefix, record),
            Value::Array(arr) => self.flatten_array(arr, prefix, record),
            scalar => {
                // A root scalar has no path to live under
                if let Some(path) = prefix {
                    record.insert(path.to_string(), scalar.clone());
                }
            }
        }
    }

    fn flatten_object(
        &self,
        obj: &Map<String, Value>,
        prefix: Option<&str>,
        record: &mut FlatRecord,
    ) {
        for (key, child) in obj.iter() {
            let path = self.join(prefix, key);
            self.flatten_into(child, Some(&path), record);
        }
    }

    fn flatten_array(&self, arr: &[Value], prefix: Option<&str>, record: &mut FlatRecord) {
        for (idx, item) in arr.iter().enumerate() {
            match item {
                Value::Object(_) | Value::Array(_) => {
                    // Composite list elements have no flat representation
                    continue;
                }
                scalar => {
                    record.insert(self.join(prefix, &idx.to_string()), scalar.clone());
                }
            }
        }
    }

    fn join(&self, prefix: Option<&str>, segment: &str) -> String {
        match prefix {
            Some(prefix) => format!("{}{}{}", prefix, self.config.separator, segment),
            None => segment.to_string(),
        }
    }
}

impl Default for Flattener {
    fn default() -> Self {
        Flattener::new(FlattenConfig::default())
    }
}

/// Flatten with the default `_` separator
pub fn flatten(value: &Value) -> FlatRecord {
    Flattener::default().flatten(value)
}
