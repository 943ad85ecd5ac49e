//! Per-category summary of a reconciled menu table

use crate::table::Table;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// Price statistics for one category, over numeric prices only
#[derive(Debug, Clone, PartialEq)]
pub struct PriceStats {
    pub category: String,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MenuSummary {
    pub total_items: usize,
    /// Item count per category, largest first
    pub items_per_category: Vec<(String, usize)>,
    /// Price statistics per category, by category name
    pub price_stats: Vec<PriceStats>,
}

impl MenuSummary {
    pub fn from_table(table: &Table, category_column: &str, price_column: &str) -> Self {
        let mut order: Vec<String> = Vec::new();
        let mut counts: HashMap<String, usize> = HashMap::new();
        let mut prices: HashMap<String, Vec<f64>> = HashMap::new();

        for row in 0..table.len() {
            let Some(category) = table.get(row, category_column).and_then(category_label) else {
                continue;
            };
            if !counts.contains_key(&category) {
                order.push(category.clone());
            }
            *counts.entry(category.clone()).or_insert(0) += 1;

            if let Some(price) = table.get(row, price_column).and_then(Value::as_f64) {
                prices.entry(category).or_default().push(price);
            }
        }

        let mut items_per_category: Vec<(String, usize)> =
            order.iter().map(|c| (c.clone(), counts[c])).collect();
        items_per_category.sort_by(|a, b| b.1.cmp(&a.1));

        let mut categories = order;
        categories.sort();
        let price_stats = categories
            .into_iter()
            .map(|category| {
                let values = prices.get(&category).map(Vec::as_slice).unwrap_or(&[]);
                stats(category, values)
            })
            .collect();

        MenuSummary {
            total_items: table.len(),
            items_per_category,
            price_stats,
        }
    }
}

fn category_label(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn stats(category: String, values: &[f64]) -> PriceStats {
    if values.is_empty() {
        return PriceStats {
            category,
            min: None,
            max: None,
            mean: None,
        };
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    PriceStats {
        category,
        min: Some(min),
        max: Some(max),
        mean: Some(mean),
    }
}

fn cell(value: Option<f64>) -> String {
    value.map(|v| format!("{:.2}", v)).unwrap_or_else(|| "-".to_string())
}

impl fmt::Display for MenuSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Menu Summary:")?;
        writeln!(f, "Total items: {}", self.total_items)?;

        writeln!(f, "\nItems per category:")?;
        for (category, count) in &self.items_per_category {
            writeln!(f, "  {:<30} {}", category, count)?;
        }

        writeln!(f, "\nPrice range by category:")?;
        writeln!(f, "  {:<30} {:>10} {:>10} {:>10}", "category", "min", "max", "mean")?;
        for s in &self.price_stats {
            writeln!(
                f,
                "  {:<30} {:>10} {:>10} {:>10}",
                s.category,
                cell(s.min),
                cell(s.max),
                cell(s.mean)
            )?;
        }
        Ok(())
    }
}
