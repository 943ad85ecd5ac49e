//! Rectangular tables built from flat record batches
//!
//! Every transform consumes a table and returns a new one, so each
//! reconciliation step can be reasoned about (and tested) on its own.

use crate::types::{Cell, FlatRecord};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashSet;

/// Ordered, unique column names over ordered rows of equal width
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Build a table whose columns are the union of all record keys, in first-seen order
    pub fn from_records(records: &[FlatRecord]) -> Self {
        let mut seen = HashSet::new();
        let mut columns = Vec::new();
        for record in records {
            for key in record.keys() {
                if seen.insert(key.as_str()) {
                    columns.push(key.clone());
                }
            }
        }

        let rows = records
            .iter()
            .map(|record| columns.iter().map(|c| record.get(c).cloned()).collect())
            .collect();

        Table { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell at a row for a named column, `None` when either is missing
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.get(idx)?.as_ref()
    }

    /// Keep the given column positions, in the given order
    pub fn select(self, indices: &[usize]) -> Self {
        let columns = indices.iter().map(|&i| self.columns[i].clone()).collect();
        let rows = self
            .rows
            .into_iter()
            .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
            .collect();
        Table { columns, rows }
    }

    /// Replace column names; `rename` sees every name in order
    pub fn rename(self, mut rename: impl FnMut(&str) -> String) -> Self {
        Table {
            columns: self.columns.iter().map(|c| rename(c)).collect(),
            rows: self.rows,
        }
    }

    /// Rewrite every cell of one column
    pub fn map_column(self, column: &str, mut f: impl FnMut(Cell) -> Cell) -> Self {
        let Some(idx) = self.column_index(column) else {
            return self;
        };
        let rows = self
            .rows
            .into_iter()
            .map(|mut row| {
                let cell = row[idx].take();
                row[idx] = f(cell);
                row
            })
            .collect();
        Table {
            columns: self.columns,
            rows,
        }
    }

    /// Replace a set of columns with one derived column at the position of the first
    ///
    /// `combine` receives the cells of the replaced columns for one row, in
    /// `indices` order.
    pub fn merge_columns(
        self,
        indices: &[usize],
        name: String,
        mut combine: impl FnMut(Vec<&Cell>) -> Cell,
    ) -> Self {
        let Some(&first) = indices.first() else {
            return self;
        };
        let merged: HashSet<usize> = indices.iter().copied().collect();

        let mut columns = Vec::with_capacity(self.columns.len() + 1 - indices.len());
        for (i, col) in self.columns.iter().enumerate() {
            if i == first {
                columns.push(name.clone());
            } else if !merged.contains(&i) {
                columns.push(col.clone());
            }
        }

        let rows = self
            .rows
            .into_iter()
            .map(|row| {
                let value = combine(indices.iter().map(|&i| &row[i]).collect());
                let mut out = Vec::with_capacity(columns.len());
                let mut value = Some(value);
                for (i, cell) in row.into_iter().enumerate() {
                    if i == first {
                        out.push(value.take().flatten());
                    } else if !merged.contains(&i) {
                        out.push(cell);
                    }
                }
                out
            })
            .collect();

        Table { columns, rows }
    }

    /// Stable sort of rows with a comparator over whole rows
    pub fn sort_rows_by(self, mut compare: impl FnMut(&[Cell], &[Cell]) -> Ordering) -> Self {
        let mut rows = self.rows;
        rows.sort_by(|a, b| compare(a, b));
        Table {
            columns: self.columns,
            rows,
        }
    }
}
