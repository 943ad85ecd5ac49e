use crate::table::Table;
use crate::types::Cell;
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes tables as CSV: a header row of column names, then one line per row
pub struct TableWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl TableWriter<File> {
    /// Create a writer that writes to a new file at `path`
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).context("Failed to create output directory")?;
        }
        let file = File::create(path)
            .with_context(|| format!("Failed to open file: {}", path.display()))?;
        Ok(TableWriter::new(file))
    }
}

impl<W: Write> TableWriter<W> {
    pub fn new(writer: W) -> Self {
        TableWriter {
            writer: csv::Writer::from_writer(writer),
        }
    }

    pub fn write_table(&mut self, table: &Table) -> Result<()> {
        self.writer
            .write_record(table.columns())
            .context("Failed to write header")?;
        for row in table.rows() {
            self.writer
                .write_record(row.iter().map(cell_text))
                .context("Failed to write row")?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush().context("Failed to flush writer")
    }
}

/// Text form of a cell; missing and null cells are empty fields
fn cell_text(cell: &Cell) -> String {
    match cell {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Write a table to a CSV file
pub fn write_csv<P: AsRef<Path>>(path: P, table: &Table) -> Result<()> {
    let mut writer = TableWriter::create(path)?;
    writer.write_table(table)?;
    writer.flush()
}

/// Write any serializable value as pretty printed JSON
pub fn write_json_pretty<P: AsRef<Path>, T: Serialize + ?Sized>(path: P, value: &T) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)
        .with_context(|| format!("Failed to open file: {}", path.display()))?;
    let mut out = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut out, value).context("Failed to serialize JSON")?;
    writeln!(out).context("Failed to write JSON")?;
    out.flush().context("Failed to flush writer")
}
