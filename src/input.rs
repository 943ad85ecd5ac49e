//! Reading saved pages and state dumps from disk

use anyhow::{Context, Result};
use serde_json::Value;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::debug;

/// Parse JSON bytes, SIMD-accelerated when possible
///
/// Falls back to serde_json when simd-json rejects the input, so the error
/// reported is serde_json's.
pub fn parse_json(mut content: Vec<u8>) -> Result<Value> {
    let fallback = content.clone();
    match simd_json::serde::from_slice::<Value>(&mut content) {
        Ok(value) => Ok(value),
        Err(e) => {
            debug!(error = %e, "simd-json rejected input, retrying with serde_json");
            serde_json::from_slice(&fallback).context("Failed to parse JSON")
        }
    }
}

/// Read a whole JSON document from a file
pub fn read_json_file<P: AsRef<Path>>(path: P) -> Result<Value> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let mut content = Vec::new();
    BufReader::new(file)
        .read_to_end(&mut content)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_json(content)
}

/// Read a saved HTML page
pub fn read_text_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}
