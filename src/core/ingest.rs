use crate::domain::model::{FieldValue, RawRecord};
use crate::domain::ports::DataSource;
use crate::utils::error::{DashboardError, Result};
use csv::{ReaderBuilder, StringRecord};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static SEPARATOR_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s-]+").expect("separator pattern is valid"));

/// Canonical field key: lowercase, with every run of whitespace or hyphens
/// collapsed into a single underscore.
///
/// `"Company Location"` becomes `company_location`, `"Remote-Ratio"` becomes
/// `remote_ratio`. Applying it twice gives the same result as once.
pub fn normalize_header(name: &str) -> String {
    SEPARATOR_RUN
        .replace_all(&name.to_lowercase(), "_")
        .into_owned()
}

pub fn decode_utf8(bytes: Vec<u8>) -> Result<String> {
    let text = String::from_utf8(bytes)?;
    Ok(match text.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => text,
    })
}

/// Header-driven CSV parsing. Every cell is kept as text; empty cells
/// become `Null`.
///
/// A row whose width differs from the header is an error when a
/// well-formed row follows it. Ragged or whitespace-only rows at the end of
/// the input are dropped.
pub fn parse_records(text: &str) -> Result<Vec<RawRecord>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let keys: Vec<String> = reader.headers()?.iter().map(normalize_header).collect();
    tracing::debug!("CSV header columns: {:?}", keys);

    let mut records = Vec::new();
    // held back until a well-formed row shows they are not the trailer
    let mut held: Vec<(u64, StringRecord)> = Vec::new();
    for result in reader.records() {
        let row = result.map_err(|e| DashboardError::Parse {
            line: e.position().map(|p| p.line()).unwrap_or(0),
            message: e.to_string(),
        })?;

        if row.len() != keys.len() || is_blank(&row) {
            let line = row.position().map(|p| p.line()).unwrap_or(0);
            held.push((line, row));
            continue;
        }

        for (line, pending) in held.drain(..) {
            if pending.len() != keys.len() {
                return Err(DashboardError::Parse {
                    line,
                    message: format!(
                        "found record with {} fields, but the header has {} fields",
                        pending.len(),
                        keys.len()
                    ),
                });
            }
            records.push(to_record(&keys, &pending));
        }
        records.push(to_record(&keys, &row));
    }

    if !held.is_empty() {
        tracing::debug!("Ignored {} malformed trailing lines", held.len());
    }

    Ok(records)
}

fn is_blank(row: &StringRecord) -> bool {
    row.iter().all(|cell| cell.trim().is_empty())
}

fn to_record(keys: &[String], row: &StringRecord) -> RawRecord {
    let mut data = HashMap::with_capacity(keys.len());
    for (key, cell) in keys.iter().zip(row.iter()) {
        let value = if cell.is_empty() {
            FieldValue::Null
        } else {
            FieldValue::Text(cell.to_string())
        };
        // duplicate canonical keys: rightmost column wins
        data.insert(key.clone(), value);
    }
    RawRecord::new(data)
}

/// Fetch, decode and parse the dataset behind `source`.
pub async fn load_records<S: DataSource + ?Sized>(source: &S) -> Result<Vec<RawRecord>> {
    tracing::debug!("Fetching dataset from: {}", source.locator());
    let bytes = source.fetch().await?;
    tracing::debug!("Fetched {} bytes from {}", bytes.len(), source.locator());

    let text = decode_utf8(bytes)?;
    let records = parse_records(&text)?;
    tracing::info!("Parsed {} records from {}", records.len(), source.locator());
    Ok(records)
}
