//! Snapshot adapter: CSV with a header row, or a JSON array of objects.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use partline_catalog::RawRecord;

use crate::exit_codes::{EXIT_CATALOG_SNAPSHOT, EXIT_USAGE};
use crate::CliError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    Csv,
    Json,
}

impl SnapshotFormat {
    /// `.json` is JSON; anything else is read as CSV.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Csv,
        }
    }
}

fn snapshot_err(msg: impl Into<String>) -> CliError {
    CliError { code: EXIT_CATALOG_SNAPSHOT, message: msg.into(), hint: None }
}

/// UTF-8 when it is; otherwise Windows-1252, which is what Excel exports.
pub fn decode_snapshot(bytes: Vec<u8>) -> String {
    let text = match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            let bytes = e.into_bytes();
            log::warn!("snapshot is not UTF-8; decoding as Windows-1252");
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            decoded.into_owned()
        }
    };
    match text.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => text,
    }
}

pub fn load_snapshot(path: &Path) -> Result<Vec<RawRecord>, CliError> {
    let mut bytes = Vec::new();
    File::open(path)
        .and_then(|mut f| f.read_to_end(&mut bytes))
        .map_err(|e| CliError {
            code: EXIT_USAGE,
            message: format!("cannot read {}: {e}", path.display()),
            hint: None,
        })?;
    let contents = decode_snapshot(bytes);

    let records = match SnapshotFormat::from_path(path) {
        SnapshotFormat::Csv => parse_csv(&contents),
        SnapshotFormat::Json => parse_json(&contents),
    }
    .map_err(|e| snapshot_err(format!("{}: {e}", path.display())))?;

    log::info!("read {} snapshot records from {}", records.len(), path.display());
    Ok(records)
}

pub fn parse_csv(contents: &str) -> Result<Vec<RawRecord>, String> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(contents.as_bytes());

    let headers = reader.headers().map_err(|e| e.to_string())?.clone();
    let mut records = Vec::new();
    for (i, row) in reader.records().enumerate() {
        let row = row.map_err(|e| format!("row {}: {e}", i + 1))?;
        records.push(headers.iter().zip(row.iter()).collect());
    }
    Ok(records)
}

pub fn parse_json(contents: &str) -> Result<Vec<RawRecord>, String> {
    let value: serde_json::Value = serde_json::from_str(contents).map_err(|e| e.to_string())?;
    let items = value.as_array().ok_or("expected a JSON array of objects")?;

    // A non-object element becomes an empty record; reconcile skips it as keyless.
    let records = items
        .iter()
        .enumerate()
        .map(|(i, item)| match item.as_object() {
            Some(obj) => obj.iter().map(|(k, v)| (k.as_str(), json_text(v))).collect(),
            None => {
                log::warn!("element {}: expected an object, got {item}", i + 1);
                RawRecord::new()
            }
        })
        .collect();
    Ok(records)
}

/// Scalar JSON as snapshot text: strings verbatim, null empty.
fn json_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
