use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Normalize a snapshot header: trimmed, lowercase, spaces to underscores.
/// `"Item Number"` -> `"item_number"`.
pub fn normalize_column(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

/// One row of an external snapshot, keyed by normalized column name.
/// Values are stored trimmed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    fields: BTreeMap<String, String>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: &str, value: &str) {
        self.fields.insert(normalize_column(column), value.trim().to_string());
    }

    /// Value of a column, empty when absent.
    pub fn get(&self, column: &str) -> &str {
        self.fields.get(column).map(String::as_str).unwrap_or("")
    }

    pub fn with(mut self, column: &str, value: &str) -> Self {
        self.insert(column, value);
        self
    }
}

impl<K: AsRef<str>, V: AsRef<str>> FromIterator<(K, V)> for RawRecord {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut record = RawRecord::new();
        for (k, v) in iter {
            record.insert(k.as_ref(), v.as_ref());
        }
        record
    }
}

// ---------------------------------------------------------------------------
// Catalog entries
// ---------------------------------------------------------------------------

/// Descriptive payload of a catalog part.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartFields {
    pub description: String,
    pub size: String,
    pub product_group_id: String,
    pub unit_cost: Option<f64>,
    pub unit_cost_date: Option<NaiveDate>,
    pub vendor_name: String,
    pub vendor_product_number: String,
    pub vendor_product_description: String,
    pub vendor_phone: String,
}

/// A field value that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub value: String,
}

impl PartFields {
    pub fn from_raw(raw: &RawRecord) -> Result<Self, FieldError> {
        Ok(Self {
            description: raw.get("description").to_string(),
            size: raw.get("size").to_string(),
            product_group_id: raw.get("product_group_id").to_string(),
            unit_cost: parse_cost(raw.get("unit_cost"))?,
            unit_cost_date: parse_date(raw.get("unit_cost_date"))?,
            vendor_name: raw.get("vendor_name").to_string(),
            vendor_product_number: raw.get("vendor_product_number").to_string(),
            vendor_product_description: raw.get("vendor_product_description").to_string(),
            vendor_phone: raw.get("vendor_phone").to_string(),
        })
    }
}

/// `"$1,204.50"` -> `1204.5`. Empty -> `None`.
fn parse_cost(value: &str) -> Result<Option<f64>, FieldError> {
    let cleaned: String = value.chars().filter(|c| *c != '$' && *c != ',').collect();
    if cleaned.is_empty() {
        return Ok(None);
    }
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(Some)
        .ok_or_else(|| FieldError { field: "unit_cost", value: value.to_string() })
}

/// ISO dates, ISO timestamps (date part kept) and US `m/d/Y`. Empty -> `None`.
fn parse_date(value: &str) -> Result<Option<NaiveDate>, FieldError> {
    if value.is_empty() {
        return Ok(None);
    }
    if let Ok(d) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(Some(d));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(Some(dt.date_naive()));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Ok(Some(dt.date()));
        }
    }
    NaiveDate::parse_from_str(value, "%m/%d/%Y")
        .map(Some)
        .map_err(|_| FieldError { field: "unit_cost_date", value: value.to_string() })
}

/// A stored part. Soft-deleted entries keep their payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub key: String,
    #[serde(flatten)]
    pub fields: PartFields,
    pub content_hash: String,
    pub deleted: bool,
    pub last_updated: Option<DateTime<Utc>>,
}

impl CatalogEntry {
    /// New live entry with its hash computed from `fields`.
    pub fn new(key: impl Into<String>, fields: PartFields) -> Self {
        let content_hash = crate::hash::content_hash(&fields);
        Self { key: key.into(), fields, content_hash, deleted: false, last_updated: None }
    }
}

// ---------------------------------------------------------------------------
// Reconciliation output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    MissingKey,
    DuplicateKey,
    InvalidField { field: &'static str, value: String },
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingKey => write!(f, "missing key"),
            Self::DuplicateKey => write!(f, "duplicate key"),
            Self::InvalidField { field, value } => write!(f, "cannot parse {field} '{value}'"),
        }
    }
}

/// A snapshot record left out of the plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRecord {
    /// 1-based position in the snapshot.
    pub row: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(flatten)]
    pub reason: SkipReason,
}

/// Changes to apply to the catalog, each list ordered by key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncPlan {
    pub to_create: Vec<CatalogEntry>,
    pub to_update: Vec<CatalogEntry>,
    pub to_mark_deleted: Vec<String>,
    pub skipped: Vec<SkippedRecord>,
    /// Incoming keys whose stored entry was already current.
    pub unchanged: usize,
}

impl SyncPlan {
    pub fn create_keys(&self) -> Vec<&str> {
        self.to_create.iter().map(|e| e.key.as_str()).collect()
    }

    pub fn update_keys(&self) -> Vec<&str> {
        self.to_update.iter().map(|e| e.key.as_str()).collect()
    }

    /// True when applying the plan would change nothing.
    pub fn is_empty(&self) -> bool {
        self.to_create.is_empty() && self.to_update.is_empty() && self.to_mark_deleted.is_empty()
    }

    pub fn summary(&self, dry_run: bool) -> SyncSummary {
        SyncSummary {
            created: self.to_create.len(),
            updated: self.to_update.len(),
            deleted: self.to_mark_deleted.len(),
            unchanged: self.unchanged,
            skipped: self.skipped.len(),
            dry_run,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SyncSummary {
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
    pub unchanged: usize,
    pub skipped: usize,
    pub dry_run: bool,
}
