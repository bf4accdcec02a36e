use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::error::CatalogError;
use crate::model::{CatalogEntry, SyncPlan};

/// Persistence for catalog entries.
///
/// `apply` must be all-or-nothing: when it returns an error, the stored
/// catalog is exactly what `load_entries` returned before the call.
pub trait CatalogStore {
    fn load_entries(&self) -> Result<BTreeMap<String, CatalogEntry>, CatalogError>;

    fn apply(&mut self, plan: &SyncPlan, at: DateTime<Utc>) -> Result<(), CatalogError>;
}

/// Apply a plan to an entry map in place. Stops at the first conflict, so
/// callers that need atomicity run this against a staged copy.
pub fn apply_plan(
    entries: &mut BTreeMap<String, CatalogEntry>,
    plan: &SyncPlan,
    at: DateTime<Utc>,
) -> Result<(), CatalogError> {
    for entry in &plan.to_create {
        if entries.contains_key(&entry.key) {
            return Err(CatalogError::Conflict { key: entry.key.clone(), reason: "create of existing key" });
        }
        let mut entry = entry.clone();
        entry.deleted = false;
        entry.last_updated = Some(at);
        entries.insert(entry.key.clone(), entry);
    }

    for entry in &plan.to_update {
        let slot = entries
            .get_mut(&entry.key)
            .ok_or_else(|| CatalogError::Conflict { key: entry.key.clone(), reason: "update of unknown key" })?;
        slot.fields = entry.fields.clone();
        slot.content_hash = entry.content_hash.clone();
        slot.deleted = false;
        slot.last_updated = Some(at);
    }

    for key in &plan.to_mark_deleted {
        let slot = entries
            .get_mut(key)
            .ok_or_else(|| CatalogError::Conflict { key: key.clone(), reason: "delete of unknown key" })?;
        slot.deleted = true;
        slot.last_updated = Some(at);
    }

    Ok(())
}

/// In-memory catalog. Applies plans to a staged copy and swaps it in.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    entries: BTreeMap<String, CatalogEntry>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: impl IntoIterator<Item = CatalogEntry>) -> Self {
        Self { entries: entries.into_iter().map(|e| (e.key.clone(), e)).collect() }
    }

    pub fn get(&self, key: &str) -> Option<&CatalogEntry> {
        self.entries.get(key)
    }

    pub fn entries(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CatalogStore for MemoryCatalog {
    fn load_entries(&self) -> Result<BTreeMap<String, CatalogEntry>, CatalogError> {
        Ok(self.entries.clone())
    }

    fn apply(&mut self, plan: &SyncPlan, at: DateTime<Utc>) -> Result<(), CatalogError> {
        let mut staged = self.entries.clone();
        apply_plan(&mut staged, plan, at)?;
        self.entries = staged;
        Ok(())
    }
}
