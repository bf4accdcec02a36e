use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::hash::content_hash;
use crate::model::{normalize_column, CatalogEntry, PartFields, RawRecord, SkipReason, SkippedRecord, SyncPlan};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Snapshot column holding the business key. Normalized like headers.
    pub key_field: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self { key_field: "item_number".into() }
    }
}

/// Diff an incoming snapshot against the stored catalog.
///
/// Unseen keys are created, keys whose content hash changed (or that were
/// soft-deleted and came back) are updated, and live stored keys missing
/// from the snapshot are marked deleted. Records without a key, repeats of
/// a key already seen in this snapshot, and records with unparseable fields
/// are skipped and counted; they never abort the batch.
pub fn reconcile<I>(
    incoming: I,
    existing: &BTreeMap<String, CatalogEntry>,
    config: &SyncConfig,
) -> SyncPlan
where
    I: IntoIterator<Item = RawRecord>,
{
    let mut seen: BTreeSet<String> = BTreeSet::new();
    let mut creates: BTreeMap<String, CatalogEntry> = BTreeMap::new();
    let mut updates: BTreeMap<String, CatalogEntry> = BTreeMap::new();
    let mut plan = SyncPlan::default();
    let key_field = normalize_column(&config.key_field);

    for (idx, raw) in incoming.into_iter().enumerate() {
        let row = idx + 1;
        let key = raw.get(&key_field).to_string();

        let skip = if key.is_empty() {
            Some(SkipReason::MissingKey)
        } else if seen.contains(&key) {
            Some(SkipReason::DuplicateKey)
        } else {
            None
        };
        if let Some(reason) = skip {
            log::warn!("snapshot row {row}: {reason}, skipped");
            plan.skipped.push(SkippedRecord {
                row,
                key: (!key.is_empty()).then(|| key.clone()),
                reason,
            });
            continue;
        }
        // Claimed even if the fields fail to parse, so the stored entry is
        // left alone instead of being soft-deleted.
        seen.insert(key.clone());

        let fields = match PartFields::from_raw(&raw) {
            Ok(fields) => fields,
            Err(err) => {
                let reason = SkipReason::InvalidField { field: err.field, value: err.value };
                log::warn!("snapshot row {row} ('{key}'): {reason}, skipped");
                plan.skipped.push(SkippedRecord { row, key: Some(key), reason });
                continue;
            }
        };
        let hash = content_hash(&fields);

        match existing.get(&key) {
            None => {
                creates.insert(key.clone(), CatalogEntry::new(key, fields));
            }
            Some(stored) if stored.content_hash != hash || stored.deleted => {
                log::debug!("'{key}' changed ({} -> {hash})", stored.content_hash);
                updates.insert(key.clone(), CatalogEntry::new(key, fields));
            }
            Some(_) => plan.unchanged += 1,
        }
    }

    plan.to_mark_deleted = existing
        .values()
        .filter(|e| !e.deleted && !seen.contains(&e.key))
        .map(|e| e.key.clone())
        .collect();
    plan.to_create = creates.into_values().collect();
    plan.to_update = updates.into_values().collect();
    plan
}
