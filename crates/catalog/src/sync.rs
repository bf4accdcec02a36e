use chrono::Utc;
use serde::Serialize;

use crate::error::CatalogError;
use crate::model::{RawRecord, SkippedRecord, SyncPlan, SyncSummary};
use crate::reconcile::{reconcile, SyncConfig};
use crate::store::CatalogStore;

#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub summary: SyncSummary,
    pub created: Vec<String>,
    pub updated: Vec<String>,
    pub deleted: Vec<String>,
    pub skipped: Vec<SkippedRecord>,
}

impl SyncReport {
    fn from_plan(plan: SyncPlan, dry_run: bool) -> Self {
        Self {
            summary: plan.summary(dry_run),
            created: plan.create_keys().into_iter().map(String::from).collect(),
            updated: plan.update_keys().into_iter().map(String::from).collect(),
            deleted: plan.to_mark_deleted,
            skipped: plan.skipped,
        }
    }
}

/// Reconcile a snapshot against the store and apply the result as one unit.
///
/// With `dry_run` the plan is computed and reported but nothing is written.
/// A store failure is returned as-is; the store guarantees nothing landed.
pub fn sync<S, I>(
    store: &mut S,
    incoming: I,
    config: &SyncConfig,
    dry_run: bool,
) -> Result<SyncReport, CatalogError>
where
    S: CatalogStore,
    I: IntoIterator<Item = RawRecord>,
{
    let existing = store.load_entries()?;
    let plan = reconcile(incoming, &existing, config);
    let summary = plan.summary(dry_run);

    if dry_run {
        log::info!(
            "dry run: {} would be created, {} updated, {} marked deleted",
            summary.created,
            summary.updated,
            summary.deleted
        );
    } else if !plan.is_empty() {
        store.apply(&plan, Utc::now())?;
        log::info!(
            "sync applied: {} created, {} updated, {} marked deleted",
            summary.created,
            summary.updated,
            summary.deleted
        );
    }
    if summary.skipped > 0 {
        log::warn!("{} snapshot records skipped", summary.skipped);
    }

    Ok(SyncReport::from_plan(plan, dry_run))
}
