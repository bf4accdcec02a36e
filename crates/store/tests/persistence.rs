use partline_catalog::{sync, CatalogStore, RawRecord, SyncConfig};
use partline_store::SqliteCatalog;
use tempfile::TempDir;

fn part(item: &str, desc: &str, cost: &str) -> RawRecord {
    RawRecord::new()
        .with("Item Number", item)
        .with("Description", desc)
        .with("Unit Cost", cost)
        .with("Unit Cost Date", "3/14/2026")
}

#[test]
fn catalog_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("catalog.db");
    let config = SyncConfig::default();

    {
        let mut store = SqliteCatalog::open(&path).unwrap();
        let report = sync(
            &mut store,
            vec![part("P-1", "ELBOW", "$1,204.50"), part("P-2", "TEE", "6")],
            &config,
            false,
        )
        .unwrap();
        assert_eq!(report.summary.created, 2);
    }

    let mut store = SqliteCatalog::open(&path).unwrap();
    let entries = store.load_entries().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries["P-1"].fields.unit_cost, Some(1204.5));
    assert_eq!(
        entries["P-1"].fields.unit_cost_date.map(|d| d.to_string()),
        Some("2026-03-14".to_string())
    );

    // Reloaded hashes match the snapshot, so nothing changes.
    let again = sync(
        &mut store,
        vec![part("P-1", "ELBOW", "1204.50"), part("P-2", "TEE", "6.00")],
        &config,
        false,
    )
    .unwrap();
    assert_eq!(again.summary.unchanged, 2);
    assert_eq!(again.summary.updated, 0);
}

#[test]
fn dry_run_leaves_database_untouched() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("catalog.db");
    let mut store = SqliteCatalog::open(&path).unwrap();

    let report = sync(&mut store, vec![part("P-1", "ELBOW", "1")], &SyncConfig::default(), true).unwrap();
    assert_eq!(report.summary.created, 1);
    assert_eq!(store.count(true).unwrap(), 0);
}

#[test]
fn soft_deleted_rows_stay_on_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("catalog.db");
    let config = SyncConfig::default();
    let mut store = SqliteCatalog::open(&path).unwrap();

    sync(&mut store, vec![part("P-1", "ELBOW", "1"), part("P-2", "TEE", "2")], &config, false).unwrap();
    let report = sync(&mut store, vec![part("P-1", "ELBOW", "1")], &config, false).unwrap();
    assert_eq!(report.deleted, vec!["P-2"]);

    let p2 = store.get("P-2").unwrap().unwrap();
    assert!(p2.deleted);
    assert!(p2.last_updated.is_some());
    assert_eq!(store.count(false).unwrap(), 1);
}
