//! `partline sync`, `partline search`, `partline suggest`: catalog commands
//! against the SQLite store.

use std::path::{Path, PathBuf};

use partline_catalog::search::{SearchHit, Suggestion};
use partline_catalog::{
    search, suggest, sync, CatalogError, CatalogStore, SearchColumn, SearchPage, SearchQuery,
    SyncReport,
};
use partline_config::Settings;
use partline_store::SqliteCatalog;

use crate::exit_codes::{catalog_exit_code, EXIT_CATALOG_STORE};
use crate::snapshot::load_snapshot;
use crate::util::{render_table, truncate_display};
use crate::CliError;

const MAX_COLUMN_WIDTH: usize = 48;

fn catalog_err(err: CatalogError) -> CliError {
    let hint = match &err {
        CatalogError::Conflict { .. } => Some("the catalog changed during sync; run it again".to_string()),
        CatalogError::Store(_) => None,
    };
    CliError { code: catalog_exit_code(&err), message: err.to_string(), hint }
}

/// `--db`, then `[catalog] database`, then the platform data directory.
fn database_path(db: Option<PathBuf>, settings: &Settings) -> PathBuf {
    db.unwrap_or_else(|| settings.catalog.database_path())
}

fn open_store(path: &Path) -> Result<SqliteCatalog, CliError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| CliError {
            code: EXIT_CATALOG_STORE,
            message: format!("cannot create {}: {e}", parent.display()),
            hint: None,
        })?;
    }
    SqliteCatalog::open(path).map_err(catalog_err)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), CliError> {
    let out = serde_json::to_string_pretty(value).map_err(|e| CliError::generic(e.to_string()))?;
    println!("{out}");
    Ok(())
}

// ============================================================================
// sync
// ============================================================================

pub fn cmd_sync(
    snapshot: PathBuf,
    db: Option<PathBuf>,
    dry_run: bool,
    json: bool,
    settings: &Settings,
) -> Result<(), CliError> {
    let records = load_snapshot(&snapshot)?;
    let db_path = database_path(db, settings);
    let mut store = open_store(&db_path)?;

    let report = sync(&mut store, records, &settings.sync, dry_run).map_err(catalog_err)?;

    if json {
        return print_json(&report);
    }
    print_sync_summary(&report, &db_path);
    Ok(())
}

fn print_sync_summary(report: &SyncReport, db_path: &Path) {
    let s = &report.summary;
    let prefix = if s.dry_run { "dry run, would apply" } else { "synced" };
    println!(
        "{prefix}: {} created, {} updated, {} marked deleted, {} unchanged, {} skipped",
        s.created, s.updated, s.deleted, s.unchanged, s.skipped
    );
    for skipped in &report.skipped {
        match &skipped.key {
            Some(key) => println!("  skipped row {} ('{key}'): {}", skipped.row, skipped.reason),
            None => println!("  skipped row {}: {}", skipped.row, skipped.reason),
        }
    }
    eprintln!("catalog: {}", db_path.display());
}

// ============================================================================
// search
// ============================================================================

pub fn cmd_search(
    text: String,
    columns: Vec<SearchColumn>,
    page: usize,
    per_page: Option<usize>,
    db: Option<PathBuf>,
    json: bool,
    settings: &Settings,
) -> Result<(), CliError> {
    let store = open_store(&database_path(db, settings))?;
    let entries = store.load_entries().map_err(catalog_err)?;

    let mut query = SearchQuery::new(text, &settings.search);
    query.columns = columns;
    query.page = page;
    if let Some(n) = per_page {
        query.per_page = n;
    }
    let result = search(entries.values(), &query);

    if json {
        return print_json(&result);
    }
    print_search_page(&result);
    Ok(())
}

fn hit_row(hit: &SearchHit) -> Vec<String> {
    vec![
        hit.item_number.clone(),
        hit.fields.description.clone(),
        hit.fields.size.clone(),
        hit.fields.vendor_name.clone(),
        hit.fields.unit_cost.map(|c| format!("{c:.2}")).unwrap_or_default(),
    ]
}

fn print_search_page(result: &SearchPage) {
    if result.total == 0 {
        println!("no matches for '{}'", result.query);
        return;
    }
    let rows: Vec<Vec<String>> = result.results.iter().map(hit_row).collect();
    print!(
        "{}",
        render_table(&["Item Number", "Description", "Size", "Vendor", "Unit Cost"], &rows, MAX_COLUMN_WIDTH)
    );
    println!(
        "page {}/{} ({} matches)",
        result.page, result.total_pages, result.total
    );
}

// ============================================================================
// suggest
// ============================================================================

pub fn cmd_suggest(
    text: String,
    limit: Option<usize>,
    db: Option<PathBuf>,
    json: bool,
    settings: &Settings,
) -> Result<(), CliError> {
    let store = open_store(&database_path(db, settings))?;
    let entries = store.load_entries().map_err(catalog_err)?;
    let limit = limit.unwrap_or(settings.search.suggestion_limit);
    let suggestions = suggest(entries.values(), &text, limit);

    if json {
        return print_json(&suggestions);
    }
    for Suggestion { item_number, description } in &suggestions {
        println!("{item_number}  {}", truncate_display(description, 80));
    }
    Ok(())
}
