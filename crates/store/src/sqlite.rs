// Parts catalog in a single SQLite table

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction};

use partline_catalog::{CatalogEntry, CatalogError, CatalogStore, PartFields, SyncPlan};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS parts (
    item_number TEXT PRIMARY KEY,
    description TEXT NOT NULL DEFAULT '',
    size TEXT NOT NULL DEFAULT '',
    product_group_id TEXT NOT NULL DEFAULT '',
    unit_cost REAL,
    unit_cost_date TEXT,                 -- YYYY-MM-DD
    vendor_name TEXT NOT NULL DEFAULT '',
    vendor_product_number TEXT NOT NULL DEFAULT '',
    vendor_product_description TEXT NOT NULL DEFAULT '',
    vendor_phone TEXT NOT NULL DEFAULT '',
    content_hash TEXT NOT NULL,
    is_deleted INTEGER NOT NULL DEFAULT 0,
    last_updated TEXT                    -- RFC 3339, UTC
);

CREATE INDEX IF NOT EXISTS parts_last_updated ON parts (last_updated);
"#;

const SELECT_COLUMNS: &str = "item_number, description, size, product_group_id, unit_cost, \
    unit_cost_date, vendor_name, vendor_product_number, vendor_product_description, \
    vendor_phone, content_hash, is_deleted, last_updated";

const DATE_FORMAT: &str = "%Y-%m-%d";

fn store_err(e: impl std::fmt::Display) -> CatalogError {
    CatalogError::Store(e.to_string())
}

pub struct SqliteCatalog {
    conn: Connection,
}

impl SqliteCatalog {
    /// Open (or create) a catalog database file.
    pub fn open(path: &Path) -> Result<Self, CatalogError> {
        let conn = Connection::open(path).map_err(store_err)?;
        log::debug!("opened catalog {}", path.display());
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self, CatalogError> {
        Self::init(Connection::open_in_memory().map_err(store_err)?)
    }

    fn init(conn: Connection) -> Result<Self, CatalogError> {
        conn.execute_batch(SCHEMA).map_err(store_err)?;
        Ok(Self { conn })
    }

    /// Look up one entry, deleted or not.
    pub fn get(&self, key: &str) -> Result<Option<CatalogEntry>, CatalogError> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM parts WHERE item_number = ?1");
        self.conn
            .query_row(&sql, params![key], read_row)
            .optional()
            .map_err(store_err)?
            .map(decode)
            .transpose()
    }

    pub fn count(&self, include_deleted: bool) -> Result<usize, CatalogError> {
        let sql = if include_deleted {
            "SELECT COUNT(*) FROM parts"
        } else {
            "SELECT COUNT(*) FROM parts WHERE is_deleted = 0"
        };
        let n: i64 = self.conn.query_row(sql, [], |r| r.get(0)).map_err(store_err)?;
        Ok(n as usize)
    }
}

// ---------------------------------------------------------------------------
// Row mapping
// ---------------------------------------------------------------------------

/// Columns as stored, before date parsing.
struct StoredRow {
    key: String,
    description: String,
    size: String,
    product_group_id: String,
    unit_cost: Option<f64>,
    unit_cost_date: Option<String>,
    vendor_name: String,
    vendor_product_number: String,
    vendor_product_description: String,
    vendor_phone: String,
    content_hash: String,
    deleted: bool,
    last_updated: Option<String>,
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<StoredRow> {
    Ok(StoredRow {
        key: row.get(0)?,
        description: row.get(1)?,
        size: row.get(2)?,
        product_group_id: row.get(3)?,
        unit_cost: row.get(4)?,
        unit_cost_date: row.get(5)?,
        vendor_name: row.get(6)?,
        vendor_product_number: row.get(7)?,
        vendor_product_description: row.get(8)?,
        vendor_phone: row.get(9)?,
        content_hash: row.get(10)?,
        deleted: row.get::<_, i64>(11)? != 0,
        last_updated: row.get(12)?,
    })
}

fn decode(row: StoredRow) -> Result<CatalogEntry, CatalogError> {
    let unit_cost_date = row
        .unit_cost_date
        .as_deref()
        .map(|d| NaiveDate::parse_from_str(d, DATE_FORMAT))
        .transpose()
        .map_err(|e| store_err(format!("'{}': bad unit_cost_date: {e}", row.key)))?;
    let last_updated = row
        .last_updated
        .as_deref()
        .map(DateTime::parse_from_rfc3339)
        .transpose()
        .map_err(|e| store_err(format!("'{}': bad last_updated: {e}", row.key)))?
        .map(|dt| dt.with_timezone(&Utc));

    Ok(CatalogEntry {
        key: row.key,
        fields: PartFields {
            description: row.description,
            size: row.size,
            product_group_id: row.product_group_id,
            unit_cost: row.unit_cost,
            unit_cost_date,
            vendor_name: row.vendor_name,
            vendor_product_number: row.vendor_product_number,
            vendor_product_description: row.vendor_product_description,
            vendor_phone: row.vendor_phone,
        },
        content_hash: row.content_hash,
        deleted: row.deleted,
        last_updated,
    })
}

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

fn insert_entry(tx: &Transaction<'_>, entry: &CatalogEntry, at: &str) -> Result<(), CatalogError> {
    let f = &entry.fields;
    tx.execute(
        "INSERT INTO parts (item_number, description, size, product_group_id, unit_cost, \
         unit_cost_date, vendor_name, vendor_product_number, vendor_product_description, \
         vendor_phone, content_hash, is_deleted, last_updated) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, 0, ?12)",
        params![
            entry.key,
            f.description,
            f.size,
            f.product_group_id,
            f.unit_cost,
            f.unit_cost_date.map(|d| d.format(DATE_FORMAT).to_string()),
            f.vendor_name,
            f.vendor_product_number,
            f.vendor_product_description,
            f.vendor_phone,
            entry.content_hash,
            at,
        ],
    )
    .map_err(|e| store_err(format!("insert '{}': {e}", entry.key)))?;
    Ok(())
}

fn update_entry(tx: &Transaction<'_>, entry: &CatalogEntry, at: &str) -> Result<(), CatalogError> {
    let f = &entry.fields;
    let changed = tx
        .execute(
            "UPDATE parts SET description = ?2, size = ?3, product_group_id = ?4, unit_cost = ?5, \
             unit_cost_date = ?6, vendor_name = ?7, vendor_product_number = ?8, \
             vendor_product_description = ?9, vendor_phone = ?10, content_hash = ?11, \
             is_deleted = 0, last_updated = ?12 \
             WHERE item_number = ?1",
            params![
                entry.key,
                f.description,
                f.size,
                f.product_group_id,
                f.unit_cost,
                f.unit_cost_date.map(|d| d.format(DATE_FORMAT).to_string()),
                f.vendor_name,
                f.vendor_product_number,
                f.vendor_product_description,
                f.vendor_phone,
                entry.content_hash,
                at,
            ],
        )
        .map_err(|e| store_err(format!("update '{}': {e}", entry.key)))?;
    if changed == 0 {
        return Err(CatalogError::Conflict { key: entry.key.clone(), reason: "update of unknown key" });
    }
    Ok(())
}

fn mark_deleted(tx: &Transaction<'_>, key: &str, at: &str) -> Result<(), CatalogError> {
    let changed = tx
        .execute(
            "UPDATE parts SET is_deleted = 1, last_updated = ?2 WHERE item_number = ?1",
            params![key, at],
        )
        .map_err(|e| store_err(format!("delete '{key}': {e}")))?;
    if changed == 0 {
        return Err(CatalogError::Conflict { key: key.to_string(), reason: "delete of unknown key" });
    }
    Ok(())
}

impl CatalogStore for SqliteCatalog {
    fn load_entries(&self) -> Result<BTreeMap<String, CatalogEntry>, CatalogError> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM parts ORDER BY item_number");
        let mut stmt = self.conn.prepare(&sql).map_err(store_err)?;
        let rows = stmt.query_map([], read_row).map_err(store_err)?;

        let mut entries = BTreeMap::new();
        for row in rows {
            let entry = decode(row.map_err(store_err)?)?;
            entries.insert(entry.key.clone(), entry);
        }
        Ok(entries)
    }

    /// One transaction for the whole plan; any failure rolls it back.
    fn apply(&mut self, plan: &SyncPlan, at: DateTime<Utc>) -> Result<(), CatalogError> {
        let at = at.to_rfc3339();
        // Dropping the transaction without commit rolls back.
        let tx = self.conn.transaction().map_err(store_err)?;

        for entry in &plan.to_create {
            insert_entry(&tx, entry, &at)?;
        }
        for entry in &plan.to_update {
            update_entry(&tx, entry, &at)?;
        }
        for key in &plan.to_mark_deleted {
            mark_deleted(&tx, key, &at)?;
        }

        tx.commit().map_err(store_err)?;
        log::debug!(
            "committed {} creates, {} updates, {} soft deletes",
            plan.to_create.len(),
            plan.to_update.len(),
            plan.to_mark_deleted.len()
        );
        Ok(())
    }
}
