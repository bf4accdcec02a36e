//! `partline-store`: SQLite-backed [`CatalogStore`](partline_catalog::CatalogStore).

pub mod sqlite;

pub use sqlite::SqliteCatalog;
