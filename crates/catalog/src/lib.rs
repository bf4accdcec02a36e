//! `partline-catalog`: parts catalog sync engine.
//!
//! Reconciles an external snapshot against the stored catalog using content
//! hashes, applies the result through a [`CatalogStore`] in one atomic step,
//! and searches the synced entries. No file or database code lives here.

pub mod error;
pub mod hash;
pub mod model;
pub mod reconcile;
pub mod search;
pub mod store;
pub mod sync;

pub use error::CatalogError;
pub use model::{CatalogEntry, PartFields, RawRecord, SyncPlan, SyncSummary};
pub use reconcile::{reconcile, SyncConfig};
pub use search::{search, suggest, SearchColumn, SearchDefaults, SearchPage, SearchQuery};
pub use store::{CatalogStore, MemoryCatalog};
pub use sync::{sync, SyncReport};
