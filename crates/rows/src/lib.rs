//! `partline-rows`: ERP item row generation for heaters, tanks and pumps.
//!
//! Pure crate: takes typed equipment records, returns numbered rows.
//! No IO, no global state; numbering options travel in [`GeneratorConfig`].

pub mod error;
pub mod format;
pub mod golden;
pub mod job;
pub mod model;
pub mod numbering;
pub mod templates;

pub use error::RowsError;
pub use golden::{compare_rows, RowMismatch};
pub use job::{generate_job, JobBook, JobOutput, JobSheet};
pub use model::{EquipmentKind, EquipmentRecord, GeneratedRow, Heater, ProductType, Pump, Tank};
pub use numbering::{format_items, generate_rows, GeneratorConfig, SuffixStyle};
