use std::fmt;

use crate::model::EquipmentKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowsError {
    /// A record with the same (job, kind, dash) is already registered.
    DuplicateDash {
        job_number: String,
        kind: EquipmentKind,
        dash: String,
    },
    /// Record carries an empty job number.
    MissingJobNumber,
}

impl fmt::Display for RowsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateDash { job_number, kind, dash } => {
                write!(f, "job '{job_number}': {kind} dash '{dash}' already exists")
            }
            Self::MissingJobNumber => write!(f, "record has no job number"),
        }
    }
}

impl std::error::Error for RowsError {}
