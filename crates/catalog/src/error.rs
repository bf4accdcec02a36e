use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// Persistence failed; nothing from the batch was applied.
    Store(String),
    /// Plan does not fit the stored catalog (e.g. create of a key that exists).
    Conflict { key: String, reason: &'static str },
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Store(msg) => write!(f, "catalog store error: {msg}"),
            Self::Conflict { key, reason } => write!(f, "catalog conflict on '{key}': {reason}"),
        }
    }
}

impl std::error::Error for CatalogError {}
