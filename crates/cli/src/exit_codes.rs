//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract: scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain           | Description                              |
//! |---------|------------------|------------------------------------------|
//! | 0       | Universal        | Success                                  |
//! | 1       | Universal        | General error (unspecified)              |
//! | 2       | Universal        | CLI usage error (bad args, missing file) |
//! | 3-9     | generate         | Row generation and golden comparison     |
//! | 10-19   | catalog          | Snapshot input, store and sync codes     |
//! | 20-29   | config           | Settings file codes                      |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

use partline_catalog::CatalogError;

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing input file.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Generate (3-9)
// =============================================================================

/// Generated rows differ from the `--expect` reference.
pub const EXIT_GENERATE_MISMATCH: u8 = 3;

/// Job sheet or reference file is not valid JSON for its shape.
pub const EXIT_GENERATE_PARSE: u8 = 4;

// =============================================================================
// Catalog (10-19)
// =============================================================================

/// Snapshot file could not be parsed (bad CSV, JSON not an array of objects).
pub const EXIT_CATALOG_SNAPSHOT: u8 = 10;

/// Database could not be opened, read or written. Nothing was applied.
pub const EXIT_CATALOG_STORE: u8 = 11;

/// Plan disagreed with the stored catalog (concurrent writer). Nothing was applied.
pub const EXIT_CATALOG_CONFLICT: u8 = 12;

// =============================================================================
// Config (20-29)
// =============================================================================

/// Settings file unreadable or invalid.
pub const EXIT_CONFIG: u8 = 20;

/// Map a CatalogError to its exit code.
pub fn catalog_exit_code(err: &CatalogError) -> u8 {
    match err {
        CatalogError::Store(_) => EXIT_CATALOG_STORE,
        CatalogError::Conflict { .. } => EXIT_CATALOG_CONFLICT,
    }
}
