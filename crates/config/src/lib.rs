// Configuration loading

pub mod settings;

pub use settings::{default_database_path, CatalogSettings, ConfigError, Settings};
