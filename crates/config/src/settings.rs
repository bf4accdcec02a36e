// Application settings
// Loaded from ~/.config/partline/settings.toml

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use partline_catalog::{SearchDefaults, SyncConfig};
use partline_rows::GeneratorConfig;

#[derive(Debug)]
pub enum ConfigError {
    Read { path: PathBuf, source: std::io::Error },
    Parse { path: Option<PathBuf>, message: String },
    Write { path: PathBuf, message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, source } => write!(f, "cannot read {}: {}", path.display(), source),
            Self::Parse { path: Some(path), message } => {
                write!(f, "invalid settings in {}: {}", path.display(), message)
            }
            Self::Parse { path: None, message } => write!(f, "invalid settings: {}", message),
            Self::Write { path, message } => write!(f, "cannot write {}: {}", path.display(), message),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Catalog database file. None = `default_database_path()`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<PathBuf>,
}

impl CatalogSettings {
    pub fn database_path(&self) -> PathBuf {
        self.database.clone().unwrap_or_else(default_database_path)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub generator: GeneratorConfig,
    pub sync: SyncConfig,
    pub search: SearchDefaults,
    pub catalog: CatalogSettings,
}

fn config_dir() -> PathBuf {
    dirs::config_dir().unwrap_or_else(|| PathBuf::from(".")).join("partline")
}

/// `partline/catalog.db` under the platform data directory.
pub fn default_database_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("partline")
        .join("catalog.db")
}

const DEFAULT_FILE: &str = r#"# partline settings

[generator]
# "dash" numbers precut rows {job}-{dash}-A, "dotted" uses {job}-{dash}.{n}-A
suffix_style = "dash"
# Dash number for equipment entered without one
default_dash = "01"

[sync]
# Snapshot column holding the item number (normalized: lowercase, spaces to _)
key_field = "item_number"

[search]
per_page = 20
suggestion_limit = 10

[catalog]
# database = "/path/to/catalog.db"
"#;

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        config_dir().join("settings.toml")
    }

    /// Load from the default location; a missing file means defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path();
        if !path.exists() {
            log::debug!("no settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load from an explicit path, which must exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        let settings = Self::from_toml(&contents).map_err(|e| match e {
            ConfigError::Parse { message, .. } => {
                ConfigError::Parse { path: Some(path.to_path_buf()), message }
            }
            other => other,
        })?;
        log::debug!("loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse { path: None, message: e.to_string() })
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse { path: None, message: e.to_string() })
    }

    /// Write the commented default file unless one already exists.
    /// Returns whether a file was written.
    pub fn write_default_file(path: &Path) -> Result<bool, ConfigError> {
        if path.exists() {
            return Ok(false);
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::Write { path: parent.to_path_buf(), message: e.to_string() })?;
        }
        fs::write(path, DEFAULT_FILE)
            .map_err(|e| ConfigError::Write { path: path.to_path_buf(), message: e.to_string() })?;
        log::info!("wrote default settings to {}", path.display());
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use partline_rows::SuffixStyle;

    #[test]
    fn empty_file_is_all_defaults() {
        assert_eq!(Settings::from_toml("").unwrap(), Settings::default());
    }

    #[test]
    fn partial_sections_fill_in() {
        let settings = Settings::from_toml(
            r#"
            [generator]
            suffix_style = "dotted"

            [search]
            per_page = 50
            "#,
        )
        .unwrap();
        assert_eq!(settings.generator.suffix_style, SuffixStyle::Dotted);
        assert_eq!(settings.generator.default_dash, "01");
        assert_eq!(settings.search.per_page, 50);
        assert_eq!(settings.search.suggestion_limit, 10);
        assert_eq!(settings.sync.key_field, "item_number");
        assert!(settings.catalog.database.is_none());
    }

    #[test]
    fn default_file_parses_to_defaults() {
        assert_eq!(Settings::from_toml(DEFAULT_FILE).unwrap(), Settings::default());
    }

    #[test]
    fn bad_value_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(&path, "[generator]\nsuffix_style = \"sideways\"\n").unwrap();

        let err = Settings::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { path: Some(ref p), .. } if p == &path));
        assert!(err.to_string().contains("settings.toml"));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::load_from(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn write_default_file_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.toml");
        assert!(Settings::write_default_file(&path).unwrap());
        assert!(!Settings::write_default_file(&path).unwrap());
        assert_eq!(Settings::load_from(&path).unwrap(), Settings::default());
    }

    #[test]
    fn serialized_settings_reload() {
        let mut settings = Settings::default();
        settings.catalog.database = Some(PathBuf::from("/tmp/parts.db"));
        settings.generator.suffix_style = SuffixStyle::Dotted;
        let text = settings.to_toml().unwrap();
        assert_eq!(Settings::from_toml(&text).unwrap(), settings);
    }
}
