//! Configuration loading for nlquery.
//!
//! A configuration file is either JSON (`.json`) or TOML (`.toml`). Both are
//! normalized to the same document shape before the sections are read.
//!
//! Example configuration:
//! ```json
//! {
//!   "entity_mappings": {
//!     "_comment": "business term -> table",
//!     "people": { "用户": "users", "会员": "members" },
//!     "sales": { "订单": "orders" }
//!   },
//!   "time_field_mappings": { "orders": "order_time" },
//!   "custom_query_patterns": {
//!     "examples": { "avg": "(平均|均值|人均)" }
//!   },
//!   "planner": { "dialect": "postgres", "safety_limit": 200 }
//! }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::mappings::{custom_patterns, EntityMapping, TimeFieldMapping};
use crate::sql::Dialect;

/// Environment variable naming an explicit configuration file.
pub const CONFIG_ENV_VAR: &str = "NLQUERY_CONFIG";

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse JSON config: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Failed to parse TOML config: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Unsupported config format (expected .json or .toml): {0}")]
    UnsupportedFormat(PathBuf),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for settings operations.
pub type SettingsResult<T> = Result<T, SettingsError>;

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Settings {
    /// Business term -> table shortcuts.
    pub entity_mappings: EntityMapping,

    /// Per-table timestamp column.
    pub time_field_mappings: TimeFieldMapping,

    /// Rule name -> pattern overrides.
    pub custom_patterns: Vec<(String, String)>,

    /// Planner tunables.
    pub planner: PlannerSettings,
}

/// Planner tunables.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PlannerSettings {
    /// Dialect the SQL is rendered in.
    pub dialect: Dialect,

    /// Time column used when a table has no time-field mapping.
    pub default_time_field: String,

    /// LIMIT for listing requests without an explicit page size.
    pub default_page_size: u64,

    /// LIMIT for plain projections.
    pub safety_limit: u64,

    /// Column cap for listing projections.
    pub listing_column_cap: usize,

    /// Column cap for default projections.
    pub default_column_cap: usize,

    /// Secondary matches must score above this to be reported as related.
    pub related_score_threshold: f64,

    /// Related tables are only reported when the primary scores below this.
    pub related_primary_ceiling: f64,
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self {
            dialect: Dialect::MySql,
            default_time_field: "created_at".to_string(),
            default_page_size: 10_000,
            safety_limit: 100,
            listing_column_cap: 10,
            default_column_cap: 5,
            related_score_threshold: 0.3,
            related_primary_ceiling: 0.8,
        }
    }
}

impl Settings {
    /// Load settings from a JSON or TOML file, chosen by extension.
    pub fn from_file<P: AsRef<Path>>(path: P) -> SettingsResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        let settings = match extension.as_deref() {
            Some("json") => Self::from_json_str(&content)?,
            Some("toml") => Self::from_toml_str(&content)?,
            _ => return Err(SettingsError::UnsupportedFormat(path.to_path_buf())),
        };

        debug!(
            path = %path.display(),
            entities = settings.entity_mappings.len(),
            time_fields = settings.time_field_mappings.len(),
            patterns = settings.custom_patterns.len(),
            "loaded settings"
        );
        Ok(settings)
    }

    pub fn from_json_str(content: &str) -> SettingsResult<Self> {
        let document: Value = serde_json::from_str(content)?;
        Self::from_document(&document)
    }

    pub fn from_toml_str(content: &str) -> SettingsResult<Self> {
        let table: toml::Table = toml::from_str(content)?;
        let document = serde_json::to_value(&table)?;
        Self::from_document(&document)
    }

    /// Read every section from a parsed document.
    ///
    /// Mapping sections degrade to empty when malformed. The `planner`
    /// section is typed, so a bad value there is an error.
    pub fn from_document(document: &Value) -> SettingsResult<Self> {
        if !document.is_object() {
            return Err(SettingsError::InvalidConfig(
                "top level must be an object".to_string(),
            ));
        }
        let planner = match document.get("planner") {
            Some(value) => serde_json::from_value(value.clone())
                .map_err(|e| SettingsError::InvalidConfig(format!("planner: {e}")))?,
            None => PlannerSettings::default(),
        };

        Ok(Self {
            entity_mappings: EntityMapping::from_config(section(document, "entity_mappings")),
            time_field_mappings: TimeFieldMapping::from_config(section(document, "time_field_mappings")),
            custom_patterns: custom_patterns(section(document, "custom_query_patterns")),
            planner,
        })
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `NLQUERY_CONFIG`
    /// 2. `./nlquery.json`, then `./nlquery.toml`
    /// 3. `<config dir>/nlquery/config.json`, then `config.toml`
    ///
    /// Falls back to defaults when no file exists.
    pub fn load() -> SettingsResult<Self> {
        match Self::locate() {
            Some(path) => Self::from_file(path),
            None => Ok(Settings::default()),
        }
    }

    /// The file [`Settings::load`] would read, if any.
    pub fn locate() -> Option<PathBuf> {
        if let Ok(path) = env::var(CONFIG_ENV_VAR) {
            return Some(PathBuf::from(path));
        }

        let local = ["nlquery.json", "nlquery.toml"]
            .into_iter()
            .map(PathBuf::from)
            .find(|p| p.exists());
        if local.is_some() {
            return local;
        }

        let config_dir = dirs::config_dir()?.join("nlquery");
        ["config.json", "config.toml"]
            .into_iter()
            .map(|name| config_dir.join(name))
            .find(|p| p.exists())
    }
}

fn section<'a>(document: &'a Value, name: &str) -> &'a Value {
    static MISSING: Value = Value::Null;
    document.get(name).unwrap_or(&MISSING)
}
