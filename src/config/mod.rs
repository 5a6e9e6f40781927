//! Configuration module for nlquery.
//!
//! Handles config file discovery, the entity / time-field mappings and the
//! planner tunables.

mod mappings;
mod settings;

pub use mappings::{custom_patterns, EntityMapping, TimeFieldMapping, COMMENT_MARKER};
pub use settings::{
    PlannerSettings, Settings, SettingsError, SettingsResult, CONFIG_ENV_VAR,
};
