//! # nlquery
//!
//! Turns short free-text reporting questions (e.g. "最近7天新增用户数") into a
//! single aggregate SQL statement against a schema it has never seen, using
//! rules rather than a domain model.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │        Settings (entity / time-field mappings,          │
//! │        custom patterns, planner tunables)               │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [rules]
//! ┌─────────────────────────────────────────────────────────┐
//! │   RuleSet (defaults overlaid by custom patterns)        │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [planner]  ◄── SchemaProvider
//! ┌─────────────────────────────────────────────────────────┐
//! │   resolve → intent (+ time) → synthesize → classify     │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [sql]
//! ┌─────────────────────────────────────────────────────────┐
//! │   QueryPlan { sql_query, chart_type, ... }              │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use nlquery::prelude::*;
//!
//! let schema = SchemaSnapshot::new(vec![
//!     TableSchema::new("users", ["id", "name", "created_at"]),
//! ]);
//! let settings = Settings {
//!     entity_mappings: EntityMapping::new([("用户", "users")]),
//!     ..Default::default()
//! };
//! let parser = QueryParser::new(schema, settings);
//!
//! let plan = parser.parse_query("今天的用户注册量").unwrap();
//! assert_eq!(
//!     plan.sql_query,
//!     "SELECT COUNT(*) AS count_value FROM users WHERE DATE(created_at) = CURDATE()"
//! );
//! assert_eq!(plan.chart_type, ChartType::SingleValue);
//! ```

pub mod config;
pub mod metadata;
pub mod pipeline;
pub mod planner;
pub mod rules;
pub mod sql;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::config::{EntityMapping, PlannerSettings, Settings, TimeFieldMapping};
    pub use crate::metadata::{SchemaProvider, SchemaSnapshot, TableSchema};
    pub use crate::pipeline::{PlanError, PlanReport, QueryParser, QueryPlan};
    pub use crate::planner::{ChartType, QueryIntent, TableMatch, TimeCondition, TimeWindow};
    pub use crate::rules::RuleSet;
    pub use crate::sql::Dialect;
}

pub use pipeline::{PlanError, PlanReport, QueryParser, QueryPlan};
pub use sql::Dialect;
