//! SQL Dialect definitions and formatting rules.
//!
//! This module provides a trait-based abstraction for SQL dialect differences.
//! Each dialect implements `SqlDialect` to handle its specific syntax:
//!
//! - Identifier quoting: `"` (PG/DuckDB), `` ` `` (MySQL), applied only when
//!   an identifier is not a plain word
//! - Date arithmetic: `DATE_SUB(CURDATE(), INTERVAL n DAY)` vs
//!   `CURRENT_DATE - INTERVAL 'n days'`
//! - Calendar buckets: `YEARWEEK(x, 1)` vs `DATE_TRUNC('week', x)`
//!
//! # Usage
//!
//! ```ignore
//! use nlquery::sql::{Dialect, SqlDialect};
//!
//! let dialect = Dialect::MySql;
//! let quoted = dialect.quote_identifier("order");  // `order`
//! ```

mod duckdb;
pub mod helpers;
mod mysql;
mod postgres;

pub use duckdb::DuckDb;
pub use mysql::MySql;
pub use postgres::Postgres;

use serde::{Deserialize, Serialize};

use super::expr::{Expr, IntervalUnit};
use super::token::TokenStream;
use crate::planner::time::TimeWindow;

/// SQL dialect trait - defines how SQL constructs are rendered.
///
/// Implementations handle dialect-specific syntax differences.
/// The default implementations follow ANSI SQL where possible.
pub trait SqlDialect: std::fmt::Debug {
    /// Dialect name for display/logging.
    fn name(&self) -> &'static str;

    // =========================================================================
    // Identifier and Literal Quoting
    // =========================================================================

    /// Quote an identifier (table, column, alias) when it needs quoting.
    fn quote_identifier(&self, ident: &str) -> String;

    /// Quote a string literal.
    fn quote_string(&self, s: &str) -> String {
        helpers::quote_string_single(s)
    }

    // =========================================================================
    // Pagination
    // =========================================================================

    /// Emit LIMIT.
    fn emit_limit(&self, limit: u64) -> TokenStream {
        helpers::emit_limit_standard(limit)
    }

    // =========================================================================
    // Date/Time
    // =========================================================================

    /// The current date.
    fn emit_current_date(&self) -> TokenStream;

    /// The current timestamp.
    fn emit_current_timestamp(&self) -> TokenStream;

    /// An interval literal.
    fn emit_interval(&self, value: i64, unit: IntervalUnit) -> TokenStream;

    /// Build the predicate restricting `column` to a time window.
    fn time_window_predicate(&self, column: &str, window: TimeWindow) -> Expr;
}

/// Supported SQL dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    MySql,
    Postgres,
    DuckDb,
}

impl Dialect {
    /// Get the dialect implementation.
    pub fn dialect(&self) -> &'static dyn SqlDialect {
        match self {
            Dialect::MySql => &MySql,
            Dialect::Postgres => &Postgres,
            Dialect::DuckDb => &DuckDb,
        }
    }
}

// Implement SqlDialect for Dialect enum by delegating to concrete types
impl SqlDialect for Dialect {
    fn name(&self) -> &'static str {
        self.dialect().name()
    }

    fn quote_identifier(&self, ident: &str) -> String {
        self.dialect().quote_identifier(ident)
    }

    fn quote_string(&self, s: &str) -> String {
        self.dialect().quote_string(s)
    }

    fn emit_limit(&self, limit: u64) -> TokenStream {
        self.dialect().emit_limit(limit)
    }

    fn emit_current_date(&self) -> TokenStream {
        self.dialect().emit_current_date()
    }

    fn emit_current_timestamp(&self) -> TokenStream {
        self.dialect().emit_current_timestamp()
    }

    fn emit_interval(&self, value: i64, unit: IntervalUnit) -> TokenStream {
        self.dialect().emit_interval(value, unit)
    }

    fn time_window_predicate(&self, column: &str, window: TimeWindow) -> Expr {
        self.dialect().time_window_predicate(column, window)
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.dialect().name())
    }
}

impl std::str::FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mysql" => Ok(Dialect::MySql),
            "postgres" | "postgresql" => Ok(Dialect::Postgres),
            "duckdb" => Ok(Dialect::DuckDb),
            other => Err(format!("unsupported dialect: {other}")),
        }
    }
}
