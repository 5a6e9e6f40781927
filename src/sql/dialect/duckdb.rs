//! DuckDB SQL dialect.
//!
//! DuckDB is PostgreSQL-compatible for everything the synthesizer emits:
//! - ANSI identifier quoting (`"`)
//! - `CURRENT_DATE`, `NOW()` and quoted intervals
//! - `DATE_TRUNC` calendar buckets

use super::helpers;
use super::SqlDialect;
use crate::planner::time::TimeWindow;
use crate::sql::expr::{Expr, IntervalUnit};
use crate::sql::token::{Token, TokenStream};

/// DuckDB SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct DuckDb;

impl SqlDialect for DuckDb {
    fn name(&self) -> &'static str {
        "duckdb"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_double(ident)
    }

    fn emit_current_date(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.push(Token::Keyword("CURRENT_DATE"));
        ts
    }

    fn emit_current_timestamp(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.push(Token::FunctionName("NOW".into())).lparen().rparen();
        ts
    }

    fn emit_interval(&self, value: i64, unit: IntervalUnit) -> TokenStream {
        helpers::emit_interval_quoted(value, unit)
    }

    fn time_window_predicate(&self, column: &str, window: TimeWindow) -> Expr {
        helpers::time_window_ansi(column, window)
    }
}
