//! MySQL SQL dialect.
//!
//! MySQL differences from ANSI:
//! - Backtick identifier quoting (`` `name` ``)
//! - `CURDATE()` / `NOW()` instead of `CURRENT_DATE` / `CURRENT_TIMESTAMP`
//! - Date arithmetic through `DATE_SUB(x, INTERVAL n UNIT)`
//! - ISO week buckets through `YEARWEEK(x, 1)`

use super::helpers;
use super::SqlDialect;
use crate::planner::time::TimeWindow;
use crate::sql::expr::{Expr, IntervalUnit};
use crate::sql::token::{Token, TokenStream};

/// MySQL SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct MySql;

impl SqlDialect for MySql {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_backtick(ident)
    }

    fn emit_current_date(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.push(Token::FunctionName("CURDATE".into())).lparen().rparen();
        ts
    }

    fn emit_current_timestamp(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.push(Token::FunctionName("NOW".into())).lparen().rparen();
        ts
    }

    fn emit_interval(&self, value: i64, unit: IntervalUnit) -> TokenStream {
        helpers::emit_interval_bare(value, unit)
    }

    fn time_window_predicate(&self, column: &str, window: TimeWindow) -> Expr {
        helpers::time_window_mysql(column, window)
    }
}
