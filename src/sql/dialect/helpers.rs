//! Shared helper functions for SQL dialect implementations.
//!
//! This module provides reusable building blocks that dialects can compose
//! to implement the `SqlDialect` trait with minimal duplication.

use super::super::expr::{cast, col, func, interval, lit_str, Expr, ExprExt, IntervalUnit};
use super::super::token::{Token, TokenStream};
use crate::planner::time::TimeWindow;

// =============================================================================
// Identifier Quoting
// =============================================================================

/// Words that must never appear as bare identifiers.
const RESERVED: &[&str] = &[
    "all", "and", "as", "asc", "by", "case", "desc", "distinct", "from", "group", "having",
    "in", "index", "interval", "join", "key", "limit", "not", "offset", "on", "or", "order",
    "select", "table", "union", "user", "where",
];

/// Whether an identifier can be emitted without quotes.
pub fn is_plain_identifier(ident: &str) -> bool {
    let mut chars = ident.chars();
    let starts_ok = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_');
    starts_ok
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !RESERVED.contains(&ident.to_ascii_lowercase().as_str())
}

/// Quote identifier with double quotes when needed (ANSI style).
/// Used by: Postgres, DuckDB
pub fn quote_double(ident: &str) -> String {
    if is_plain_identifier(ident) {
        return ident.to_string();
    }
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Quote identifier with backticks when needed.
/// Used by: MySQL
pub fn quote_backtick(ident: &str) -> String {
    if is_plain_identifier(ident) {
        return ident.to_string();
    }
    format!("`{}`", ident.replace('`', "``"))
}

// =============================================================================
// String Quoting
// =============================================================================

/// Quote string with single quotes (standard SQL).
pub fn quote_string_single(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

// =============================================================================
// Pagination
// =============================================================================

/// Emit `LIMIT n` (standard SQL).
///
/// Row counts beyond `i64::MAX` are clamped; no supported engine accepts a
/// larger signed LIMIT.
pub fn emit_limit_standard(limit: u64) -> TokenStream {
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    let mut ts = TokenStream::new();
    ts.push(Token::Limit).space().push(Token::LitInt(limit));
    ts
}

// =============================================================================
// Date/Time
// =============================================================================

/// `INTERVAL '7 days'` (Postgres, DuckDB).
pub fn emit_interval_quoted(value: i64, unit: IntervalUnit) -> TokenStream {
    let unit = match (unit, value == 1) {
        (IntervalUnit::Day, true) => "day",
        (IntervalUnit::Day, false) => "days",
        (IntervalUnit::Week, true) => "week",
        (IntervalUnit::Week, false) => "weeks",
        (IntervalUnit::Month, true) => "month",
        (IntervalUnit::Month, false) => "months",
    };
    let mut ts = TokenStream::new();
    ts.push(Token::Interval)
        .space()
        .push(Token::LitString(format!("{value} {unit}")));
    ts
}

/// `INTERVAL 7 DAY` (MySQL).
pub fn emit_interval_bare(value: i64, unit: IntervalUnit) -> TokenStream {
    let unit = match unit {
        IntervalUnit::Day => "DAY",
        IntervalUnit::Week => "WEEK",
        IntervalUnit::Month => "MONTH",
    };
    let mut ts = TokenStream::new();
    ts.push(Token::Interval)
        .space()
        .push(Token::LitInt(value))
        .space()
        .push(Token::Keyword(unit));
    ts
}

/// Time window predicates in MySQL spelling.
pub fn time_window_mysql(column: &str, window: TimeWindow) -> Expr {
    let days_ago = |n: i64| {
        func(
            "DATE_SUB",
            vec![Expr::CurrentDate, interval(n, IntervalUnit::Day)],
        )
    };
    let now_minus = |n: i64, unit: IntervalUnit| {
        func("DATE_SUB", vec![Expr::CurrentTimestamp, interval(n, unit)])
    };
    let date_of = |e: Expr| func("DATE", vec![e]);
    let yearweek = |e: Expr| func("YEARWEEK", vec![e, 1i64.into()]);
    let month_and_year = |anchor: Expr| {
        func("MONTH", vec![col(column)])
            .eq(func("MONTH", vec![anchor.clone()]))
            .and(func("YEAR", vec![col(column)]).eq(func("YEAR", vec![anchor])))
    };
    let month_ago = func(
        "DATE_SUB",
        vec![Expr::CurrentDate, interval(1, IntervalUnit::Month)],
    );

    match window {
        TimeWindow::LastDays(n) => date_of(col(column)).gte(days_ago(i64::from(n))),
        TimeWindow::LastWeeks(n) => col(column).gte(now_minus(i64::from(n), IntervalUnit::Week)),
        TimeWindow::LastMonths(n) => col(column).gte(now_minus(i64::from(n), IntervalUnit::Month)),
        TimeWindow::Today => date_of(col(column)).eq(Expr::CurrentDate),
        TimeWindow::Yesterday => date_of(col(column)).eq(days_ago(1)),
        TimeWindow::ThisWeek => yearweek(col(column)).eq(yearweek(Expr::CurrentDate)),
        TimeWindow::LastWeek => yearweek(col(column)).eq(yearweek(func(
            "DATE_SUB",
            vec![Expr::CurrentDate, interval(1, IntervalUnit::Week)],
        ))),
        TimeWindow::ThisMonth => month_and_year(Expr::CurrentDate),
        TimeWindow::LastMonth => month_and_year(month_ago),
        TimeWindow::ThisYear => {
            func("YEAR", vec![col(column)]).eq(func("YEAR", vec![Expr::CurrentDate]))
        }
    }
}

/// Time window predicates using `CAST`, `CURRENT_DATE` and `DATE_TRUNC`.
/// Used by: Postgres, DuckDB
pub fn time_window_ansi(column: &str, window: TimeWindow) -> Expr {
    let date_of = |e: Expr| cast(e, "DATE");
    let trunc = |part: &str, e: Expr| func("DATE_TRUNC", vec![lit_str(part), e]);
    let today_minus = |n: i64, unit: IntervalUnit| Expr::CurrentDate.sub(interval(n, unit));
    let now_minus = |n: i64, unit: IntervalUnit| Expr::CurrentTimestamp.sub(interval(n, unit));

    match window {
        TimeWindow::LastDays(n) => {
            date_of(col(column)).gte(today_minus(i64::from(n), IntervalUnit::Day))
        }
        TimeWindow::LastWeeks(n) => col(column).gte(now_minus(i64::from(n), IntervalUnit::Week)),
        TimeWindow::LastMonths(n) => {
            col(column).gte(now_minus(i64::from(n), IntervalUnit::Month))
        }
        TimeWindow::Today => date_of(col(column)).eq(Expr::CurrentDate),
        TimeWindow::Yesterday => date_of(col(column)).eq(today_minus(1, IntervalUnit::Day)),
        TimeWindow::ThisWeek => trunc("week", col(column)).eq(trunc("week", Expr::CurrentDate)),
        TimeWindow::LastWeek => trunc("week", col(column))
            .eq(trunc("week", today_minus(1, IntervalUnit::Week))),
        TimeWindow::ThisMonth => {
            trunc("month", col(column)).eq(trunc("month", Expr::CurrentDate))
        }
        TimeWindow::LastMonth => trunc("month", col(column))
            .eq(trunc("month", today_minus(1, IntervalUnit::Month))),
        TimeWindow::ThisYear => trunc("year", col(column)).eq(trunc("year", Expr::CurrentDate)),
    }
}
