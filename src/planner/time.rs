//! Time resolution: temporal phrases -> one predicate on the table's time column.
//!
//! Resolution is a fixed priority list. The relative ranges are tried first,
//! days before weeks before months, then the calendar windows from today to
//! this year. The first hit is the only condition ever produced.

use serde::Serialize;
use tracing::debug;

use crate::config::TimeFieldMapping;
use crate::rules::{names, RuleSet};
use crate::sql::{Dialect, SqlDialect};

/// A resolved time window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "amount", rename_all = "snake_case")]
pub enum TimeWindow {
    LastDays(u32),
    LastWeeks(u32),
    LastMonths(u32),
    Today,
    Yesterday,
    ThisWeek,
    LastWeek,
    ThisMonth,
    LastMonth,
    ThisYear,
}

impl TimeWindow {
    /// Human-readable label.
    pub fn description(&self) -> String {
        match self {
            TimeWindow::LastDays(n) => format!("最近{n}天"),
            TimeWindow::LastWeeks(n) => format!("最近{n}周"),
            TimeWindow::LastMonths(n) => format!("最近{n}个月"),
            TimeWindow::Today => "今天".to_string(),
            TimeWindow::Yesterday => "昨天".to_string(),
            TimeWindow::ThisWeek => "本周".to_string(),
            TimeWindow::LastWeek => "上周".to_string(),
            TimeWindow::ThisMonth => "本月".to_string(),
            TimeWindow::LastMonth => "上月".to_string(),
            TimeWindow::ThisYear => "今年".to_string(),
        }
    }

    /// The number the query spelled out for a relative range.
    pub fn magnitude(&self) -> Option<u32> {
        match self {
            TimeWindow::LastDays(n) | TimeWindow::LastWeeks(n) | TimeWindow::LastMonths(n) => {
                Some(*n)
            }
            _ => None,
        }
    }
}

/// Relative ranges in priority order.
const RANGES: [(&str, fn(u32) -> TimeWindow); 3] = [
    (names::LAST_DAYS, TimeWindow::LastDays),
    (names::LAST_WEEKS, TimeWindow::LastWeeks),
    (names::LAST_MONTHS, TimeWindow::LastMonths),
];

/// Calendar windows in priority order.
const CALENDAR: [(&str, TimeWindow); 7] = [
    (names::TODAY, TimeWindow::Today),
    (names::YESTERDAY, TimeWindow::Yesterday),
    (names::THIS_WEEK, TimeWindow::ThisWeek),
    (names::LAST_WEEK, TimeWindow::LastWeek),
    (names::THIS_MONTH, TimeWindow::ThisMonth),
    (names::LAST_MONTH, TimeWindow::LastMonth),
    (names::THIS_YEAR, TimeWindow::ThisYear),
];

/// A temporal filter bound to a column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeCondition {
    /// Column the predicate restricts.
    pub field: String,
    /// Rendered predicate.
    pub condition: String,
    pub description: String,
    pub window: TimeWindow,
}

/// Turns temporal phrases into a [`TimeCondition`].
#[derive(Debug, Clone, Copy)]
pub struct TimeResolver<'a> {
    rules: &'a RuleSet,
    time_fields: &'a TimeFieldMapping,
    default_field: &'a str,
    dialect: Dialect,
}

impl<'a> TimeResolver<'a> {
    pub fn new(
        rules: &'a RuleSet,
        time_fields: &'a TimeFieldMapping,
        default_field: &'a str,
        dialect: Dialect,
    ) -> Self {
        Self {
            rules,
            time_fields,
            default_field,
            dialect,
        }
    }

    /// The time column for `table`: its mapping if any, else the default.
    pub fn time_field(&self, table: Option<&str>) -> &'a str {
        table
            .and_then(|t| self.time_fields.field_for(t))
            .unwrap_or(self.default_field)
    }

    /// The first window mentioned in `query`, by priority.
    pub fn window(&self, query: &str) -> Option<TimeWindow> {
        let query = query.to_lowercase();

        let range = RANGES.iter().find_map(|(rule, build)| {
            self.rules.magnitude(rule, &query).map(build)
        });
        if range.is_some() {
            return range;
        }

        CALENDAR
            .iter()
            .find(|(rule, _)| self.rules.is_match(rule, &query))
            .map(|(_, window)| *window)
    }

    /// Resolve `query` to at most one condition.
    pub fn resolve(&self, query: &str, table: Option<&str>) -> Vec<TimeCondition> {
        let Some(window) = self.window(query) else {
            return Vec::new();
        };

        let field = self.time_field(table);
        let condition = self
            .dialect
            .time_window_predicate(field, window)
            .to_sql(self.dialect);
        debug!(?window, field, %condition, "resolved time window");

        vec![TimeCondition {
            field: field.to_string(),
            condition,
            description: window.description(),
            window,
        }]
    }
}
