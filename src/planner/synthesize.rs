//! SQL synthesis: resolved table + intent -> one SELECT statement.
//!
//! Each clause is chosen by an ordered list of rules where the first rule
//! that applies wins. The result always flows through the [`Query`] builder,
//! so only schema-derived identifiers and integers reach the SQL text.

use tracing::debug;

use super::intent::QueryIntent;
use crate::config::PlannerSettings;
use crate::metadata::SchemaProvider;
use crate::rules::names;
use crate::sql::{col, count_star, func, star, OrderByExpr, Query, SelectExpr, SqlDialect};

/// Alias of the row count in counting and grouped queries.
pub const COUNT_ALIAS: &str = "count_value";

/// Aggregate rules in priority order: rule, SQL function, alias.
const AGGREGATES: [(&str, &str, &str); 4] = [
    (names::SUM, "SUM", "sum_value"),
    (names::AVG, "AVG", "avg_value"),
    (names::MAX, "MAX", "max_value"),
    (names::MIN, "MIN", "min_value"),
];

/// Fragments that mark a column as time-like in listing projections.
const TIME_HINTS: [&str; 4] = ["time", "date", "created", "updated"];

/// Fragments that disqualify an otherwise time-like column.
const NOT_TIME: [&str; 2] = ["timezone", "language"];

/// Listing sort key candidates, strongest first.
const LISTING_SORT_PATTERNS: [&str; 9] = [
    "created_at",
    "updated_at",
    "create_time",
    "update_time",
    "_time",
    "_date",
    "time_",
    "date_",
    "timestamp",
];

/// Sort key candidates for an explicit newest-first request.
const RECENCY_COLUMNS: [&str; 4] = ["created_at", "time", "timestamp", "date"];

/// Whether the question asks for rows rather than a figure.
pub fn is_listing(intent: &QueryIntent, query: &str) -> bool {
    intent.has(names::PAGINATION) || query.contains("列表") || query.contains("详情")
}

/// How the SELECT list is built.
#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    /// `COUNT(*) AS count_value`
    Count,
    /// `FUNC(field) AS alias`
    Aggregate {
        function: &'static str,
        field: String,
        alias: &'static str,
    },
    /// Time-like columns first, capped.
    Listing(Vec<String>),
    /// Leading schema columns, capped.
    Columns(Vec<String>),
    /// No columns known.
    Star,
    /// `group, COUNT(*) AS count_value`
    Grouped(String),
}

/// Builds SQL for a resolved table.
pub struct SqlSynthesizer<'a, P: SchemaProvider + ?Sized> {
    provider: &'a P,
    settings: &'a PlannerSettings,
}

impl<'a, P: SchemaProvider + ?Sized> SqlSynthesizer<'a, P> {
    pub fn new(provider: &'a P, settings: &'a PlannerSettings) -> Self {
        Self { provider, settings }
    }

    /// Render the statement for `table`. `related` never contributes a join.
    pub fn synthesize(
        &self,
        table: &str,
        related: &[String],
        intent: &QueryIntent,
        query: &str,
    ) -> String {
        let sql = self.build(table, intent, query).to_sql(self.settings.dialect);
        debug!(table, related = related.len(), %sql, "synthesized");
        sql
    }

    /// Assemble the query without rendering it.
    pub fn build(&self, table: &str, intent: &QueryIntent, query: &str) -> Query {
        let columns = self.provider.columns(table);
        let listing = is_listing(intent, query);

        let projection = self.projection(columns, intent, listing);
        let mut q = Query::new()
            .select(select_list(&projection))
            .from(table);

        if let Some(condition) = intent.time_condition() {
            let predicate = self
                .settings
                .dialect
                .time_window_predicate(&condition.field, condition.window);
            q = q.filter(predicate);
        }

        if let Projection::Grouped(field) = &projection {
            q = q.group_by(vec![col(field)]);
        }

        let order = order_by(columns, intent, listing).or_else(|| match &projection {
            Projection::Grouped(_) => Some(OrderByExpr::desc(col(COUNT_ALIAS))),
            _ => None,
        });
        if let Some(order) = order {
            q = q.order_by(vec![order]);
        }

        if let Some(limit) = self.limit(intent, listing) {
            q = q.limit(limit);
        }

        q
    }

    /// SELECT precedence: grouping overrides everything, then count, then
    /// the first aggregate with a field, then a projection.
    pub fn projection(&self, columns: &[String], intent: &QueryIntent, listing: bool) -> Projection {
        if let (true, Some(field)) = (intent.is_grouped(), &intent.group_field) {
            return Projection::Grouped(field.clone());
        }
        if intent.has(names::COUNT) {
            return Projection::Count;
        }
        if let Some(field) = intent.fields.first() {
            let aggregate = AGGREGATES.iter().find(|(rule, _, _)| intent.has(rule));
            if let Some(&(_, function, alias)) = aggregate {
                return Projection::Aggregate {
                    function,
                    field: field.clone(),
                    alias,
                };
            }
        }
        if columns.is_empty() {
            return Projection::Star;
        }
        if listing {
            let (time_like, others): (Vec<&String>, Vec<&String>) =
                columns.iter().partition(|c| is_time_like(c));
            let picked = time_like
                .into_iter()
                .chain(others)
                .take(self.settings.listing_column_cap)
                .cloned()
                .collect();
            return Projection::Listing(picked);
        }
        Projection::Columns(
            columns
                .iter()
                .take(self.settings.default_column_cap)
                .cloned()
                .collect(),
        )
    }

    /// Listing requests get a page size; plain projections get a safety cap;
    /// counts and groupings are unbounded.
    ///
    /// An explicit pagination request takes its size from the intent. A
    /// 列表/详情 request uses the first number the time phrase left over.
    pub fn limit(&self, intent: &QueryIntent, listing: bool) -> Option<u64> {
        if listing {
            let page_size = if intent.has(names::PAGINATION) {
                intent.page_size
            } else {
                intent.free_numbers().first().copied()
            };
            return Some(page_size.unwrap_or(self.settings.default_page_size));
        }
        if !intent.has(names::COUNT) && !intent.is_grouped() {
            return Some(self.settings.safety_limit);
        }
        None
    }
}

fn select_list(projection: &Projection) -> Vec<SelectExpr> {
    match projection {
        Projection::Count => vec![count_star().alias(COUNT_ALIAS)],
        Projection::Aggregate {
            function,
            field,
            alias,
        } => vec![func(function, vec![col(field)]).alias(alias)],
        Projection::Listing(columns) | Projection::Columns(columns) => {
            columns.iter().map(|c| SelectExpr::new(col(c))).collect()
        }
        Projection::Star => vec![SelectExpr::new(star())],
        Projection::Grouped(field) => vec![
            SelectExpr::new(col(field)),
            count_star().alias(COUNT_ALIAS),
        ],
    }
}

fn is_time_like(column: &str) -> bool {
    let lower = column.to_lowercase();
    TIME_HINTS.iter().any(|h| lower.contains(h)) && !NOT_TIME.iter().any(|n| lower.contains(n))
}

/// ORDER BY precedence: newest-first, oldest-first, then listing default.
fn order_by(columns: &[String], intent: &QueryIntent, listing: bool) -> Option<OrderByExpr> {
    let first = columns.first()?;

    if intent.has(names::ORDER_DESC) {
        let key = RECENCY_COLUMNS
            .iter()
            .find_map(|name| columns.iter().find(|c| c.as_str() == *name))
            .unwrap_or(first);
        return Some(OrderByExpr::desc(col(key)));
    }
    if intent.has(names::ORDER_ASC) {
        return Some(OrderByExpr::asc(col(first)));
    }
    if listing {
        let key = LISTING_SORT_PATTERNS
            .iter()
            .find_map(|pattern| {
                columns.iter().find(|c| {
                    let lower = c.to_lowercase();
                    lower.contains(pattern) && !lower.contains("timezone")
                })
            })
            .unwrap_or(first);
        return Some(OrderByExpr::desc(col(key)));
    }
    None
}
