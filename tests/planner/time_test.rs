//! Tests for time resolution across dialects.

use nlquery::config::TimeFieldMapping;
use nlquery::planner::{TimeCondition, TimeResolver, TimeWindow};
use nlquery::rules::RuleSet;
use nlquery::sql::Dialect;

fn resolve_with(
    rules: &RuleSet,
    query: &str,
    table: Option<&str>,
    dialect: Dialect,
) -> Vec<TimeCondition> {
    let fields = TimeFieldMapping::new([("orders", "order_time")]);
    TimeResolver::new(rules, &fields, "created_at", dialect).resolve(query, table)
}

fn resolve(query: &str, table: Option<&str>) -> Vec<TimeCondition> {
    resolve_with(&RuleSet::builtin(), query, table, Dialect::MySql)
}

#[test]
fn test_last_days_beats_yesterday() {
    let conditions = resolve("昨天和最近7天的订单", None);
    assert_eq!(conditions.len(), 1);
    assert_eq!(conditions[0].window, TimeWindow::LastDays(7));
    assert_eq!(conditions[0].description, "最近7天");
    assert_eq!(
        conditions[0].condition,
        "DATE(created_at) >= DATE_SUB(CURDATE(), INTERVAL 7 DAY)"
    );
}

#[test]
fn test_weeks_and_months() {
    let weeks = resolve("过去2星期", None);
    assert_eq!(weeks[0].window, TimeWindow::LastWeeks(2));
    assert_eq!(weeks[0].description, "最近2周");
    assert_eq!(
        weeks[0].condition,
        "created_at >= DATE_SUB(NOW(), INTERVAL 2 WEEK)"
    );

    let months = resolve("前6月", None);
    assert_eq!(months[0].window, TimeWindow::LastMonths(6));
    assert_eq!(months[0].description, "最近6个月");
}

#[test]
fn test_mapped_time_field_only_for_that_table() {
    assert_eq!(resolve("今天", Some("orders"))[0].field, "order_time");
    assert_eq!(resolve("今天", Some("users"))[0].field, "created_at");
    assert_eq!(resolve("今天", None)[0].field, "created_at");
}

#[test]
fn test_no_time_phrase() {
    assert!(resolve("所有订单", Some("orders")).is_empty());
}

#[test]
fn test_custom_pattern_without_number_is_skipped() {
    // A days pattern with no numeric capture cannot yield a range.
    let rules = RuleSet::with_overrides([("last_days", "(近期)")]);
    let conditions = resolve_with(&rules, "近期 本周", None, Dialect::MySql);
    assert_eq!(conditions[0].window, TimeWindow::ThisWeek);
}

#[test]
fn test_custom_pattern_changes_magnitude_source() {
    let rules = RuleSet::with_overrides([("last_days", r"近(\d+)日")]);
    let conditions = resolve_with(&rules, "近30日", None, Dialect::MySql);
    assert_eq!(conditions[0].window, TimeWindow::LastDays(30));
}

#[test]
fn test_postgres_predicates() {
    let rules = RuleSet::builtin();
    let render = |q: &str| resolve_with(&rules, q, None, Dialect::Postgres)[0].condition.clone();

    assert_eq!(
        render("最近7天"),
        "CAST(created_at AS DATE) >= CURRENT_DATE - INTERVAL '7 days'"
    );
    assert_eq!(
        render("上周"),
        "DATE_TRUNC('week', created_at) = DATE_TRUNC('week', CURRENT_DATE - INTERVAL '1 week')"
    );
    assert_eq!(
        render("今年"),
        "DATE_TRUNC('year', created_at) = DATE_TRUNC('year', CURRENT_DATE)"
    );
}

#[test]
fn test_duckdb_uses_now_for_ranges() {
    let conditions = resolve_with(&RuleSet::builtin(), "最近3个月", None, Dialect::DuckDb);
    assert_eq!(
        conditions[0].condition,
        "created_at >= NOW() - INTERVAL '3 months'"
    );
}
