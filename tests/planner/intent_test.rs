//! Tests for intent extraction.

use nlquery::config::TimeFieldMapping;
use nlquery::metadata::{SchemaSnapshot, TableSchema};
use nlquery::planner::{IntentExtractor, QueryIntent, TimeResolver, TimeWindow};
use nlquery::rules::{names, RuleSet};
use nlquery::sql::Dialect;

fn snapshot() -> SchemaSnapshot {
    SchemaSnapshot::new(vec![
        TableSchema::new("events", ["id", "module", "event_type", "created_at"]),
        TableSchema::new("tickets", ["id", "priority_level", "status"]),
        TableSchema::new("plain", ["id", "payload"]),
    ])
}

fn extract(query: &str, table: Option<&str>) -> QueryIntent {
    let rules = RuleSet::builtin();
    let fields = TimeFieldMapping::new([("events", "event_time")]);
    let snapshot = snapshot();
    let time = TimeResolver::new(&rules, &fields, "created_at", Dialect::MySql);
    IntentExtractor::new(&rules, &snapshot, time).extract(query, table)
}

#[test]
fn test_flags_for_matched_rules_only() {
    let intent = extract("今天的用户注册量", Some("events"));
    assert!(intent.has(names::COUNT));
    assert!(intent.has(names::TODAY));
    assert!(intent.has("user"));
    assert!(intent.has("register"));
    assert!(!intent.has(names::AVG));
    assert!(intent.flags.values().all(|present| *present));
}

#[test]
fn test_range_rules_never_become_flags() {
    let intent = extract("最近7天 过去2周 前3个月", None);
    assert!(!intent.has(names::LAST_DAYS));
    assert!(!intent.has(names::LAST_WEEKS));
    assert!(!intent.has(names::LAST_MONTHS));
    assert_eq!(intent.numbers, vec![7, 2, 3]);
}

#[test]
fn test_rules_match_lowercased_text() {
    let intent = extract("APP启动次数", None);
    assert!(intent.has("app"));
    assert!(intent.has("launch"));
}

#[test]
fn test_numbers_use_original_text() {
    let intent = extract("第2页，每页50条", None);
    assert!(intent.has(names::PAGINATION));
    assert_eq!(intent.numbers, vec![2, 50]);
}

#[test]
fn test_fields_reported_once() {
    let intent = extract("平均状态和status的时间", None);
    assert_eq!(intent.fields, vec!["time", "status"]);
}

#[test]
fn test_group_field_named_column_first() {
    let intent = extract("各个module的统计", Some("events"));
    assert_eq!(intent.group_field.as_deref(), Some("module"));
    assert!(intent.is_grouped());
}

#[test]
fn test_group_field_falls_back_to_keywords() {
    // No column name appears; "priority_level" contains "level".
    let intent = extract("每个级别的工单", Some("tickets"));
    assert_eq!(intent.group_field.as_deref(), Some("priority_level"));
}

#[test]
fn test_group_field_none_without_table_or_candidates() {
    assert_eq!(extract("各个模块", None).group_field, None);
    assert_eq!(extract("各个模块", Some("plain")).group_field, None);
    assert_eq!(extract("各个模块", Some("missing")).group_field, None);
}

#[test]
fn test_time_condition_uses_table_time_field() {
    let intent = extract("昨天的事件", Some("events"));
    let condition = intent.time_condition().unwrap();
    assert_eq!(condition.field, "event_time");
    assert_eq!(condition.window, TimeWindow::Yesterday);
    assert_eq!(
        condition.condition,
        "DATE(event_time) = DATE_SUB(CURDATE(), INTERVAL 1 DAY)"
    );
}

#[test]
fn test_at_most_one_time_condition() {
    let intent = extract("今天 昨天 本周 上周 本月 上月 今年", Some("events"));
    assert_eq!(intent.time_conditions.len(), 1);
    assert_eq!(intent.time_conditions[0].window, TimeWindow::Today);
}

#[test]
fn test_page_size_prefers_pagination_phrase() {
    let intent = extract("最近7天前20个订单", Some("events"));
    assert_eq!(intent.numbers, vec![7, 20]);
    assert_eq!(intent.page_size, Some(20));

    assert_eq!(extract("分页 50", None).page_size, Some(50));
    assert_eq!(extract("订单列表 30", None).page_size, None);
}

#[test]
fn test_top_n_is_not_a_month_range() {
    let intent = extract("前20个订单", Some("events"));
    assert!(intent.has(names::PAGINATION));
    assert!(intent.time_condition().is_none());

    let months = extract("前3个月的订单", Some("events"));
    assert_eq!(
        months.time_condition().map(|c| c.window),
        Some(TimeWindow::LastMonths(3))
    );
}
