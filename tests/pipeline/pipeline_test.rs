//! End-to-end planning tests.

use insta::assert_snapshot;
use nlquery::config::{EntityMapping, PlannerSettings, Settings, TimeFieldMapping};
use nlquery::metadata::{SchemaSnapshot, TableSchema};
use nlquery::planner::{ChartType, TimeWindow};
use nlquery::{Dialect, PlanError, QueryParser};

fn settings(entities: &[(&str, &str)]) -> Settings {
    Settings {
        entity_mappings: EntityMapping::new(entities.iter().copied()),
        ..Default::default()
    }
}

#[test]
fn test_today_registrations() {
    let schema = SchemaSnapshot::new(vec![TableSchema::new(
        "users",
        ["id", "name", "created_at"],
    )]);
    let settings = Settings {
        time_field_mappings: TimeFieldMapping::new([("users", "created_at")]),
        ..settings(&[("用户", "users")])
    };
    let parser = QueryParser::new(schema, settings);

    let plan = parser.parse_query("今天的用户注册量").unwrap();
    assert_eq!(plan.primary_table, "users");
    assert_eq!(plan.table_matches.len(), 1);
    assert_eq!(plan.table_matches[0].score, 1.0);
    assert_snapshot!(plan.sql_query, @"SELECT COUNT(*) AS count_value FROM users WHERE DATE(created_at) = CURDATE()");
    assert_eq!(plan.chart_type, ChartType::SingleValue);

    let time = plan.query_intent.time_condition().unwrap();
    assert_eq!(time.window, TimeWindow::Today);
    assert_eq!(time.field, "created_at");
    assert_eq!(time.description, "今天");
}

#[test]
fn test_recent_order_listing() {
    let schema = SchemaSnapshot::new(vec![TableSchema::new(
        "orders",
        ["id", "created_at", "status"],
    )]);
    let parser = QueryParser::new(schema, settings(&[("订单", "orders")]));

    let plan = parser.parse_query("最近7天的订单列表").unwrap();
    assert_snapshot!(plan.sql_query, @"SELECT created_at, id, status FROM orders WHERE DATE(created_at) >= DATE_SUB(CURDATE(), INTERVAL 7 DAY) ORDER BY created_at DESC LIMIT 10000");
    assert_eq!(plan.chart_type, ChartType::Table);
    assert_eq!(plan.query_intent.numbers, vec![7]);
    assert!(plan.query_intent.free_numbers().is_empty());
}

#[test]
fn test_no_table_match() {
    let schema = SchemaSnapshot::new(vec![
        TableSchema::new("orders", ["id", "status"]),
        TableSchema::new("users", ["id", "name"]),
    ]);
    let parser = QueryParser::with_defaults(schema);

    let err = parser.parse_query("天气怎么样").unwrap_err();
    assert!(matches!(err, PlanError::NoTableMatch { .. }));
    assert!(!err.suggestion().is_empty());

    let report = parser.report("天气怎么样");
    assert!(!report.success);
    assert!(report.plan.is_none());
    assert!(!report.suggestion.unwrap_or_default().is_empty());
}

#[test]
fn test_grouped_statistics() {
    let schema = SchemaSnapshot::new(vec![TableSchema::new(
        "app_events",
        ["id", "module", "created_at"],
    )]);
    let parser = QueryParser::with_defaults(schema);

    let plan = parser.parse_query("各个module的统计").unwrap();
    assert_eq!(plan.primary_table, "app_events");
    assert_eq!(plan.query_intent.group_field.as_deref(), Some("module"));
    assert_snapshot!(plan.sql_query, @"SELECT module, COUNT(*) AS count_value FROM app_events GROUP BY module ORDER BY count_value DESC");
    assert_eq!(plan.chart_type, ChartType::Table);
}

#[test]
fn test_postgres_dialect_from_settings() {
    let schema = SchemaSnapshot::new(vec![TableSchema::new(
        "orders",
        ["id", "created_at", "status"],
    )]);
    let settings = Settings {
        planner: PlannerSettings {
            dialect: Dialect::Postgres,
            ..Default::default()
        },
        ..settings(&[("订单", "orders")])
    };
    let parser = QueryParser::new(schema, settings);

    let plan = parser.parse_query("今天有多少订单").unwrap();
    assert_snapshot!(plan.sql_query, @"SELECT COUNT(*) AS count_value FROM orders WHERE CAST(created_at AS DATE) = CURRENT_DATE");
}

#[test]
fn test_planning_is_deterministic() {
    let schema = SchemaSnapshot::new(vec![
        TableSchema::new("app_events", ["id", "module", "created_at"]),
        TableSchema::new("app_users", ["id", "name", "created_at"]),
    ]);
    let parser = QueryParser::with_defaults(schema);

    let first = parser.parse_query("最近3天app module 趋势").unwrap();
    for _ in 0..5 {
        assert_eq!(parser.parse_query("最近3天app module 趋势").unwrap(), first);
    }
}

#[test]
fn test_query_text_never_reaches_sql() {
    let schema = SchemaSnapshot::new(vec![TableSchema::new(
        "orders",
        ["id", "created_at", "status"],
    )]);
    let parser = QueryParser::new(schema, settings(&[("订单", "orders")]));

    let query = "订单列表 x'; DROP TABLE orders; --";
    let plan = parser.parse_query(query).unwrap();
    assert!(!plan.sql_query.contains("DROP"));
    assert!(!plan.sql_query.contains('\''));
    assert!(!plan.sql_query.contains("--"));
}

#[test]
fn test_related_tables_for_weak_primary() {
    let schema = SchemaSnapshot::new(vec![
        TableSchema::new("app_launch", ["id", "created_at"]),
        TableSchema::new("app_usage", ["id", "created_at"]),
        TableSchema::new("billing", ["id", "amount"]),
    ]);
    let parser = QueryParser::with_defaults(schema);

    let plan = parser.parse_query("app launch").unwrap();
    assert_eq!(plan.primary_table, "app_launch");
    for related in &plan.related_tables {
        assert_ne!(related, "app_launch");
        assert!(!plan.sql_query.contains(related.as_str()));
    }
}

#[test]
fn test_report_json_shape() {
    let schema = SchemaSnapshot::new(vec![TableSchema::new(
        "users",
        ["id", "name", "created_at"],
    )]);
    let parser = QueryParser::new(schema, settings(&[("用户", "users")]));

    let json = serde_json::to_value(parser.report("本月新增用户数")).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["primary_table"], "users");
    assert_eq!(json["chart_type"], "single_value");
    assert_eq!(json["query_intent"]["flags"]["count"], true);
    assert_eq!(
        json["query_intent"]["time_conditions"][0]["window"]["kind"],
        "this_month"
    );
    assert!(json.get("error").is_none());
}

#[test]
fn test_unknown_mapped_table_degrades_to_star() {
    let schema = SchemaSnapshot::new(vec![TableSchema::new("orders", ["id", "status"])]);
    let parser = QueryParser::new(schema, settings(&[("日志", "audit_log")]));

    let plan = parser.parse_query("看看日志").unwrap();
    assert_eq!(plan.primary_table, "audit_log");
    assert_snapshot!(plan.sql_query, @"SELECT * FROM audit_log LIMIT 100");
}

fn orders_parser() -> QueryParser<SchemaSnapshot> {
    let schema = SchemaSnapshot::new(vec![TableSchema::new(
        "orders",
        ["id", "created_at", "status"],
    )]);
    QueryParser::new(schema, settings(&[("订单", "orders")]))
}

#[test]
fn test_top_n_page_size() {
    let plan = orders_parser().parse_query("前20个订单").unwrap();
    assert_eq!(plan.query_intent.page_size, Some(20));
    assert!(plan.query_intent.time_condition().is_none());
    assert_snapshot!(plan.sql_query, @"SELECT created_at, id, status FROM orders ORDER BY created_at DESC LIMIT 20");
}

#[test]
fn test_huge_page_size_stays_valid() {
    let plan = orders_parser()
        .parse_query("订单分页 9223372036854775808")
        .unwrap();
    assert_snapshot!(plan.sql_query, @"SELECT created_at, id, status FROM orders ORDER BY created_at DESC LIMIT 9223372036854775807");
}

#[test]
fn test_full_width_digits() {
    let plan = orders_parser().parse_query("最近７天的订单").unwrap();
    assert_eq!(plan.query_intent.numbers, vec![7]);
    assert_eq!(
        plan.query_intent.time_condition().map(|c| c.window),
        Some(TimeWindow::LastDays(7))
    );
    assert_snapshot!(plan.sql_query, @"SELECT id, created_at, status FROM orders WHERE DATE(created_at) >= DATE_SUB(CURDATE(), INTERVAL 7 DAY) ORDER BY created_at DESC LIMIT 100");
}
