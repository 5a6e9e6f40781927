//! Every generated statement must parse in its target dialect.

use nlquery::config::{EntityMapping, PlannerSettings, Settings};
use nlquery::metadata::{SchemaSnapshot, TableSchema};
use nlquery::{Dialect, QueryParser};
use sqlparser::dialect::{
    Dialect as ParserDialect, DuckDbDialect, MySqlDialect, PostgreSqlDialect,
};
use sqlparser::parser::Parser;

const QUERIES: &[&str] = &[
    "今天的用户注册量",
    "昨天新增用户数",
    "本周订单总数",
    "上周订单列表",
    "这个月的订单金额总和",
    "上个月平均订单金额",
    "今年订单最高金额",
    "最近7天的订单列表",
    "最近2周的用户趋势",
    "过去3个月订单数量",
    "各个module的统计",
    "按status分组统计订单",
    "最新订单前20个",
    "最早注册的用户",
    "订单第2页",
    "order的使用情况",
];

fn parser(dialect: Dialect) -> QueryParser<SchemaSnapshot> {
    let schema = SchemaSnapshot::new(vec![
        TableSchema::new("users", ["id", "name", "created_at", "timezone"]),
        TableSchema::new(
            "orders",
            ["id", "amount", "status", "order", "module", "created_at"],
        ),
    ]);
    let settings = Settings {
        entity_mappings: EntityMapping::new([("用户", "users"), ("订单", "orders")]),
        planner: PlannerSettings {
            dialect,
            ..Default::default()
        },
        ..Default::default()
    };
    QueryParser::new(schema, settings)
}

fn assert_parses(dialect: Dialect, target: &dyn ParserDialect) {
    let parser = parser(dialect);
    for query in QUERIES {
        let plan = parser
            .parse_query(query)
            .unwrap_or_else(|e| panic!("{query}: {e}"));
        let statements = Parser::parse_sql(target, &plan.sql_query)
            .unwrap_or_else(|e| panic!("{dialect} rejected {:?} for {query}: {e}", plan.sql_query));
        assert_eq!(statements.len(), 1, "{}", plan.sql_query);
    }
}

#[test]
fn test_mysql_output_parses() {
    assert_parses(Dialect::MySql, &MySqlDialect {});
}

#[test]
fn test_postgres_output_parses() {
    assert_parses(Dialect::Postgres, &PostgreSqlDialect {});
}

#[test]
fn test_duckdb_output_parses() {
    assert_parses(Dialect::DuckDb, &DuckDbDialect {});
}
