//! Tests for table resolution: entity overrides and fuzzy scoring.

use nlquery::config::EntityMapping;
use nlquery::metadata::{SchemaSnapshot, TableSchema};
use nlquery::planner::resolve::{score, tokenize};
use nlquery::planner::TableResolver;

fn snapshot() -> SchemaSnapshot {
    SchemaSnapshot::new(vec![
        TableSchema::new("app_launch_log", ["id", "app_name", "launch_time", "module"]),
        TableSchema::new("orders", ["id", "user_id", "status", "created_at"]),
        TableSchema::new("users", ["id", "username", "email", "created_at"]),
    ])
}

#[test]
fn test_entity_override_wins() {
    let snapshot = snapshot();
    let entities = EntityMapping::new([("用户", "users")]);
    let resolver = TableResolver::new(&entities, &snapshot);

    // "orders" would score well on its own; the override still decides.
    let matches = resolver.resolve("用户的orders status");
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].table, "users");
    assert_eq!(matches[0].score, 1.0);
}

#[test]
fn test_override_table_need_not_exist() {
    let snapshot = snapshot();
    let entities = EntityMapping::new([("会员", "members")]);
    let matches = TableResolver::new(&entities, &snapshot).resolve("会员数量");
    assert_eq!(matches[0].table, "members");
}

#[test]
fn test_fuzzy_ranks_best_table_first() {
    let snapshot = snapshot();
    let entities = EntityMapping::default();
    let matches = TableResolver::new(&entities, &snapshot).resolve("每个module的launch次数");

    assert_eq!(matches[0].table, "app_launch_log");
    assert!(matches.iter().all(|m| m.score > 0.0 && m.score <= 1.0));
    assert!(matches.windows(2).all(|w| w[0].score >= w[1].score));
}

#[test]
fn test_typo_still_matches() {
    let snapshot = snapshot();
    let entities = EntityMapping::default();
    let matches = TableResolver::new(&entities, &snapshot).resolve("all order");
    assert_eq!(matches[0].table, "orders");
}

#[test]
fn test_no_overlap_returns_empty() {
    let snapshot = snapshot();
    let entities = EntityMapping::default();
    assert!(TableResolver::new(&entities, &snapshot)
        .resolve("今天天气怎么样")
        .is_empty());
}

#[test]
fn test_ties_keep_discovery_order() {
    let snapshot = SchemaSnapshot::new(vec![
        TableSchema::new("alpha", ["status"]),
        TableSchema::new("beta", ["status"]),
    ]);
    let entities = EntityMapping::default();
    let matches = TableResolver::new(&entities, &snapshot).resolve("status");

    let names: Vec<&str> = matches.iter().map(|m| m.table.as_str()).collect();
    assert_eq!(names, vec!["alpha", "beta"]);
    assert_eq!(matches[0].score, matches[1].score);
}

#[test]
fn test_scores_are_clamped() {
    let tokens = tokenize("orders order status created");
    let keywords = TableSchema::new("orders", ["status", "created_at"]).keywords();
    assert!(score(&tokens, &keywords) > 1.0);

    let snapshot = SchemaSnapshot::new(vec![TableSchema::new("orders", ["status", "created_at"])]);
    let entities = EntityMapping::default();
    let matches = TableResolver::new(&entities, &snapshot).resolve("orders order status created");
    assert_eq!(matches[0].score, 1.0);
}

#[test]
fn test_partial_word_matches_by_common_blocks() {
    // "stat" shares the block "stat" with "status": 2 * 4 / 10
    let snapshot = SchemaSnapshot::new(vec![TableSchema::new("logs", ["status"])]);
    let entities = EntityMapping::default();
    let matches = TableResolver::new(&entities, &snapshot).resolve("stat");

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].table, "logs");
    assert!((matches[0].score - 0.4 * 0.8).abs() < 1e-9);
}
