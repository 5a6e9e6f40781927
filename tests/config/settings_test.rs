//! Tests for loading configuration files.

use nlquery::config::{Settings, SettingsError};
use nlquery::Dialect;
use std::fs;
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_json_file() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "nlquery.json",
        r#"{
            "_comment": "test config",
            "entity_mappings": {
                "_comment": "business term -> table",
                "people": { "_note": "skip me", "用户": "users", "会员": "members" },
                "sales": { "订单": "orders" }
            },
            "time_field_mappings": { "orders": "order_time", "_users": "ignored" },
            "custom_query_patterns": {
                "examples": { "avg": "(平均|均值|人均)", "refund": "(退款)" }
            },
            "planner": { "dialect": "postgres", "safety_limit": 200 }
        }"#,
    );

    let settings = Settings::from_file(&path).unwrap();
    assert_eq!(settings.entity_mappings.len(), 3);
    assert_eq!(settings.entity_mappings.lookup("本月订单"), Some("orders"));
    assert_eq!(settings.time_field_mappings.field_for("orders"), Some("order_time"));
    assert_eq!(settings.time_field_mappings.field_for("_users"), None);
    assert_eq!(
        settings.custom_patterns,
        vec![
            ("avg".to_string(), "(平均|均值|人均)".to_string()),
            ("refund".to_string(), "(退款)".to_string()),
        ]
    );
    assert_eq!(settings.planner.dialect, Dialect::Postgres);
    assert_eq!(settings.planner.safety_limit, 200);
    assert_eq!(settings.planner.default_page_size, 10_000);
}

#[test]
fn test_toml_file() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "nlquery.toml",
        r#"
[entity_mappings.sales]
"订单" = "orders"

[time_field_mappings]
orders = "paid_at"

[planner]
dialect = "duckdb"
default_time_field = "ts"
"#,
    );

    let settings = Settings::from_file(&path).unwrap();
    assert_eq!(settings.entity_mappings.lookup("订单列表"), Some("orders"));
    assert_eq!(settings.time_field_mappings.field_for("orders"), Some("paid_at"));
    assert_eq!(settings.planner.dialect, Dialect::DuckDb);
    assert_eq!(settings.planner.default_time_field, "ts");
    assert!(settings.custom_patterns.is_empty());
}

#[test]
fn test_malformed_sections_degrade_to_empty() {
    let settings = Settings::from_json_str(
        r#"{
            "entity_mappings": ["not", "an", "object"],
            "time_field_mappings": { "orders": 42 },
            "custom_query_patterns": "nope"
        }"#,
    )
    .unwrap();
    assert!(settings.entity_mappings.is_empty());
    assert!(settings.time_field_mappings.is_empty());
    assert!(settings.custom_patterns.is_empty());
}

#[test]
fn test_bad_planner_section_is_an_error() {
    let err = Settings::from_json_str(r#"{ "planner": { "dialect": "oracle" } }"#).unwrap_err();
    assert!(matches!(err, SettingsError::InvalidConfig(_)));
}

#[test]
fn test_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = Settings::from_file(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, SettingsError::FileNotFound(_)));
}

#[test]
fn test_unsupported_extension() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "nlquery.yaml", "entity_mappings: {}");
    let err = Settings::from_file(&path).unwrap_err();
    assert!(matches!(err, SettingsError::UnsupportedFormat(_)));
}

#[test]
fn test_invalid_json() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "nlquery.json", "{ not json");
    let err = Settings::from_file(&path).unwrap_err();
    assert!(matches!(err, SettingsError::JsonError(_)));
}

#[test]
fn test_top_level_must_be_object() {
    let err = Settings::from_json_str("[1, 2]").unwrap_err();
    assert!(matches!(err, SettingsError::InvalidConfig(_)));
}
