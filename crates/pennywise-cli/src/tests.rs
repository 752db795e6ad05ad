//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use std::io::Write;

use chrono::NaiveDate;
use pennywise_core::{
    AlertState, Config, Database, NewTransaction, TransactionFilter, TransactionStore, UserStore,
};

use crate::commands::{self, truncate};

fn setup_test_db() -> Database {
    let db = Database::in_memory().unwrap();
    db.create_user("ana", "hunter2").unwrap();
    db
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn seed_transactions(db: &Database) {
    let txs = [
        NewTransaction::new(date(2025, 2, 14), -2400.0),
        NewTransaction::new(date(2025, 3, 1), 12.0).with_category("Food and Drink, Coffee Shop"),
        NewTransaction::new(date(2025, 3, 2), 30.0)
            .with_category(vec!["Travel".to_string(), "Taxi".to_string()]),
        NewTransaction::new(date(2025, 3, 3), 1800.0)
            .with_merchant("Apple")
            .with_category("Shops"),
    ];
    for tx in &txs {
        db.insert(tx).unwrap();
    }
}

// ========== Core Command Tests ==========

#[test]
fn test_cmd_init_unencrypted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("init.db");

    commands::cmd_init(&path, true).unwrap();
    assert!(path.exists());
}

#[test]
fn test_cmd_import() {
    let db = setup_test_db();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"transactions": [
            {{"date": "2025-03-01", "amount": 4.5, "category": ["Food and Drink"]}},
            {{"date": "2025-03-02", "amount": -900, "name": "PAYROLL"}}
        ]}}"#
    )
    .unwrap();

    commands::cmd_import(&db, file.path()).unwrap();
    assert_eq!(db.list(&TransactionFilter::all()).unwrap().len(), 2);
}

#[test]
fn test_cmd_import_bad_file() {
    let db = setup_test_db();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "not json").unwrap();

    assert!(commands::cmd_import(&db, file.path()).is_err());
    assert!(commands::cmd_import(&db, std::path::Path::new("/nonexistent.json")).is_err());
}

// ========== Transaction Command Tests ==========

#[test]
fn test_cmd_transactions_list_and_delete() {
    let db = setup_test_db();
    assert!(commands::cmd_transactions_list(&db, 20).is_ok());

    seed_transactions(&db);
    assert!(commands::cmd_transactions_list(&db, 2).is_ok());

    let id = db.latest().unwrap().unwrap().id;
    commands::cmd_transactions_delete(&db, id).unwrap();
    assert!(commands::cmd_transactions_delete(&db, id).is_err());
}

// ========== User and Goal Command Tests ==========

#[test]
fn test_cmd_users_add() {
    let db = Database::in_memory().unwrap();
    commands::cmd_users_add(&db, "bo", "secret").unwrap();
    assert!(db.verify_password("bo", "secret").unwrap());
    assert!(commands::cmd_users_add(&db, "bo", "again").is_err());
}

#[test]
fn test_cmd_goal() {
    let db = setup_test_db();
    let config = Config::default();

    assert!(commands::cmd_goal_show(&db, &config, "ana").is_ok());
    commands::cmd_goal_set(&db, &config, "ana", 1200.0, 12).unwrap();
    assert_eq!(db.require_user("ana").unwrap().saving_goal, Some(100.0));

    assert!(commands::cmd_goal_set(&db, &config, "ana", 1200.0, 0).is_err());
    assert!(commands::cmd_goal_show(&db, &config, "ghost").is_err());
}

// ========== Insight Command Tests ==========

#[test]
fn test_cmd_insights_refresh() {
    let db = setup_test_db();
    seed_transactions(&db);
    let config = Config::default();

    commands::cmd_insights_refresh(&db, &config, "ana", date(2025, 3, 10)).unwrap();

    let user = db.require_user("ana").unwrap();
    assert_eq!(user.top_spender.as_deref(), Some("Food and Drink"));
    assert_eq!(user.top2_spender.as_deref(), Some("Coffee Shop"));
    assert_eq!(user.day_paid, Some(14));
}

#[test]
fn test_cmd_insights_without_user_do_not_persist() {
    let db = setup_test_db();
    seed_transactions(&db);
    let config = Config::default();

    commands::cmd_insights_top_spenders(&db, &config, None).unwrap();
    commands::cmd_insights_pay_day(&db, &config, None, date(2025, 3, 10)).unwrap();

    let user = db.require_user("ana").unwrap();
    assert!(user.top_spender.is_none());
    assert!(user.day_paid.is_none());
}

#[test]
fn test_cmd_series_and_flows() {
    let db = setup_test_db();
    let config = Config::default();
    let today = date(2025, 3, 10);

    assert!(commands::cmd_series(&db, &config, None, today, false).is_ok());
    assert!(commands::cmd_flows(&db, &config, today, false).is_ok());

    seed_transactions(&db);
    assert!(commands::cmd_series(&db, &config, Some("Taxi"), today, false).is_ok());
    assert!(commands::cmd_series(&db, &config, None, today, true).is_ok());
    assert!(commands::cmd_flows(&db, &config, today, true).is_ok());
}

// ========== Alert Command Tests ==========

#[tokio::test]
async fn test_cmd_alert_cycle() {
    let db = setup_test_db();
    seed_transactions(&db);
    // Default config uses the mock classifier (threshold 1000)
    let config = Config::default();

    commands::cmd_alert_score(&db, &config, "ana").await.unwrap();
    assert_eq!(db.require_user("ana").unwrap().alert_state, AlertState::Pending);

    assert!(commands::cmd_alert_resolve(&db, &config, "ana", "maybe").is_err());
    commands::cmd_alert_resolve(&db, &config, "ana", "yes").unwrap();
    commands::cmd_alert_status(&db, &config, "ana").unwrap();

    assert_eq!(db.require_user("ana").unwrap().alert_state, AlertState::Resolved);
}

#[tokio::test]
async fn test_cmd_alert_answer_with_stale_encoder_path() {
    let db = setup_test_db();
    seed_transactions(&db);
    commands::cmd_alert_score(&db, &Config::default(), "ana")
        .await
        .unwrap();

    let mut config = Config::default();
    config.fraud.label_encoder = Some("/nonexistent/encoder.json".into());

    assert!(commands::cmd_alert_score(&db, &config, "ana").await.is_err());
    commands::cmd_alert_status(&db, &config, "ana").unwrap();
    commands::cmd_alert_resolve(&db, &config, "ana", "report").unwrap();
    assert_eq!(db.require_user("ana").unwrap().alert_state, AlertState::Reported);
}

#[tokio::test]
async fn test_cmd_alert_unknown_user() {
    let db = setup_test_db();
    let config = Config::default();
    assert!(commands::cmd_alert_score(&db, &config, "ghost").await.is_err());
    assert!(commands::cmd_alert_status(&db, &config, "ghost").is_err());
}

// ========== Status Command Tests ==========

#[test]
fn test_cmd_status() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("status.db");
    let config = Config::default();

    assert!(commands::cmd_status(&path, true, &config).is_ok());
    commands::cmd_init(&path, true).unwrap();
    assert!(commands::cmd_status(&path, true, &config).is_ok());
}

// ========== Helper Tests ==========

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("a longer merchant name", 10), "a longe...");
    assert_eq!(truncate("Café Müller GmbH", 8), "Café ...");
}
