//! Pennywise Core Library
//!
//! Transaction analytics and fraud alerting for the Pennywise personal
//! finance backend:
//! - Category normalization for heterogeneous provider payloads
//! - Spending aggregation (top categories, savings goal, pay-day detection)
//! - Cumulative spending series and daily money flow
//! - Fraud-alert lifecycle around a pluggable scoring backend
//! - SQLite-backed transaction and user stores
//! - Transaction import from provider JSON
//! - Layered TOML configuration

pub mod analytics;
pub mod category;
pub mod config;
pub mod db;
pub mod error;
pub mod fraud;
pub mod import;
pub mod models;
pub mod store;

/// Test utilities including a mock fraud scoring server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use analytics::{
    AnalyticsService, CategoryCount, DailyFlow, GoalSummary, PayDay, PayDayOutcome,
    SeriesOutcome, SpendingSeries, TopSpenders, TopSpendersOutcome,
};
pub use category::{normalize, normalize_text};
pub use config::{AnalyticsConfig, ClassifierConfig, Config, FeatureSource, FraudConfig};
pub use db::Database;
pub use error::{Error, Result};
pub use fraud::{
    AlertStatus, ClassifierClient, FeatureVector, FlaggedTransaction, FraudAlertController,
    FraudClassifier, HttpClassifier, LabelEncoder, MockClassifier, ResolveAction,
    ResolveOutcome, ScoreOutcome, REPORTED_ANNOTATION,
};
pub use import::{import_transactions, parse_transactions};
pub use models::{AlertState, IncomeSign, NewTransaction, RawCategory, Transaction, User};
pub use store::{TransactionFilter, TransactionStore, UserStore};
