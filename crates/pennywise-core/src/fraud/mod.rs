//! Fraud alerting
//!
//! - [`features`]: label encoder and the fixed-shape feature vector
//! - [`classifier`]: scoring backends behind the `FraudClassifier` trait
//! - [`controller`]: the per-user alert state machine

pub mod classifier;
pub mod controller;
pub mod features;

pub use classifier::{ClassifierClient, FraudClassifier, HttpClassifier, MockClassifier};
pub use controller::{
    AlertStatus, FlaggedTransaction, FraudAlertController, ResolveAction, ResolveOutcome,
    ScoreOutcome, REPORTED_ANNOTATION,
};
pub use features::{FeatureVector, LabelEncoder};
