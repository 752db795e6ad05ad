//! Pluggable fraud scoring backends
//!
//! - `FraudClassifier` trait: the scoring interface
//! - `ClassifierClient` enum: concrete wrapper with Clone and static dispatch
//! - Backends: `HttpClassifier` (remote scoring service), `MockClassifier`
//!
//! # Configuration
//!
//! - `CLASSIFIER_BACKEND`: `http` or `mock` (default from config: mock)
//! - `CLASSIFIER_HOST`: scoring service base URL for the http backend

mod http;
mod mock;

pub use http::HttpClassifier;
pub use mock::MockClassifier;

use async_trait::async_trait;
use tracing::warn;

use super::features::FeatureVector;
use crate::config::ClassifierConfig;
use crate::error::Result;

/// Binary fraud classifier
#[async_trait]
pub trait FraudClassifier: Send + Sync {
    /// True when the transaction behind `features` looks fraudulent
    async fn predict(&self, features: &FeatureVector) -> Result<bool>;

    /// Backend name (for logging)
    fn name(&self) -> &str;

    /// Check if the backend is reachable
    async fn health_check(&self) -> bool;
}

/// Concrete classifier selected from configuration
#[derive(Clone)]
pub enum ClassifierClient {
    Http(HttpClassifier),
    Mock(MockClassifier),
}

impl ClassifierClient {
    /// Build the configured backend; unknown names fall back to mock
    pub fn from_config(config: &ClassifierConfig) -> Result<Self> {
        match config.backend.as_str() {
            "http" => Ok(Self::Http(HttpClassifier::new(&config.host, config.timeout)?)),
            "mock" => Ok(Self::Mock(MockClassifier::new(config.mock_threshold))),
            other => {
                warn!(backend = %other, "Unknown classifier backend, falling back to mock");
                Ok(Self::Mock(MockClassifier::new(config.mock_threshold)))
            }
        }
    }

    pub fn mock() -> Self {
        Self::Mock(MockClassifier::default())
    }
}

#[async_trait]
impl FraudClassifier for ClassifierClient {
    async fn predict(&self, features: &FeatureVector) -> Result<bool> {
        match self {
            Self::Http(c) => c.predict(features).await,
            Self::Mock(c) => c.predict(features).await,
        }
    }

    fn name(&self) -> &str {
        match self {
            Self::Http(c) => c.name(),
            Self::Mock(c) => c.name(),
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            Self::Http(c) => c.health_check().await,
            Self::Mock(c) => c.health_check().await,
        }
    }
}
