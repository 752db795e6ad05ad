//! Mock classifier for tests and offline use

use async_trait::async_trait;

use super::FraudClassifier;
use crate::error::Result;
use crate::fraud::features::FeatureVector;

/// Flags any transaction whose absolute amount exceeds `threshold`
#[derive(Debug, Clone)]
pub struct MockClassifier {
    pub threshold: f64,
    /// Whether health_check should return true
    pub healthy: bool,
}

impl Default for MockClassifier {
    fn default() -> Self {
        Self::new(1000.0)
    }
}

impl MockClassifier {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            healthy: true,
        }
    }

    /// Flags everything
    pub fn always() -> Self {
        Self::new(f64::NEG_INFINITY)
    }

    /// Flags nothing
    pub fn never() -> Self {
        Self::new(f64::INFINITY)
    }
}

#[async_trait]
impl FraudClassifier for MockClassifier {
    async fn predict(&self, features: &FeatureVector) -> Result<bool> {
        Ok(features.amount.abs() > self.threshold)
    }

    fn name(&self) -> &str {
        "mock"
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features(amount: f64) -> FeatureVector {
        FeatureVector {
            merchant_code: -1,
            category_code: -1,
            amount,
            hour: 12,
            weekday: 0,
            day: 1,
            month: 1,
        }
    }

    #[tokio::test]
    async fn test_threshold() {
        let mock = MockClassifier::default();
        assert!(mock.predict(&features(1500.0)).await.unwrap());
        assert!(mock.predict(&features(-1500.0)).await.unwrap());
        assert!(!mock.predict(&features(1000.0)).await.unwrap());
    }

    #[tokio::test]
    async fn test_always_and_never() {
        assert!(MockClassifier::always().predict(&features(0.0)).await.unwrap());
        assert!(!MockClassifier::never().predict(&features(1e12)).await.unwrap());
        assert!(MockClassifier::never().health_check().await);
    }
}
