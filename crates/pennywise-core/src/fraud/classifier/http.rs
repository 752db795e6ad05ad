//! HTTP scoring service backend
//!
//! Protocol: `POST {host}/predict` with `{"features": [f64; 7]}`, answered by
//! `{"prediction": 0}` or `{"prediction": 1}`. `GET {host}/health` is used
//! for health checks.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::FraudClassifier;
use crate::error::{Error, Result};
use crate::fraud::features::FeatureVector;

#[derive(Clone)]
pub struct HttpClassifier {
    http_client: Client,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct PredictRequest {
    features: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    prediction: i64,
}

impl HttpClassifier {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn host(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl FraudClassifier for HttpClassifier {
    async fn predict(&self, features: &FeatureVector) -> Result<bool> {
        let request = PredictRequest {
            features: features.to_vec(),
        };
        debug!(features = ?request.features, "Scoring transaction");

        let response = self
            .http_client
            .post(format!("{}/predict", self.base_url))
            .json(&request)
            .send()
            .await?
            .error_for_status()?;

        let body: PredictResponse = response.json().await?;
        match body.prediction {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(Error::Classifier(format!(
                "unexpected prediction value {}",
                other
            ))),
        }
    }

    fn name(&self) -> &str {
        "http"
    }

    async fn health_check(&self) -> bool {
        match self
            .http_client
            .get(format!("{}/health", self.base_url))
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }
}
