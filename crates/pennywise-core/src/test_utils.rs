//! Test utilities for pennywise-core
//!
//! Provides a mock fraud scoring server speaking the same protocol as the
//! real service, for exercising the HTTP classifier in tests.

use std::net::SocketAddr;

use axum::{
    extract::{Json, State},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

/// How the mock server answers `/predict`
#[derive(Debug, Clone, Copy)]
enum Scoring {
    /// 1 when |amount| exceeds the threshold, else 0
    Threshold(f64),
    /// Always this value, valid or not
    Fixed(i64),
}

/// Mock scoring server for tests
pub struct MockScoringServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockScoringServer {
    /// Start a server flagging amounts above `threshold`
    pub async fn start(threshold: f64) -> Self {
        Self::spawn(Scoring::Threshold(threshold)).await
    }

    /// Start a server answering every request with `prediction`
    pub async fn start_with_prediction(prediction: i64) -> Self {
        Self::spawn(Scoring::Fixed(prediction)).await
    }

    async fn spawn(scoring: Scoring) -> Self {
        let app = Router::new()
            .route("/health", get(handle_health))
            .route("/predict", post(handle_predict))
            .with_state(scoring);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockScoringServer {
    fn drop(&mut self) {
        self.stop();
    }
}

#[derive(Debug, Deserialize)]
struct PredictRequest {
    features: Vec<f64>,
}

#[derive(Debug, Serialize)]
struct PredictResponse {
    prediction: i64,
}

async fn handle_health() -> &'static str {
    "ok"
}

async fn handle_predict(
    State(scoring): State<Scoring>,
    Json(request): Json<PredictRequest>,
) -> Json<PredictResponse> {
    let prediction = match scoring {
        Scoring::Fixed(value) => value,
        Scoring::Threshold(threshold) => {
            // Index 2 is the amount
            let amount = request.features.get(2).copied().unwrap_or(0.0);
            i64::from(amount.abs() > threshold)
        }
    };
    Json(PredictResponse { prediction })
}
