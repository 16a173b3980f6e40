// SPDX-License-Identifier: MIT

//! HTTP client for the external carbon prediction service.
//!
//! The service exposes `POST /predict` and answers `{"carbon_footprint": n}`.
//! Callers are expected to treat any error here as a signal to fall back to
//! the local estimator; this client never retries.

use crate::error::AppError;
use crate::services::estimator::LifestyleInput;
use serde::Deserialize;

/// Prediction service client.
#[derive(Clone)]
pub struct PredictionClient {
    http: reqwest::Client,
    base_url: String,
}

/// Response body from the prediction service.
#[derive(Debug, Deserialize)]
pub struct PredictionResponse {
    pub carbon_footprint: f64,
}

impl PredictionClient {
    /// Create a new client for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Request a footprint prediction for the given lifestyle inputs.
    pub async fn predict(&self, input: &LifestyleInput) -> Result<f64, AppError> {
        let url = format!("{}/predict", self.base_url);

        let response = self
            .http
            .post(&url)
            .json(input)
            .send()
            .await
            .map_err(|e| AppError::Predictor(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Predictor(format!(
                "Prediction service returned {}: {}",
                status, body
            )));
        }

        let prediction: PredictionResponse = response
            .json()
            .await
            .map_err(|e| AppError::Predictor(format!("Invalid response body: {}", e)))?;

        Ok(prediction.carbon_footprint)
    }
}
