// Model-serving client (TensorFlow Serving REST predict API)
use crate::application::capabilities::Predictor;
use crate::application::error::CapabilityError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const CAPABILITY: &str = "model runtime";

#[derive(Debug, Clone)]
pub struct RemotePredictor {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
}

#[derive(Debug, Serialize)]
struct PredictRequest<'a> {
    instances: [&'a [f64]; 1],
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Vec<f64>>,
    #[serde(default)]
    error: Option<String>,
}

impl RemotePredictor {
    pub fn new(client: reqwest::Client, endpoint: &str, model: &str, timeout: Duration) -> Self {
        Self {
            client,
            url: Self::build_predict_url(endpoint, model),
            timeout,
        }
    }

    fn build_predict_url(endpoint: &str, model: &str) -> String {
        format!(
            "{}/v1/models/{}:predict",
            endpoint.trim_end_matches('/'),
            urlencoding::encode(model)
        )
    }
}

#[async_trait]
impl Predictor for RemotePredictor {
    async fn predict(&self, features: &[f64]) -> Result<Vec<f64>, CapabilityError> {
        let response = self
            .client
            .post(&self.url)
            .timeout(self.timeout)
            .json(&PredictRequest {
                instances: [features],
            })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CapabilityError::Timeout {
                        capability: CAPABILITY,
                        timeout: self.timeout,
                    }
                } else {
                    CapabilityError::failed(CAPABILITY, e)
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(CapabilityError::failed(
                CAPABILITY,
                format!("status {}: {}", status, body),
            ));
        }

        let data = response
            .json::<PredictResponse>()
            .await
            .map_err(|e| CapabilityError::malformed(CAPABILITY, e))?;

        if let Some(error) = data.error {
            return Err(CapabilityError::failed(CAPABILITY, error));
        }

        data.predictions
            .into_iter()
            .next()
            .ok_or_else(|| CapabilityError::malformed(CAPABILITY, "empty predictions"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predict_url() {
        assert_eq!(
            RemotePredictor::build_predict_url("http://models:8501/", "location-risk"),
            "http://models:8501/v1/models/location-risk:predict"
        );
    }

    #[test]
    fn test_request_body_shape() {
        let features = [0.5, 1.0];
        let body = serde_json::to_value(PredictRequest {
            instances: [&features],
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({ "instances": [[0.5, 1.0]] }));
    }
}
