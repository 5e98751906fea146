//! HTTP client for a Pandeia-equivalent calculator service.

use std::time::Duration;

use async_trait::async_trait;

use super::{CalculationOutcome, CalculationRequest, CalculatorError, RadiometricCalculator};
use crate::config::ServiceSettings;

/// Client for the external radiometric calculator. One attempt per call:
/// retry policy belongs to the caller.
pub struct PandeiaServiceClient {
    client: reqwest::Client,
    endpoint: String,
}

impl PandeiaServiceClient {
    pub fn new(endpoint: &str, settings: &ServiceSettings) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl RadiometricCalculator for PandeiaServiceClient {
    fn backend_name(&self) -> &'static str {
        "pandeia"
    }

    async fn calculate(
        &self,
        request: &CalculationRequest,
    ) -> Result<CalculationOutcome, CalculatorError> {
        let url = format!("{}/calculate", self.endpoint);
        let response = self.client.post(&url).json(request).send().await?;

        let status = response.status();
        if status.is_client_error() {
            let message = response.text().await.unwrap_or_default();
            return Err(CalculatorError::InvalidRequest(message));
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(CalculatorError::Service {
                status: status.as_u16(),
                message,
            });
        }
        let outcome = response.json::<CalculationOutcome>().await?;
        Ok(outcome)
    }
}
