//! Client for the upstream financial-data API.
//!
//! Profiles live at `{base_url}/api/users/{user_id}/financial-data`. The base
//! URL varies per request, so the client only owns the connection pool.

use async_trait::async_trait;
use career_core::{CareerError, CareerResult, FinancialDataSource, UserFinancialData};
use reqwest::{Client, StatusCode, Url};
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 5;

#[derive(Clone)]
pub struct FinancialDataClient {
    client: Client,
}

impl FinancialDataClient {
    pub fn new(timeout: Duration) -> CareerResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CareerError::Upstream(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    pub fn with_defaults() -> CareerResult<Self> {
        Self::new(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Build the profile URL, encoding `user_id` as a single path segment.
    pub fn financial_data_url(base_url: &str, user_id: &str) -> CareerResult<Url> {
        let mut url = Url::parse(base_url).map_err(|e| {
            CareerError::Upstream(format!("invalid data API URL '{}': {}", base_url, e))
        })?;

        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                CareerError::Upstream(format!("data API URL '{}' cannot be a base", base_url))
            })?;
            segments
                .pop_if_empty()
                .extend(["api", "users", user_id, "financial-data"]);
        }

        Ok(url)
    }
}

#[async_trait]
impl FinancialDataSource for FinancialDataClient {
    async fn fetch_financial_data(
        &self,
        base_url: &str,
        user_id: &str,
    ) -> CareerResult<UserFinancialData> {
        let url = Self::financial_data_url(base_url, user_id)?;
        tracing::debug!("Fetching financial data from {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CareerError::Upstream(e.to_string()))?;

        let status = response.status();
        // Anything but 200 means no usable profile
        if status != StatusCode::OK {
            tracing::debug!("Financial data API returned {} for user {}", status, user_id);
            return Err(CareerError::NotFound);
        }

        let body = response
            .text()
            .await
            .map_err(|e| CareerError::Upstream(e.to_string()))?;

        serde_json::from_str::<UserFinancialData>(&body).map_err(|e| {
            CareerError::Malformed(format!("financial data for user {}: {}", user_id, e))
        })
    }
}
