use career_core::{
    AnalysisEnvelope, AnalysisRequest, CareerError, CareerResult, FinancialDataSource,
    DEFAULT_DATA_API_URL,
};
use llm_client::{LlmError, LlmProvider};
use std::sync::Arc;

pub mod extract;
pub mod prompt;

pub use extract::{extract_json_block, extract_recommendation, parse_recommendation};
pub use prompt::build_career_prompt;

/// Map LlmError onto the career error taxonomy.
fn llm_err(e: LlmError) -> CareerError {
    match e {
        LlmError::InvalidResponse(_) | LlmError::Serialization(_) => {
            CareerError::Unknown(format!("model response: {}", e))
        }
        other => CareerError::ModelUnavailable(other.to_string()),
    }
}

/// Fetch profile, prompt the model, reshape the answer.
pub struct CareerAdvisor {
    data_source: Arc<dyn FinancialDataSource>,
    model: Arc<dyn LlmProvider>,
    default_data_api_url: String,
}

impl CareerAdvisor {
    pub fn new(data_source: Arc<dyn FinancialDataSource>, model: Arc<dyn LlmProvider>) -> Self {
        Self {
            data_source,
            model,
            default_data_api_url: DEFAULT_DATA_API_URL.to_string(),
        }
    }

    /// Upstream used when a request carries no `mockDataApiUrl`
    pub fn with_default_data_api_url(mut self, url: impl Into<String>) -> Self {
        self.default_data_api_url = url.into();
        self
    }

    pub fn model_name(&self) -> &str {
        self.model.model_name()
    }

    pub async fn analyze(&self, request: &AnalysisRequest) -> CareerResult<AnalysisEnvelope> {
        let user_id = request.user_id.as_str();
        if user_id.trim().is_empty() {
            return Err(CareerError::InvalidRequest(
                "userId must not be empty".to_string(),
            ));
        }

        let base_url = request
            .mock_data_api_url
            .as_deref()
            .unwrap_or(&self.default_data_api_url);

        tracing::info!("Analyzing career path for user {} via {}", user_id, base_url);

        let data = self
            .data_source
            .fetch_financial_data(base_url, user_id)
            .await?;

        let prompt = build_career_prompt(&data)?;
        let raw = self.model.generate(&prompt).await.map_err(llm_err)?;
        tracing::debug!("Model returned {} bytes for user {}", raw.len(), user_id);

        let (analysis, used_fallback) = extract_recommendation(&raw);
        if used_fallback {
            tracing::warn!("Served fallback recommendation for user {}", user_id);
        }

        Ok(AnalysisEnvelope::new(
            request.user_id.clone(),
            data.profile,
            analysis,
        ))
    }
}
