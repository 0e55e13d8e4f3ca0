use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Upstream data service used when a request does not name one.
pub const DEFAULT_DATA_API_URL: &str = "http://mock-data-api-service:8080";

/// Inbound analysis request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mock_data_api_url: Option<String>,
}

/// Upstream scalar taken as-is and rendered into the prompt.
///
/// Strings render bare, anything else renders as its JSON text. The field
/// must still be present: a missing key fails deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Other(Value),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Other(v) => write!(f, "{}", v),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<Value> for FieldValue {
    fn from(v: Value) -> Self {
        match v {
            Value::String(s) => FieldValue::Text(s),
            other => FieldValue::Other(other),
        }
    }
}

/// Financial profile served by the upstream data API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFinancialData {
    pub name: FieldValue,
    pub profile: FieldValue,
    pub monthly_income: FieldValue,
    pub career_stage: FieldValue,
    /// Category -> amount, in the order the upstream sent them
    pub spending_categories: Map<String, Value>,
    pub recent_transactions: Vec<Value>,
    pub goals: Vec<String>,
}

/// A course suggested as part of a recommendation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub name: String,
    pub provider: String,
    pub estimated_cost: String,
}

/// Career guidance produced by the generative model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CareerRecommendation {
    pub primary_goal: String,
    pub recommended_skills: Vec<String>,
    pub suggested_courses: Vec<Course>,
    pub financial_advice: String,
    pub next_steps: Vec<String>,
}

impl CareerRecommendation {
    /// Static recommendation used when the model output cannot be parsed.
    pub fn fallback() -> Self {
        Self {
            primary_goal: "Build technical skills for career advancement".to_string(),
            recommended_skills: vec![
                "Data Analysis".to_string(),
                "Python Programming".to_string(),
                "Communication".to_string(),
            ],
            suggested_courses: vec![
                Course {
                    name: "Python for Data Science".to_string(),
                    provider: "Coursera".to_string(),
                    estimated_cost: "$49".to_string(),
                },
                Course {
                    name: "Excel to Python".to_string(),
                    provider: "Udemy".to_string(),
                    estimated_cost: "$85".to_string(),
                },
            ],
            financial_advice: "Consider allocating 15% of income to skill development"
                .to_string(),
            next_steps: vec![
                "Start with one online course this month".to_string(),
                "Set up a dedicated learning budget".to_string(),
                "Track progress weekly".to_string(),
            ],
        }
    }
}

/// Response body of a successful analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct AnalysisEnvelope {
    pub success: bool,
    pub user_id: String,
    #[cfg_attr(feature = "openapi", schema(value_type = String))]
    pub user_profile: FieldValue,
    pub analysis: CareerRecommendation,
    pub confidence: String,
}

impl AnalysisEnvelope {
    pub fn new(user_id: String, user_profile: FieldValue, analysis: CareerRecommendation) -> Self {
        Self {
            success: true,
            user_id,
            user_profile,
            analysis,
            confidence: "high".to_string(),
        }
    }
}
