//! Career Analysis API Routes
//!
//! Health probe and the career analysis endpoint.

use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};
use career_core::{AnalysisEnvelope, AnalysisRequest};
use serde::Serialize;

use crate::request_id::RequestId;
use crate::{career_err, AppError, AppState};

pub const SERVICE_NAME: &str = "ai-career-agent";

#[derive(Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}

pub fn career_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/api/analyze-career", post(analyze_career))
}

#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is running", body = HealthResponse)),
    tag = "Health"
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: SERVICE_NAME.to_string(),
    })
}

#[utoipa::path(
    post,
    path = "/api/analyze-career",
    request_body = AnalysisRequest,
    responses(
        (status = 200, description = "Career recommendation for the user", body = AnalysisEnvelope),
        (status = 400, description = "Empty userId", body = crate::ErrorBody),
        (status = 404, description = "User data not found upstream", body = crate::ErrorBody),
        (status = 500, description = "Analysis failed", body = crate::ErrorBody)
    ),
    tag = "Career"
)]
pub async fn analyze_career(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<AnalysisRequest>,
) -> Result<Json<AnalysisEnvelope>, AppError> {
    let envelope = state.advisor.analyze(&request).await.map_err(|e| {
        tracing::warn!(
            request_id = %request_id.0,
            user_id = %request.user_id,
            "Career analysis failed: {}",
            e
        );
        career_err(e)
    })?;
    Ok(Json(envelope))
}
