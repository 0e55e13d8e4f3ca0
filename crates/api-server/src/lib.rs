use anyhow::Context;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use career_advisor::CareerAdvisor;
use career_core::{
    AnalysisEnvelope, AnalysisRequest, CareerError, CareerRecommendation, Course,
};
use financial_data_client::FinancialDataClient;
use llm_client::GeminiClient;
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

pub mod career_routes;
pub mod config;
pub mod request_id;
pub mod security_headers;

pub use config::{HttpOptions, ServerConfig};

use career_routes::career_routes;
use request_id::request_id_middleware;
use security_headers::{security_headers_middleware, SecurityHeaders};

// ─── State ──────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct AppState {
    pub advisor: Arc<CareerAdvisor>,
}

impl AppState {
    pub fn new(advisor: CareerAdvisor) -> Self {
        Self {
            advisor: Arc::new(advisor),
        }
    }

    /// Wire the real upstream and Gemini clients.
    pub fn from_config(config: &ServerConfig) -> anyhow::Result<Self> {
        let data_source = Arc::new(
            FinancialDataClient::new(config.financial_data_timeout)
                .context("Failed to create financial data client")?,
        );
        let model = Arc::new(
            GeminiClient::new(config.llm.clone()).context("Failed to create Gemini client")?,
        );

        let advisor = CareerAdvisor::new(data_source, model)
            .with_default_data_api_url(config.default_data_api_url.as_str());

        Ok(Self::new(advisor))
    }
}

// ─── Errors ─────────────────────────────────────────────────────────────────

/// Error body returned by every failing endpoint
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    pub detail: String,
}

#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    detail: String,
}

impl AppError {
    pub fn with_status(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!("{}", self.detail);
        }
        (self.status, Json(ErrorBody { detail: self.detail })).into_response()
    }
}

/// Map CareerError to AppError: only a missing profile (and a bad request)
/// get their own status, everything else is a 500.
pub fn career_err(e: CareerError) -> AppError {
    match e {
        CareerError::NotFound => AppError::with_status(StatusCode::NOT_FOUND, e.to_string()),
        CareerError::InvalidRequest(_) => {
            AppError::with_status(StatusCode::BAD_REQUEST, e.to_string())
        }
        other => AppError::with_status(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Analysis failed: {}", other),
        ),
    }
}

// ─── OpenAPI ────────────────────────────────────────────────────────────────

#[derive(OpenApi)]
#[openapi(
    info(title = "CareerCompass AI Agent", version = "1.0.0"),
    paths(career_routes::health, career_routes::analyze_career),
    components(schemas(
        AnalysisRequest,
        AnalysisEnvelope,
        CareerRecommendation,
        Course,
        ErrorBody,
        career_routes::HealthResponse
    )),
    tags(
        (name = "Health", description = "Liveness probe"),
        (name = "Career", description = "Career guidance from financial profiles")
    )
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

// ─── Router ─────────────────────────────────────────────────────────────────

fn cors_layer(options: &HttpOptions) -> CorsLayer {
    match &options.cors_allowed_origins {
        None => CorsLayer::permissive(),
        Some(origins) => CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins.iter().cloned()))
            .allow_methods(Any)
            .allow_headers(Any),
    }
}

pub fn build_router(state: AppState, options: &HttpOptions) -> Router {
    Router::new()
        .merge(career_routes())
        .route("/openapi.json", get(openapi_json))
        .with_state(state)
        .layer(middleware::from_fn_with_state(
            SecurityHeaders {
                hsts: options.enable_hsts,
            },
            security_headers_middleware,
        ))
        .layer(cors_layer(options))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
}

// ─── Startup ────────────────────────────────────────────────────────────────

/// `RUST_LOG` filter (default `info`); `RUST_LOG_FORMAT=json` for JSON lines.
pub fn init_tracing() {
    let json_logging = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if json_logging {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for SIGINT: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received SIGINT, shutting down..."),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down..."),
    }
}

pub async fn run_server() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServerConfig::from_env()?;
    let state = AppState::from_config(&config)?;

    tracing::info!("Starting CareerCompass AI Agent");
    tracing::info!("  Model: {}", state.advisor.model_name());
    tracing::info!("  Default data API: {}", config.default_data_api_url);
    tracing::info!(
        "  Financial data timeout: {}s",
        config.financial_data_timeout.as_secs()
    );
    let app = build_router(state, &config.http);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shut down.");
    Ok(())
}
