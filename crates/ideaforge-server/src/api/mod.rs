mod generate;
mod ideas;
mod signals;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use ideaforge_llm::LlmClient;
use ideaforge_pipeline::PipelineError;
use ideaforge_reddit::RedditSource;
use ideaforge_store::{IdeaStore, PrimaryStatus};

use crate::middleware::{request_id, RequestId};

#[derive(Clone)]
pub struct AppState {
    pub source: Arc<RedditSource>,
    pub llm: Arc<LlmClient>,
    pub store: Arc<IdeaStore>,
    /// Default sample size for the signals route.
    pub sample_count: usize,
    /// Upper bound on signals serialized into the relevance prompt.
    pub filter_cap: usize,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    primary_store: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// Applies the default and the `1..=100` bound to a requested sample size.
pub(super) fn normalize_count(requested: Option<usize>, default: usize) -> usize {
    requested.unwrap_or(default).clamp(1, 100)
}

pub(super) fn map_pipeline_error(request_id: String, error: &PipelineError) -> ApiError {
    tracing::error!(error = %error, "generate run failed");
    ApiError::new(request_id, "internal_error", "idea generation failed")
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
        ])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/signals", get(signals::list_signals))
        .route("/api/v1/generate", post(generate::generate_ideas))
        .route("/api/v1/ideas", get(ideas::list_ideas))
        .route("/api/v1/ideas/fresh", get(ideas::list_fresh_ideas))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

/// Liveness plus primary-store reachability.
///
/// Always `200 OK`: an unconfigured or unreachable primary degrades the
/// report, it does not fail it, because the snapshot backend keeps every
/// route serviceable.
async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let meta = ResponseMeta::new(req_id.0);

    let (status, primary_store) = match state.store.primary_status().await {
        PrimaryStatus::Ok => ("ok", "ok"),
        PrimaryStatus::Unconfigured => ("degraded", "unconfigured"),
        PrimaryStatus::Unavailable => {
            tracing::warn!("health check: primary store unavailable");
            ("degraded", "unavailable")
        }
    };

    (
        StatusCode::OK,
        Json(ApiResponse {
            data: HealthData {
                status,
                primary_store,
            },
            meta,
        }),
    )
}
