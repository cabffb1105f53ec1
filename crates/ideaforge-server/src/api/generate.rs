//! Pipeline-triggering route.

use axum::{extract::State, Extension, Json};
use serde::Serialize;

use ideaforge_pipeline::{run_generate, GenerateOptions};

use super::{map_pipeline_error, ApiError, ApiResponse, AppState, ResponseMeta};
use crate::middleware::RequestId;

#[derive(Debug, Serialize)]
pub struct GenerateData {
    /// Ideas accepted by this run after dedup.
    pub generated: usize,
    /// Ideas in the store after the run.
    pub total: usize,
}

/// `POST /api/v1/generate`
///
/// Runs the full fetch, filter, extract, persist sequence and reports
/// how many ideas the run added. Runs are synchronous: the response
/// waits for persistence to finish.
pub async fn generate_ideas(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<GenerateData>>, ApiError> {
    tracing::info!("generate run requested");

    let outcome = run_generate(
        state.source.as_ref(),
        state.llm.as_ref(),
        state.store.as_ref(),
        GenerateOptions {
            filter_cap: state.filter_cap,
            persist: true,
        },
    )
    .await
    .map_err(|e| map_pipeline_error(req_id.0.clone(), &e))?;

    tracing::info!(
        generated = outcome.generated,
        total = outcome.total,
        "generate run finished"
    );

    Ok(Json(ApiResponse {
        data: GenerateData {
            generated: outcome.generated,
            total: outcome.total,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}
