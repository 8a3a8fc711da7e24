//! Performance endpoints.

use axum::{
    Router,
    extract::State,
    routing::{get, post},
};
use molts_common::AppResult;
use molts_core::{ScoredPerformance, SubmitPerformanceInput};
use molts_db::entities::performance;
use serde::Serialize;

use crate::{
    extractors::{ApiJson, ApiPath},
    middleware::AppState,
    response::ApiResponse,
};

/// Submitted performance response.
#[derive(Serialize)]
pub struct SubmitResponse {
    pub performance: performance::Model,
}

/// Single performance response.
#[derive(Serialize)]
pub struct ShowResponse {
    pub performance: ScoredPerformance,
}

/// Submit a new performance.
async fn submit(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<SubmitPerformanceInput>,
) -> AppResult<ApiResponse<SubmitResponse>> {
    let performance = state.performance_service.submit(input).await?;
    Ok(ApiResponse::ok(SubmitResponse { performance }))
}

/// Show one performance with its aggregates.
async fn show(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> AppResult<ApiResponse<ShowResponse>> {
    let performance = state.performance_service.get_scored(&id).await?;
    Ok(ApiResponse::ok(ShowResponse { performance }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/submit", post(submit))
        .route("/performances/{id}", get(show))
}
