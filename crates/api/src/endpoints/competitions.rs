//! Competition endpoints.

use axum::{Router, extract::State, routing::get};
use molts_common::AppResult;
use molts_core::CompetitionSummary;
use serde::Serialize;

use crate::{middleware::AppState, response::ApiResponse};

/// Competition list response.
#[derive(Serialize)]
pub struct CompetitionsResponse {
    pub competitions: Vec<CompetitionSummary>,
}

/// List competitions, newest first.
async fn list(State(state): State<AppState>) -> AppResult<ApiResponse<CompetitionsResponse>> {
    let competitions = state.competition_service.list().await?;
    Ok(ApiResponse::ok(CompetitionsResponse { competitions }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/competitions", get(list))
}
