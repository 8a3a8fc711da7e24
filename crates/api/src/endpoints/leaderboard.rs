//! Leaderboard endpoint.

use axum::{Router, extract::State, routing::get};
use molts_common::AppResult;
use molts_core::{LeaderboardQuery, ScoredPerformance};
use serde::Serialize;

use crate::{extractors::ApiQuery, middleware::AppState, response::ApiResponse};

/// Ranked performance list response.
#[derive(Serialize)]
pub struct LeaderboardResponse {
    pub performances: Vec<ScoredPerformance>,
}

/// Ranked performances, optionally filtered by `category` and capped by
/// `limit`.
async fn leaderboard(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<LeaderboardQuery>,
) -> AppResult<ApiResponse<LeaderboardResponse>> {
    let performances = state.leaderboard_service.leaderboard(query).await?;
    Ok(ApiResponse::ok(LeaderboardResponse { performances }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/leaderboard", get(leaderboard))
}
