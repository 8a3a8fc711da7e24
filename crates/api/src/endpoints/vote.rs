//! Vote endpoint.

use axum::{Router, extract::State, routing::post};
use molts_common::AppResult;
use molts_core::CastVoteInput;
use molts_db::entities::vote;
use serde::Serialize;

use crate::{
    extractors::{ApiJson, Voter},
    middleware::AppState,
    response::ApiResponse,
};

/// Recorded vote response.
#[derive(Serialize)]
pub struct VoteResponse {
    pub vote: vote::Model,
}

/// Cast a vote as the calling identity.
async fn vote(
    Voter(voter): Voter,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CastVoteInput>,
) -> AppResult<ApiResponse<VoteResponse>> {
    let vote = state.vote_service.cast_vote(&voter, input).await?;
    Ok(ApiResponse::ok(VoteResponse { vote }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/vote", post(vote))
}
