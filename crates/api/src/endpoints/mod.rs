//! API endpoints.

mod competitions;
mod health;
mod leaderboard;
mod performances;
mod vote;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(competitions::router())
        .merge(leaderboard::router())
        .merge(performances::router())
        .merge(vote::router())
        .merge(health::router())
}
