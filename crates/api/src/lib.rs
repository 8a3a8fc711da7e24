//! HTTP API layer for molts-got-talent.
//!
//! - **Endpoints**: competitions, leaderboard, submission, voting, health
//! - **Extractors**: JSON/query/path wrappers that reject with the API error
//!   envelope, and the voter identity of the caller
//! - **Identity**: pluggable voter identity resolution
//!
//! Built on Axum 0.8.

pub mod endpoints;
pub mod extractors;
pub mod identity;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use identity::{ForwardedHeaderResolver, VoterIdentityResolver};
pub use middleware::AppState;
