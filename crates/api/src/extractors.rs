//! Request extractors.
//!
//! Axum's own extractors reject with plain-text bodies; these wrappers turn
//! every rejection into an [`AppError`] so clients always get the JSON error
//! envelope.

use axum::{
    extract::{FromRequest, FromRequestParts},
    http::request::Parts,
};
use molts_common::AppError;
use molts_core::VoterId;

use crate::middleware::AppState;

/// JSON request body.
#[derive(Debug, Clone, Copy, Default, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Query string.
#[derive(Debug, Clone, Copy, Default, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

/// Path parameters.
#[derive(Debug, Clone, Copy, Default, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

/// Identity of the caller, as resolved by the configured
/// [`VoterIdentityResolver`](crate::identity::VoterIdentityResolver).
#[derive(Debug, Clone)]
pub struct Voter(pub VoterId);

impl FromRequestParts<AppState> for Voter {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        state.identity_resolver.resolve(parts).await.map(Self)
    }
}
