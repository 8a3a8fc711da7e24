//! Voter identity resolution.

use async_trait::async_trait;
use axum::http::{HeaderMap, request::Parts};
use molts_common::AppResult;
use molts_core::VoterId;

/// Origin used when a request carries no forwarding headers.
pub const ANONYMOUS_ORIGIN: &str = "anonymous";

/// Derives the identity a vote is attributed to.
///
/// Vote deduplication only sees the resulting [`VoterId`], so swapping the
/// resolver (for an authenticated principal, say) leaves the core untouched.
#[async_trait]
pub trait VoterIdentityResolver: Send + Sync {
    /// Resolve the identity for an incoming request.
    async fn resolve(&self, parts: &Parts) -> AppResult<VoterId>;
}

/// Resolves identity from proxy forwarding headers.
///
/// Takes the first `X-Forwarded-For` entry, then `X-Real-IP`, then the
/// `anonymous` sentinel. Headers are client-controlled: this is a
/// deduplication heuristic, not authentication. Callers behind one NAT share
/// an identity, and a spoofed header impersonates another caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForwardedHeaderResolver;

impl ForwardedHeaderResolver {
    /// The origin key for a set of request headers.
    #[must_use]
    pub fn origin(headers: &HeaderMap) -> String {
        if let Some(first) = header_str(headers, "x-forwarded-for")
            .and_then(|xff| xff.split(',').next())
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            return first.to_string();
        }

        if let Some(real_ip) = header_str(headers, "x-real-ip")
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            return real_ip.to_string();
        }

        ANONYMOUS_ORIGIN.to_string()
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

#[async_trait]
impl VoterIdentityResolver for ForwardedHeaderResolver {
    async fn resolve(&self, parts: &Parts) -> AppResult<VoterId> {
        Ok(VoterId::from_origin(&Self::origin(&parts.headers)))
    }
}
