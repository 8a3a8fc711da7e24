//! Voter identity.
//!
//! The core only relies on "one vote per identity per performance". How an
//! identity is obtained (request-origin heuristic, authenticated principal)
//! is decided by the caller.

use std::fmt;

/// Prefix carried by every voter identity token.
pub const VOTER_PREFIX: &str = "voter-";

/// Identity used to deduplicate votes.
///
/// Not a verified account: two callers presenting the same token are the
/// same voter as far as deduplication is concerned.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VoterId(String);

impl VoterId {
    /// Build an identity from an origin key (an address, a principal ID...).
    #[must_use]
    pub fn from_origin(origin: &str) -> Self {
        Self(format!("{VOTER_PREFIX}{origin}"))
    }

    /// The identity token as stored in `votes.voter_id`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VoterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
