//! ID generation utilities.

use ulid::Ulid;

/// Length of a generated identifier.
pub const ID_LENGTH: usize = 26;

/// ID generator for entities.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    _private: (),
}

impl IdGenerator {
    /// Create a new ID generator.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }

    /// Generate a new ULID-based ID.
    ///
    /// ULIDs sort by creation time, which keeps the `id` tie-break on the
    /// leaderboard aligned with submission order.
    #[must_use]
    pub fn generate(&self) -> String {
        Ulid::new().to_string().to_lowercase()
    }

    /// Check that `id` has the shape of a generated identifier.
    ///
    /// Used to reject obviously malformed path parameters before querying.
    #[must_use]
    pub fn is_valid(id: &str) -> bool {
        id.len() == ID_LENGTH && Ulid::from_string(id).is_ok()
    }
}
