//! Database entities.

pub mod competition;
pub mod entry;
pub mod performance;
pub mod vote;

pub use competition::Entity as Competition;
pub use entry::Entity as Entry;
pub use performance::Entity as Performance;
pub use vote::Entity as Vote;

pub use competition::CompetitionStatus;
pub use performance::Category;
