//! Port abstraction for the lab catalogue.
use async_trait::async_trait;

use crate::domain::{Lab, NewLab};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by lab repository adapters.
    pub enum LabRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "lab repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "lab repository query failed: {message}",
    }
}

/// Result of a catalogue seeding attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The table was empty and `inserted` labs were added.
    Seeded {
        /// Number of labs inserted.
        inserted: usize,
    },
    /// The table already held `existing` labs; nothing was inserted.
    AlreadyPopulated {
        /// Number of labs present.
        existing: u64,
    },
}

/// Driven port for the lab catalogue.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LabRepository: Send + Sync {
    /// All labs ordered by name using the store's collation.
    async fn list_labs(&self) -> Result<Vec<Lab>, LabRepositoryError>;

    /// Insert `labs` only if the catalogue is empty.
    ///
    /// The emptiness check and the inserts are atomic with respect to other
    /// seeding attempts.
    async fn seed_if_empty(&self, labs: &[NewLab]) -> Result<SeedOutcome, LabRepositoryError>;
}
