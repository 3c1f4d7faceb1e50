//! Driving port for creating student accounts.

use async_trait::async_trait;

use crate::domain::{Credentials, Error, StudentId};

/// Domain use-case port for registration.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistrationService: Send + Sync {
    /// Create an account. Fails with `conflict` when the id is taken.
    ///
    /// Registration never establishes a session.
    async fn register(&self, credentials: &Credentials) -> Result<StudentId, Error>;
}
