//! Driving port for login/authentication use-cases.
//!
//! Inbound adapters call it to authenticate credentials without knowing the
//! backing infrastructure, so HTTP handler tests can substitute a double.

use async_trait::async_trait;

use crate::domain::{Credentials, Error, StudentId};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated student id.
    ///
    /// Unknown students and wrong passwords fail with the same
    /// `unauthorized("invalid credentials")` error.
    async fn authenticate(&self, credentials: &Credentials) -> Result<StudentId, Error>;
}
