//! Port for one-way password hashing.
//!
//! Implementations are CPU bound; adapters move the work off the async
//! executor.
use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::domain::PasswordDigest;

use super::define_port_error;

define_port_error! {
    /// Failures raised while hashing or verifying passwords.
    pub enum CredentialHasherError {
        /// Producing a digest failed.
        Hashing { message: String } => "password hashing failed: {message}",
        /// A stored digest could not be parsed.
        MalformedDigest { message: String } => "stored password digest is malformed: {message}",
    }
}

/// Driven port for salted password digests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialHasher: Send + Sync {
    /// Derive a fresh salted digest for `password`.
    async fn hash(&self, password: Zeroizing<String>)
    -> Result<PasswordDigest, CredentialHasherError>;

    /// Check `password` against a stored digest.
    async fn verify(
        &self,
        password: Zeroizing<String>,
        digest: PasswordDigest,
    ) -> Result<bool, CredentialHasherError>;
}
