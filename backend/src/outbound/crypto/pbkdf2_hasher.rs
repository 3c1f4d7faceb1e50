//! PBKDF2-HMAC-SHA256 implementation of [`CredentialHasher`].
//!
//! Digests use the PHC string format (`$pbkdf2-sha256$i=...,l=32$salt$hash`)
//! so the round count travels with each stored hash and can be raised later
//! without invalidating existing accounts.

use async_trait::async_trait;
use pbkdf2::Pbkdf2;
use pbkdf2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use rand::RngCore;
use zeroize::Zeroizing;

use crate::domain::PasswordDigest;
use crate::domain::ports::{CredentialHasher, CredentialHasherError};

/// Rounds used when none are configured.
pub const DEFAULT_ROUNDS: u32 = 600_000;

/// Smallest round count accepted; lower values are raised to this.
pub const MIN_ROUNDS: u32 = 1_000;

const SALT_LEN: usize = 16;
const OUTPUT_LEN: usize = 32;

/// Salted PBKDF2 hasher running on the blocking thread pool.
#[derive(Debug, Clone, Copy)]
pub struct Pbkdf2Hasher {
    rounds: u32,
}

impl Default for Pbkdf2Hasher {
    fn default() -> Self {
        Self::new(DEFAULT_ROUNDS)
    }
}

impl Pbkdf2Hasher {
    /// Create a hasher deriving keys with `rounds` iterations.
    #[must_use]
    pub fn new(rounds: u32) -> Self {
        Self {
            rounds: rounds.max(MIN_ROUNDS),
        }
    }

    /// Iteration count for new digests.
    #[must_use]
    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    fn hash_blocking(rounds: u32, password: &[u8]) -> Result<String, CredentialHasherError> {
        let mut salt_bytes = [0_u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt_bytes);
        let salt = SaltString::encode_b64(&salt_bytes)
            .map_err(|err| CredentialHasherError::hashing(err.to_string()))?;
        let params = pbkdf2::Params {
            rounds,
            output_length: OUTPUT_LEN,
        };
        Pbkdf2
            .hash_password_customized(password, None, None, params, &salt)
            .map(|hash| hash.to_string())
            .map_err(|err| CredentialHasherError::hashing(err.to_string()))
    }

    fn verify_blocking(password: &[u8], encoded: &str) -> Result<bool, CredentialHasherError> {
        let parsed = PasswordHash::new(encoded)
            .map_err(|err| CredentialHasherError::malformed_digest(err.to_string()))?;
        match Pbkdf2.verify_password(password, &parsed) {
            Ok(()) => Ok(true),
            Err(pbkdf2::password_hash::Error::Password) => Ok(false),
            Err(err) => Err(CredentialHasherError::malformed_digest(err.to_string())),
        }
    }
}

fn join_error(err: tokio::task::JoinError) -> CredentialHasherError {
    CredentialHasherError::hashing(format!("hashing task aborted: {err}"))
}

#[async_trait]
impl CredentialHasher for Pbkdf2Hasher {
    async fn hash(
        &self,
        password: Zeroizing<String>,
    ) -> Result<PasswordDigest, CredentialHasherError> {
        let rounds = self.rounds;
        let encoded =
            tokio::task::spawn_blocking(move || Self::hash_blocking(rounds, password.as_bytes()))
                .await
                .map_err(join_error)??;
        PasswordDigest::new(encoded).map_err(|err| CredentialHasherError::hashing(err.to_string()))
    }

    async fn verify(
        &self,
        password: Zeroizing<String>,
        digest: PasswordDigest,
    ) -> Result<bool, CredentialHasherError> {
        tokio::task::spawn_blocking(move || {
            Self::verify_blocking(password.as_bytes(), digest.as_str())
        })
        .await
        .map_err(join_error)?
    }
}
