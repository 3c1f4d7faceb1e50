//! Student identity and stored credential digest.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum length of a student identifier, in characters.
pub const STUDENT_ID_MAX: usize = 100;
/// Maximum length of a stored password digest.
pub const PASSWORD_DIGEST_MAX: usize = 200;

/// Validation errors for student values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StudentValidationError {
    /// The identifier was blank once trimmed.
    #[error("student id must not be empty")]
    EmptyId,
    /// The identifier exceeds [`STUDENT_ID_MAX`] characters.
    #[error("student id must be at most {max} characters")]
    IdTooLong {
        /// Maximum permitted length.
        max: usize,
    },
    /// The identifier contains control characters.
    #[error("student id must not contain control characters")]
    IdInvalidCharacters,
    /// The digest was blank.
    #[error("password digest must not be empty")]
    EmptyDigest,
    /// The digest exceeds [`PASSWORD_DIGEST_MAX`] characters.
    #[error("password digest must be at most {max} characters")]
    DigestTooLong {
        /// Maximum permitted length.
        max: usize,
    },
}

/// Unique student identifier chosen at registration.
///
/// ## Invariants
/// - Trimmed of surrounding whitespace.
/// - Between 1 and [`STUDENT_ID_MAX`] characters.
/// - Free of control characters.
///
/// # Examples
/// ```
/// use labrank::domain::StudentId;
///
/// let id = StudentId::new("  s1234567 ").expect("valid id");
/// assert_eq!(id.as_ref(), "s1234567");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StudentId(String);

impl StudentId {
    /// Validate and construct a [`StudentId`].
    pub fn new(id: impl AsRef<str>) -> Result<Self, StudentValidationError> {
        let trimmed = id.as_ref().trim();
        if trimmed.is_empty() {
            return Err(StudentValidationError::EmptyId);
        }
        if trimmed.chars().count() > STUDENT_ID_MAX {
            return Err(StudentValidationError::IdTooLong {
                max: STUDENT_ID_MAX,
            });
        }
        if trimmed.chars().any(char::is_control) {
            return Err(StudentValidationError::IdInvalidCharacters);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for StudentId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<StudentId> for String {
    fn from(value: StudentId) -> Self {
        value.0
    }
}

impl TryFrom<String> for StudentId {
    type Error = StudentValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Salted one-way password digest in PHC string format.
///
/// The digest never leaves the backend; it is deliberately not serialisable.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    /// Wrap an encoded digest, checking it fits the storage column.
    pub fn new(encoded: impl Into<String>) -> Result<Self, StudentValidationError> {
        let encoded = encoded.into();
        if encoded.trim().is_empty() {
            return Err(StudentValidationError::EmptyDigest);
        }
        if encoded.len() > PASSWORD_DIGEST_MAX {
            return Err(StudentValidationError::DigestTooLong {
                max: PASSWORD_DIGEST_MAX,
            });
        }
        Ok(Self(encoded))
    }

    /// Encoded digest string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordDigest(..)")
    }
}

/// Registered student account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
    id: StudentId,
    digest: PasswordDigest,
    created_at: DateTime<Utc>,
}

impl Student {
    /// Assemble a student from validated parts.
    #[must_use]
    pub fn new(id: StudentId, digest: PasswordDigest, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            digest,
            created_at,
        }
    }

    /// Student identifier.
    #[must_use]
    pub fn id(&self) -> &StudentId {
        &self.id
    }

    /// Stored password digest.
    #[must_use]
    pub fn digest(&self) -> &PasswordDigest {
        &self.digest
    }

    /// Registration timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
