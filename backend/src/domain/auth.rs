//! Authentication primitives such as login and registration credentials.
//!
//! Inbound adapters hand raw strings to [`Credentials::try_from_parts`]; the
//! domain only ever sees validated values.

use zeroize::Zeroizing;

use super::student::{StudentId, StudentValidationError};

/// Maximum accepted password length in bytes.
pub const PASSWORD_MAX_BYTES: usize = 1024;

/// Errors returned when credential payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialsValidationError {
    /// Student id was missing or blank once trimmed.
    #[error("student id must not be empty")]
    EmptyStudentId,
    /// Student id failed validation for another reason.
    #[error("{0}")]
    InvalidStudentId(StudentValidationError),
    /// Password was empty.
    #[error("password must not be empty")]
    EmptyPassword,
    /// Password exceeded [`PASSWORD_MAX_BYTES`].
    #[error("password must be at most {max} bytes")]
    PasswordTooLong {
        /// Maximum permitted length.
        max: usize,
    },
}

impl CredentialsValidationError {
    /// Name of the request field the error refers to.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyStudentId | Self::InvalidStudentId(_) => "studentId",
            Self::EmptyPassword | Self::PasswordTooLong { .. } => "password",
        }
    }
}

/// Validated student credentials used for both login and registration.
///
/// ## Invariants
/// - `student_id` satisfies [`StudentId`] validation.
/// - `password` is non-empty; surrounding whitespace is preserved.
///
/// # Examples
/// ```
/// use labrank::domain::Credentials;
///
/// let creds = Credentials::try_from_parts(" s42 ", "hunter2").expect("valid");
/// assert_eq!(creds.student_id().as_ref(), "s42");
/// assert_eq!(creds.password(), "hunter2");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    student_id: StudentId,
    password: Zeroizing<String>,
}

impl Credentials {
    /// Construct credentials from raw inputs.
    pub fn try_from_parts(
        student_id: &str,
        password: &str,
    ) -> Result<Self, CredentialsValidationError> {
        let student_id = StudentId::new(student_id).map_err(|err| match err {
            StudentValidationError::EmptyId => CredentialsValidationError::EmptyStudentId,
            other => CredentialsValidationError::InvalidStudentId(other),
        })?;

        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }
        if password.len() > PASSWORD_MAX_BYTES {
            return Err(CredentialsValidationError::PasswordTooLong {
                max: PASSWORD_MAX_BYTES,
            });
        }

        Ok(Self {
            student_id,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Student identifier.
    #[must_use]
    pub fn student_id(&self) -> &StudentId {
        &self.student_id
    }

    /// Plain-text password supplied by the caller.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}
