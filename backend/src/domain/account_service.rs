//! Student account services: registration and authentication.
//!
//! Implements the [`LoginService`] and [`RegistrationService`] driving ports
//! on top of the credential store and a password hasher.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{info, warn};
use zeroize::Zeroizing;

use crate::domain::ports::{
    CredentialHasher, CredentialHasherError, LoginService, RegistrationService,
    StudentPersistenceError, StudentRepository,
};
use crate::domain::{Credentials, Error, Student, StudentId};

const INVALID_CREDENTIALS: &str = "invalid credentials";

/// Account service implementing registration and login.
#[derive(Clone)]
pub struct AccountService<S, H> {
    students: Arc<S>,
    hasher: Arc<H>,
    clock: Arc<dyn Clock>,
}

impl<S, H> AccountService<S, H> {
    /// Create a new service from its collaborators.
    pub fn new(students: Arc<S>, hasher: Arc<H>, clock: Arc<dyn Clock>) -> Self {
        Self {
            students,
            hasher,
            clock,
        }
    }
}

impl<S, H> AccountService<S, H>
where
    S: StudentRepository,
    H: CredentialHasher,
{
    fn map_student_error(error: StudentPersistenceError) -> Error {
        match error {
            StudentPersistenceError::Connection { message } => {
                Error::service_unavailable(format!("student repository unavailable: {message}"))
            }
            StudentPersistenceError::Query { message } => {
                Error::internal(format!("student repository error: {message}"))
            }
            StudentPersistenceError::Duplicate { .. } => Self::duplicate_student(),
        }
    }

    fn map_hasher_error(error: CredentialHasherError) -> Error {
        Error::internal(error.to_string())
    }

    fn duplicate_student() -> Error {
        Error::conflict("student id already registered").with_details(json!({
            "field": "studentId",
            "code": "duplicate_student",
        }))
    }

    fn password(credentials: &Credentials) -> Zeroizing<String> {
        Zeroizing::new(credentials.password().to_owned())
    }
}

#[async_trait]
impl<S, H> RegistrationService for AccountService<S, H>
where
    S: StudentRepository,
    H: CredentialHasher,
{
    async fn register(&self, credentials: &Credentials) -> Result<StudentId, Error> {
        let id = credentials.student_id();
        let existing = self
            .students
            .find_by_id(id)
            .await
            .map_err(Self::map_student_error)?;
        if existing.is_some() {
            warn!(student_id = %id, "registration rejected: id already taken");
            return Err(Self::duplicate_student());
        }

        let digest = self
            .hasher
            .hash(Self::password(credentials))
            .await
            .map_err(Self::map_hasher_error)?;
        let student = Student::new(id.clone(), digest, self.clock.utc());

        // A concurrent registration can still win the race; the store's
        // unique key turns that into `Duplicate`.
        self.students
            .insert(&student)
            .await
            .map_err(Self::map_student_error)?;

        info!(student_id = %id, "student registered");
        Ok(id.clone())
    }
}

#[async_trait]
impl<S, H> LoginService for AccountService<S, H>
where
    S: StudentRepository,
    H: CredentialHasher,
{
    async fn authenticate(&self, credentials: &Credentials) -> Result<StudentId, Error> {
        let id = credentials.student_id();
        let student = self
            .students
            .find_by_id(id)
            .await
            .map_err(Self::map_student_error)?;

        let verified = match student {
            Some(student) => self
                .hasher
                .verify(Self::password(credentials), student.digest().clone())
                .await
                .map_err(Self::map_hasher_error)?,
            None => {
                // Spend comparable work so unknown ids are not distinguishable
                // by response time.
                self.hasher
                    .hash(Self::password(credentials))
                    .await
                    .map_err(Self::map_hasher_error)?;
                false
            }
        };

        if verified {
            info!(student_id = %id, "student logged in");
            Ok(id.clone())
        } else {
            warn!("login rejected: invalid credentials");
            Err(Error::unauthorized(INVALID_CREDENTIALS))
        }
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
