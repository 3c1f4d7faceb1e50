//! Port abstraction for the credential store.
use async_trait::async_trait;

use crate::domain::{Student, StudentId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by student repository adapters.
    pub enum StudentPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "student repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "student repository query failed: {message}",
        /// A student with the same identifier already exists.
        Duplicate { student_id: String } => "student '{student_id}' already exists",
    }
}

/// Driven port for registered student accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StudentRepository: Send + Sync {
    /// Insert a new student.
    ///
    /// Fails with [`StudentPersistenceError::Duplicate`] when the identifier
    /// is taken; the existing row is left untouched.
    async fn insert(&self, student: &Student) -> Result<(), StudentPersistenceError>;

    /// Fetch a student by identifier.
    async fn find_by_id(&self, id: &StudentId)
    -> Result<Option<Student>, StudentPersistenceError>;
}
