//! PostgreSQL-backed credential store.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{StudentPersistenceError, StudentRepository};
use crate::domain::{PasswordDigest, Student, StudentId};

use super::diesel_error_mapping::{DieselFailure, names_constraint};
use super::models::{NewStudentRow, StudentRow};
use super::pool::{DbPool, PoolError};
use super::schema::students;

const STUDENTS_PKEY: &str = "students_pkey";

/// Diesel implementation of [`StudentRepository`].
#[derive(Clone)]
pub struct DieselStudentRepository {
    pool: DbPool,
}

impl DieselStudentRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> StudentPersistenceError {
    StudentPersistenceError::connection(error.into_message())
}

fn map_diesel_error(
    error: diesel::result::Error,
    student_id: &StudentId,
    operation: &str,
) -> StudentPersistenceError {
    match DieselFailure::classify(error, operation) {
        DieselFailure::Connection(message) => StudentPersistenceError::connection(message),
        DieselFailure::UniqueViolation {
            constraint,
            message,
        } if names_constraint(constraint.as_deref(), &message, STUDENTS_PKEY) => {
            StudentPersistenceError::duplicate(student_id.as_ref())
        }
        DieselFailure::UniqueViolation { message, .. }
        | DieselFailure::ForeignKeyViolation { message, .. }
        | DieselFailure::Query(message) => StudentPersistenceError::query(message),
    }
}

fn row_to_student(row: StudentRow) -> Result<Student, StudentPersistenceError> {
    let id = StudentId::new(&row.id)
        .map_err(|err| StudentPersistenceError::query(format!("stored student id invalid: {err}")))?;
    let digest = PasswordDigest::new(row.password_hash)
        .map_err(|err| StudentPersistenceError::query(format!("stored digest invalid: {err}")))?;
    Ok(Student::new(id, digest, row.created_at))
}

#[async_trait]
impl StudentRepository for DieselStudentRepository {
    async fn insert(&self, student: &Student) -> Result<(), StudentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewStudentRow {
            id: student.id().as_ref(),
            password_hash: student.digest().as_str(),
            created_at: student.created_at(),
        };

        diesel::insert_into(students::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_diesel_error(err, student.id(), "insert student"))
    }

    async fn find_by_id(
        &self,
        id: &StudentId,
    ) -> Result<Option<Student>, StudentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = students::table
            .filter(students::id.eq(id.as_ref()))
            .select(StudentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, id, "find student"))?;

        row.map(row_to_student).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rstest::rstest;

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let err = map_pool_error(PoolError::checkout("connection refused"));
        assert!(matches!(err, StudentPersistenceError::Connection { .. }));
        assert!(err.to_string().contains("connection refused"));
    }

    #[rstest]
    fn not_found_maps_to_query_error() {
        let id = StudentId::new("s1").expect("id");
        let err = map_diesel_error(diesel::result::Error::NotFound, &id, "test");
        assert!(matches!(err, StudentPersistenceError::Query { .. }));
    }

    #[rstest]
    fn corrupt_rows_are_query_errors() {
        let row = StudentRow {
            id: "   ".to_owned(),
            password_hash: "$pbkdf2-sha256$x".to_owned(),
            created_at: Utc::now(),
        };
        assert!(matches!(
            row_to_student(row),
            Err(StudentPersistenceError::Query { .. })
        ));
    }
}
