//! Shared classification of Diesel failures.
//!
//! Repositories turn a [`diesel::result::Error`] into a [`DieselFailure`]
//! and then into their own port error, so constraint handling lives in one
//! place.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

/// Coarse classification of a Diesel error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DieselFailure {
    /// The connection dropped or could not be used.
    Connection(String),
    /// A unique constraint rejected the write.
    UniqueViolation {
        constraint: Option<String>,
        message: String,
    },
    /// A foreign key constraint rejected the write.
    ForeignKeyViolation {
        constraint: Option<String>,
        message: String,
    },
    /// Anything else.
    Query(String),
}

impl DieselFailure {
    /// Classify `error`, logging the raw details at debug level.
    pub(crate) fn classify(error: DieselError, operation: &str) -> Self {
        match &error {
            DieselError::DatabaseError(kind, info) => debug!(
                ?kind,
                operation,
                message = info.message(),
                constraint = info.constraint_name(),
                "diesel operation failed"
            ),
            _ => debug!(operation, error = %error, "diesel operation failed"),
        }

        match error {
            DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
                Self::Connection(info.message().to_owned())
            }
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                Self::UniqueViolation {
                    constraint: info.constraint_name().map(str::to_owned),
                    message: info.message().to_owned(),
                }
            }
            DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
                Self::ForeignKeyViolation {
                    constraint: info.constraint_name().map(str::to_owned),
                    message: info.message().to_owned(),
                }
            }
            DieselError::DatabaseError(_, info) => Self::Query(info.message().to_owned()),
            DieselError::NotFound => Self::Query("record not found".to_owned()),
            other => Self::Query(other.to_string()),
        }
    }
}

/// True when `constraint` (or, failing that, `message`) names `needle`.
pub(crate) fn names_constraint(constraint: Option<&str>, message: &str, needle: &str) -> bool {
    constraint.map_or_else(|| message.contains(needle), |name| name == needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::result::DatabaseErrorInformation;
    use rstest::rstest;

    struct Info {
        message: &'static str,
        constraint: Option<&'static str>,
    }

    impl DatabaseErrorInformation for Info {
        fn message(&self) -> &str {
            self.message
        }
        fn details(&self) -> Option<&str> {
            None
        }
        fn hint(&self) -> Option<&str> {
            None
        }
        fn table_name(&self) -> Option<&str> {
            None
        }
        fn column_name(&self) -> Option<&str> {
            None
        }
        fn constraint_name(&self) -> Option<&str> {
            self.constraint
        }
        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn db_error(
        kind: DatabaseErrorKind,
        message: &'static str,
        constraint: Option<&'static str>,
    ) -> DieselError {
        DieselError::DatabaseError(kind, Box::new(Info { message, constraint }))
    }

    #[rstest]
    fn closed_connection_is_connection_failure() {
        let failure = DieselFailure::classify(
            db_error(DatabaseErrorKind::ClosedConnection, "server closed", None),
            "test",
        );
        assert_eq!(failure, DieselFailure::Connection("server closed".to_owned()));
    }

    #[rstest]
    fn unique_violation_keeps_constraint() {
        let failure = DieselFailure::classify(
            db_error(
                DatabaseErrorKind::UniqueViolation,
                "duplicate key",
                Some("students_pkey"),
            ),
            "test",
        );
        assert_eq!(
            failure,
            DieselFailure::UniqueViolation {
                constraint: Some("students_pkey".to_owned()),
                message: "duplicate key".to_owned(),
            }
        );
    }

    #[rstest]
    fn foreign_key_violation_is_recognised() {
        let failure = DieselFailure::classify(
            db_error(
                DatabaseErrorKind::ForeignKeyViolation,
                "violates foreign key constraint",
                Some("choices_lab_id_fkey"),
            ),
            "test",
        );
        assert!(matches!(failure, DieselFailure::ForeignKeyViolation { .. }));
    }

    #[rstest]
    fn not_found_is_query_failure() {
        let failure = DieselFailure::classify(DieselError::NotFound, "test");
        assert_eq!(failure, DieselFailure::Query("record not found".to_owned()));
    }

    #[rstest]
    #[case(Some("choices_lab_id_fkey"), "", true)]
    #[case(Some("choices_student_id_fkey"), "choices_lab_id_fkey", false)]
    #[case(None, "insert violates \"choices_lab_id_fkey\"", true)]
    #[case(None, "something else", false)]
    fn constraint_matching(
        #[case] constraint: Option<&str>,
        #[case] message: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(
            names_constraint(constraint, message, "choices_lab_id_fkey"),
            expected
        );
    }
}
