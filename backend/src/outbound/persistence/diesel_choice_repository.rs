//! PostgreSQL-backed choice ledger.
//!
//! A submission deletes the student's previous rows and inserts the new
//! triple inside one transaction, so readers never observe a partial ranking
//! and a failed insert leaves the previous ranking intact.

use async_trait::async_trait;
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{ChoiceRepository, ChoiceRepositoryError};
use crate::domain::{ChoiceTally, LabId, Priority, RankedChoices, StudentId};

use super::diesel_error_mapping::{DieselFailure, names_constraint};
use super::models::{ChoiceRow, NewChoiceRow};
use super::pool::{DbPool, PoolError};
use super::schema::choices;

const LAB_FKEY: &str = "choices_lab_id_fkey";
const STUDENT_FKEY: &str = "choices_student_id_fkey";

/// Diesel implementation of [`ChoiceRepository`].
#[derive(Clone)]
pub struct DieselChoiceRepository {
    pool: DbPool,
}

impl DieselChoiceRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ChoiceRepositoryError {
    ChoiceRepositoryError::connection(error.into_message())
}

fn map_diesel_error(
    error: diesel::result::Error,
    student: &StudentId,
    operation: &str,
) -> ChoiceRepositoryError {
    match DieselFailure::classify(error, operation) {
        DieselFailure::Connection(message) => ChoiceRepositoryError::connection(message),
        DieselFailure::ForeignKeyViolation {
            constraint,
            message,
        } => {
            if names_constraint(constraint.as_deref(), &message, LAB_FKEY) {
                ChoiceRepositoryError::unknown_lab(message)
            } else if names_constraint(constraint.as_deref(), &message, STUDENT_FKEY) {
                ChoiceRepositoryError::unknown_student(student.as_ref())
            } else {
                ChoiceRepositoryError::query(message)
            }
        }
        DieselFailure::UniqueViolation { message, .. } | DieselFailure::Query(message) => {
            ChoiceRepositoryError::query(message)
        }
    }
}

fn map_tally_error(error: diesel::result::Error) -> ChoiceRepositoryError {
    match DieselFailure::classify(error, "tally choices") {
        DieselFailure::Connection(message) => ChoiceRepositoryError::connection(message),
        DieselFailure::UniqueViolation { message, .. }
        | DieselFailure::ForeignKeyViolation { message, .. }
        | DieselFailure::Query(message) => ChoiceRepositoryError::query(message),
    }
}

fn rows_to_choices(rows: &[ChoiceRow]) -> Result<Option<RankedChoices>, ChoiceRepositoryError> {
    if rows.is_empty() {
        return Ok(None);
    }
    let pairs = rows
        .iter()
        .map(|row| {
            let priority = Priority::from_rank(row.priority).ok_or_else(|| {
                ChoiceRepositoryError::query(format!("stored priority {} invalid", row.priority))
            })?;
            let lab = LabId::new(row.lab_id).map_err(|err| {
                ChoiceRepositoryError::query(format!("stored lab id {} invalid: {err}", row.lab_id))
            })?;
            Ok((priority, lab))
        })
        .collect::<Result<Vec<_>, ChoiceRepositoryError>>()?;

    RankedChoices::from_rows(&pairs)
        .map(Some)
        .ok_or_else(|| ChoiceRepositoryError::query("stored choices do not form a ranked triple"))
}

fn tally_from_row(
    (lab_id, priority, count): (i32, i16, i64),
) -> Result<ChoiceTally, ChoiceRepositoryError> {
    let lab_id = LabId::new(lab_id)
        .map_err(|err| ChoiceRepositoryError::query(format!("tally lab id invalid: {err}")))?;
    let priority = Priority::from_rank(priority)
        .ok_or_else(|| ChoiceRepositoryError::query(format!("tally priority {priority} invalid")))?;
    Ok(ChoiceTally {
        lab_id,
        priority,
        count: count.unsigned_abs(),
    })
}

#[async_trait]
impl ChoiceRepository for DieselChoiceRepository {
    async fn replace_for_student(
        &self,
        student: &StudentId,
        ranked: &RankedChoices,
    ) -> Result<(), ChoiceRepositoryError> {
        let student_id = student.as_ref();
        let rows: Vec<NewChoiceRow<'_>> = ranked
            .entries()
            .into_iter()
            .map(|(priority, lab)| NewChoiceRow {
                student_id,
                lab_id: lab.get(),
                priority: priority.rank(),
            })
            .collect();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                diesel::delete(choices::table.filter(choices::student_id.eq(student_id)))
                    .execute(conn)
                    .await?;
                diesel::insert_into(choices::table)
                    .values(&rows)
                    .execute(conn)
                    .await?;
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(|err| map_diesel_error(err, student, "replace choices"))
    }

    async fn find_for_student(
        &self,
        student: &StudentId,
    ) -> Result<Option<RankedChoices>, ChoiceRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<ChoiceRow> = choices::table
            .filter(choices::student_id.eq(student.as_ref()))
            .select(ChoiceRow::as_select())
            .order_by(choices::priority.asc())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, student, "find choices"))?;

        rows_to_choices(&rows)
    }

    async fn tally(&self) -> Result<Vec<ChoiceTally>, ChoiceRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<(i32, i16, i64)> = choices::table
            .group_by((choices::lab_id, choices::priority))
            .select((choices::lab_id, choices::priority, count_star()))
            .load(&mut conn)
            .await
            .map_err(map_tally_error)?;

        rows.into_iter().map(tally_from_row).collect()
    }
}
