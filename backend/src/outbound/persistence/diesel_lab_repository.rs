//! PostgreSQL-backed lab catalogue.
//!
//! Seeding takes an exclusive lock on `labs` before checking emptiness so two
//! processes bootstrapping at once insert the catalogue exactly once.

use std::num::NonZeroU32;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{LabRepository, LabRepositoryError, SeedOutcome};
use crate::domain::{Lab, LabId, NewLab};

use super::diesel_error_mapping::DieselFailure;
use super::models::{LabRow, NewLabRow};
use super::pool::{DbPool, PoolError};
use super::schema::labs;

/// Diesel implementation of [`LabRepository`].
#[derive(Clone)]
pub struct DieselLabRepository {
    pool: DbPool,
}

impl DieselLabRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> LabRepositoryError {
    LabRepositoryError::connection(error.into_message())
}

fn map_diesel_error(error: diesel::result::Error, operation: &str) -> LabRepositoryError {
    match DieselFailure::classify(error, operation) {
        DieselFailure::Connection(message) => LabRepositoryError::connection(message),
        DieselFailure::UniqueViolation { message, .. }
        | DieselFailure::ForeignKeyViolation { message, .. }
        | DieselFailure::Query(message) => LabRepositoryError::query(message),
    }
}

fn row_to_lab(row: LabRow) -> Result<Lab, LabRepositoryError> {
    let invalid = |err: crate::domain::LabValidationError| {
        LabRepositoryError::query(format!("stored lab {} invalid: {err}", row.id))
    };
    let id = LabId::new(row.id).map_err(invalid)?;
    let capacity = row
        .capacity
        .map(|value| {
            u32::try_from(value)
                .ok()
                .and_then(NonZeroU32::new)
                .ok_or_else(|| invalid(crate::domain::LabValidationError::InvalidCapacity))
        })
        .transpose()?;
    Lab::new(id, row.name.clone(), row.staff.clone(), capacity).map_err(invalid)
}

fn to_new_row(lab: &NewLab) -> Result<NewLabRow<'_>, LabRepositoryError> {
    let capacity = lab
        .capacity
        .map(|value| {
            i32::try_from(value.get())
                .map_err(|_| LabRepositoryError::query(format!("capacity of {} overflows", lab.name)))
        })
        .transpose()?;
    Ok(NewLabRow {
        name: lab.name.as_str(),
        staff: lab.staff.as_deref(),
        capacity,
    })
}

#[async_trait]
impl LabRepository for DieselLabRepository {
    async fn list_labs(&self) -> Result<Vec<Lab>, LabRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<LabRow> = labs::table
            .select(LabRow::as_select())
            .order_by((labs::name.asc(), labs::id.asc()))
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "list labs"))?;

        rows.into_iter().map(row_to_lab).collect()
    }

    async fn seed_if_empty(&self, seeds: &[NewLab]) -> Result<SeedOutcome, LabRepositoryError> {
        let rows = seeds
            .iter()
            .map(to_new_row)
            .collect::<Result<Vec<_>, _>>()?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                diesel::sql_query("LOCK TABLE labs IN EXCLUSIVE MODE")
                    .execute(conn)
                    .await?;

                let existing: i64 = labs::table.count().get_result(conn).await?;
                if existing > 0 {
                    return Ok(SeedOutcome::AlreadyPopulated {
                        existing: existing.unsigned_abs(),
                    });
                }

                let inserted = diesel::insert_into(labs::table)
                    .values(&rows)
                    .execute(conn)
                    .await?;
                Ok(SeedOutcome::Seeded { inserted })
            }
            .scope_boxed()
        })
        .await
        .map_err(|err| map_diesel_error(err, "seed labs"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn row(id: i32, capacity: Option<i32>) -> LabRow {
        LabRow {
            id,
            name: "Frog Lab".to_owned(),
            staff: Some("K. Ito".to_owned()),
            capacity,
        }
    }

    #[rstest]
    fn converts_valid_rows() {
        let lab = row_to_lab(row(3, Some(5))).expect("valid row");
        assert_eq!(lab.id().get(), 3);
        assert_eq!(lab.staff(), Some("K. Ito"));
        assert_eq!(lab.capacity().map(NonZeroU32::get), Some(5));
    }

    #[rstest]
    #[case(row(0, None))]
    #[case(row(1, Some(0)))]
    #[case(row(1, Some(-2)))]
    fn rejects_corrupt_rows(#[case] corrupt: LabRow) {
        assert!(matches!(
            row_to_lab(corrupt),
            Err(LabRepositoryError::Query { .. })
        ));
    }

    #[rstest]
    fn new_rows_borrow_seed_fields() {
        let seed = NewLab {
            name: "Frog Lab".to_owned(),
            staff: None,
            capacity: NonZeroU32::new(3),
        };
        let new_row = to_new_row(&seed).expect("fits");
        assert_eq!(new_row.name, "Frog Lab");
        assert_eq!(new_row.capacity, Some(3));
    }

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let err = map_pool_error(PoolError::checkout("timed out"));
        assert!(matches!(err, LabRepositoryError::Connection { .. }));
    }
}
