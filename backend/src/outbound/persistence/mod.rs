//! PostgreSQL persistence adapters using Diesel.
//!
//! Repositories here implement the driven ports in
//! [`crate::domain::ports`] with `diesel-async` over a `bb8` pool. Row
//! structs and the schema stay private; callers only see domain values and
//! port errors.
//!
//! ```ignore
//! use labrank::outbound::persistence::{DbPool, DieselLabRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/labrank")).await?;
//! let labs = DieselLabRepository::new(pool.clone());
//! ```

mod diesel_choice_repository;
mod diesel_error_mapping;
mod diesel_lab_repository;
mod diesel_student_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_choice_repository::DieselChoiceRepository;
pub use diesel_lab_repository::DieselLabRepository;
pub use diesel_student_repository::DieselStudentRepository;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
