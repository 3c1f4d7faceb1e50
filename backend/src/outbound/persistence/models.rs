//! Internal Diesel row structs.
//!
//! These types never leave the persistence layer; repositories convert them
//! to domain values before returning.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::{choices, labs, students};

/// Row read from `students`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = students)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct StudentRow {
    pub id: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Row inserted into `students`.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = students)]
pub(crate) struct NewStudentRow<'a> {
    pub id: &'a str,
    pub password_hash: &'a str,
    pub created_at: DateTime<Utc>,
}

/// Row read from `labs`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = labs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct LabRow {
    pub id: i32,
    pub name: String,
    pub staff: Option<String>,
    pub capacity: Option<i32>,
}

/// Row inserted into `labs`.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = labs)]
pub(crate) struct NewLabRow<'a> {
    pub name: &'a str,
    pub staff: Option<&'a str>,
    pub capacity: Option<i32>,
}

/// `(priority, lab)` projection of a student's choices.
#[derive(Debug, Clone, Copy, Queryable, Selectable)]
#[diesel(table_name = choices)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ChoiceRow {
    pub priority: i16,
    pub lab_id: i32,
}

/// Row inserted into `choices`.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = choices)]
pub(crate) struct NewChoiceRow<'a> {
    pub student_id: &'a str,
    pub lab_id: i32,
    pub priority: i16,
}
