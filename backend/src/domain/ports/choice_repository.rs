//! Port abstraction for the choice ledger.
use async_trait::async_trait;

use crate::domain::{ChoiceTally, RankedChoices, StudentId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by choice repository adapters.
    pub enum ChoiceRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "choice repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "choice repository query failed: {message}",
        /// A referenced lab does not exist.
        UnknownLab { message: String } => "choice references an unknown lab: {message}",
        /// The submitting student does not exist.
        UnknownStudent { student_id: String } => "student '{student_id}' is not registered",
    }
}

/// Driven port for stored student rankings.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChoiceRepository: Send + Sync {
    /// Replace every stored choice of `student` with `choices`.
    ///
    /// Deletion and insertion form one atomic unit: on any failure the
    /// previous choices remain.
    async fn replace_for_student(
        &self,
        student: &StudentId,
        choices: &RankedChoices,
    ) -> Result<(), ChoiceRepositoryError>;

    /// Stored choices of `student`, if any.
    async fn find_for_student(
        &self,
        student: &StudentId,
    ) -> Result<Option<RankedChoices>, ChoiceRepositoryError>;

    /// Grouped counts of `(lab, priority)` over all stored choices.
    async fn tally(&self) -> Result<Vec<ChoiceTally>, ChoiceRepositoryError>;
}
