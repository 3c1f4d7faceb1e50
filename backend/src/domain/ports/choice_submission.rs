//! Driving ports for recording and reading a student's ranked choices.

use async_trait::async_trait;

use crate::domain::{Error, RankedChoices, StudentId};

/// Command port: record or replace a student's ranking.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChoiceSubmission: Send + Sync {
    /// Replace the student's stored ranking with `choices`.
    ///
    /// Returns the ranking as stored.
    async fn submit(
        &self,
        student: &StudentId,
        choices: RankedChoices,
    ) -> Result<RankedChoices, Error>;
}

/// Query port: read back a student's ranking.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChoicesQuery: Send + Sync {
    /// The student's stored ranking, or `None` before the first submission.
    async fn current_choices(&self, student: &StudentId) -> Result<Option<RankedChoices>, Error>;
}
