//! Submission flow: record, replace and read back ranked choices.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info};

use crate::domain::ports::{
    ChoiceRepository, ChoiceRepositoryError, ChoiceSubmission, ChoicesQuery,
};
use crate::domain::{Error, RankedChoices, StudentId};

/// Choice service implementing the submission driving ports.
#[derive(Clone)]
pub struct ChoiceService<C> {
    choices: Arc<C>,
}

impl<C> ChoiceService<C> {
    /// Create a new service with the given repository.
    pub fn new(choices: Arc<C>) -> Self {
        Self { choices }
    }
}

impl<C> ChoiceService<C>
where
    C: ChoiceRepository,
{
    fn map_choice_error(error: ChoiceRepositoryError) -> Error {
        match error {
            ChoiceRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("choice repository unavailable: {message}"))
            }
            ChoiceRepositoryError::Query { message } => {
                Error::internal(format!("choice repository error: {message}"))
            }
            ChoiceRepositoryError::UnknownLab { message } => {
                debug!(%message, "submission referenced an unknown lab");
                Error::invalid_request("choices must reference catalogue labs").with_details(json!({
                    "code": "unknown_lab",
                    "fields": ["choice1", "choice2", "choice3"],
                }))
            }
            ChoiceRepositoryError::UnknownStudent { student_id } => {
                // The session names an account that no longer exists.
                Error::unauthorized("login required").with_details(json!({
                    "redirect": "/login",
                    "studentId": student_id,
                }))
            }
        }
    }
}

#[async_trait]
impl<C> ChoiceSubmission for ChoiceService<C>
where
    C: ChoiceRepository,
{
    async fn submit(
        &self,
        student: &StudentId,
        choices: RankedChoices,
    ) -> Result<RankedChoices, Error> {
        self.choices
            .replace_for_student(student, &choices)
            .await
            .map_err(Self::map_choice_error)?;
        info!(student_id = %student, "choices recorded");
        Ok(choices)
    }
}

#[async_trait]
impl<C> ChoicesQuery for ChoiceService<C>
where
    C: ChoiceRepository,
{
    async fn current_choices(&self, student: &StudentId) -> Result<Option<RankedChoices>, Error> {
        self.choices
            .find_for_student(student)
            .await
            .map_err(Self::map_choice_error)
    }
}
