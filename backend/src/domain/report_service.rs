//! Aggregation view over the lab catalogue and choice ledger.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{
    ChoiceRepository, ChoiceRepositoryError, DemandReportQuery, LabRepository, LabRepositoryError,
};
use crate::domain::{DemandReport, Error};

/// Builds the demand report on every request.
#[derive(Clone)]
pub struct DemandReportService<L, C> {
    labs: Arc<L>,
    choices: Arc<C>,
}

impl<L, C> DemandReportService<L, C> {
    /// Create a new service from the catalogue and ledger repositories.
    pub fn new(labs: Arc<L>, choices: Arc<C>) -> Self {
        Self { labs, choices }
    }
}

fn map_lab_error(error: LabRepositoryError) -> Error {
    match error {
        LabRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("lab repository unavailable: {message}"))
        }
        LabRepositoryError::Query { message } => {
            Error::internal(format!("lab repository error: {message}"))
        }
    }
}

fn map_tally_error(error: ChoiceRepositoryError) -> Error {
    match error {
        ChoiceRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("choice repository unavailable: {message}"))
        }
        other => Error::internal(format!("choice tally failed: {other}")),
    }
}

#[async_trait]
impl<L, C> DemandReportQuery for DemandReportService<L, C>
where
    L: LabRepository,
    C: ChoiceRepository,
{
    async fn demand_report(&self) -> Result<DemandReport, Error> {
        let labs = self.labs.list_labs().await.map_err(map_lab_error)?;
        let tallies = self.choices.tally().await.map_err(map_tally_error)?;
        Ok(DemandReport::build(labs, &tallies))
    }
}
