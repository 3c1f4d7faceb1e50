//! Driving port for the aggregation view.

use async_trait::async_trait;

use crate::domain::{DemandReport, Error};

/// Query port returning per-lab demand.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DemandReportQuery: Send + Sync {
    /// Counts for every lab at every priority, labs ordered by name.
    async fn demand_report(&self) -> Result<DemandReport, Error>;
}
