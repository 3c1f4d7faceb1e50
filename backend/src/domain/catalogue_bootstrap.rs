//! Catalogue bootstrap: seed the lab table once per deployment.

use std::sync::Arc;

use lab_catalogue::CatalogueDocument;
use thiserror::Error;
use tracing::info;

use crate::domain::NewLab;
use crate::domain::ports::{LabRepository, LabRepositoryError, SeedOutcome};

/// Errors raised while bootstrapping the catalogue.
#[derive(Debug, Error)]
pub enum CatalogueBootstrapError {
    /// Persistence adapter failed while seeding.
    #[error("catalogue persistence error: {0}")]
    Persistence(#[from] LabRepositoryError),
}

/// Inserts the catalogue into an empty lab table; otherwise does nothing.
#[derive(Clone)]
pub struct CatalogueBootstrap<L> {
    labs: Arc<L>,
}

impl<L> CatalogueBootstrap<L> {
    /// Create a bootstrapper over the given repository.
    pub fn new(labs: Arc<L>) -> Self {
        Self { labs }
    }
}

impl<L> CatalogueBootstrap<L>
where
    L: LabRepository,
{
    /// Seed `catalogue` if no labs exist yet.
    ///
    /// Running this again, or concurrently from another process, inserts
    /// nothing and reports [`SeedOutcome::AlreadyPopulated`].
    ///
    /// # Errors
    ///
    /// Returns [`CatalogueBootstrapError`] when the repository fails.
    pub async fn seed(
        &self,
        catalogue: &CatalogueDocument,
    ) -> Result<SeedOutcome, CatalogueBootstrapError> {
        let labs: Vec<NewLab> = catalogue.labs().iter().map(NewLab::from).collect();
        let outcome = self.labs.seed_if_empty(&labs).await?;
        match outcome {
            SeedOutcome::Seeded { inserted } => {
                info!(inserted, "lab catalogue seeded");
            }
            SeedOutcome::AlreadyPopulated { existing } => {
                info!(existing, "lab catalogue already populated; skipping");
            }
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockLabRepository;
    use rstest::{fixture, rstest};

    #[fixture]
    fn catalogue() -> CatalogueDocument {
        CatalogueDocument::from_json(
            r#"{"version":1,"labs":[{"name":"A","capacity":2},{"name":"B"}]}"#,
        )
        .expect("valid catalogue")
    }

    #[rstest]
    #[tokio::test]
    async fn passes_catalogue_labs_to_repository(catalogue: CatalogueDocument) {
        let mut repo = MockLabRepository::new();
        repo.expect_seed_if_empty()
            .withf(|labs| {
                labs.iter().map(|lab| lab.name.as_str()).collect::<Vec<_>>() == ["A", "B"]
            })
            .times(1)
            .return_once(|labs| Ok(SeedOutcome::Seeded { inserted: labs.len() }));

        let outcome = CatalogueBootstrap::new(Arc::new(repo))
            .seed(&catalogue)
            .await
            .expect("seeding succeeds");
        assert_eq!(outcome, SeedOutcome::Seeded { inserted: 2 });
    }

    #[rstest]
    #[tokio::test]
    async fn reports_existing_catalogue(catalogue: CatalogueDocument) {
        let mut repo = MockLabRepository::new();
        repo.expect_seed_if_empty()
            .return_once(|_| Ok(SeedOutcome::AlreadyPopulated { existing: 24 }));

        let outcome = CatalogueBootstrap::new(Arc::new(repo))
            .seed(&catalogue)
            .await
            .expect("seeding succeeds");
        assert_eq!(outcome, SeedOutcome::AlreadyPopulated { existing: 24 });
    }

    #[rstest]
    #[tokio::test]
    async fn propagates_repository_errors(catalogue: CatalogueDocument) {
        let mut repo = MockLabRepository::new();
        repo.expect_seed_if_empty()
            .return_once(|_| Err(LabRepositoryError::connection("refused")));

        let err = CatalogueBootstrap::new(Arc::new(repo))
            .seed(&catalogue)
            .await
            .expect_err("failure");
        assert!(matches!(
            err,
            CatalogueBootstrapError::Persistence(LabRepositoryError::Connection { .. })
        ));
    }
}
