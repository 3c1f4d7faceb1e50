//! Startup catalogue seeding.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use lab_catalogue::{CatalogueDocument, CatalogueError};
use thiserror::Error;
use tracing::info;

use crate::domain::ports::SeedOutcome;
use crate::domain::{CatalogueBootstrap, CatalogueBootstrapError};
use crate::outbound::persistence::{DbPool, DieselLabRepository};

use super::config::{AppSettings, read_file};

/// Errors returned while loading or applying the lab catalogue.
#[derive(Debug, Error)]
pub enum CatalogueStartupError {
    /// Catalogue file could not be read.
    #[error("failed to read catalogue at {path}: {source}")]
    Read {
        /// Path to the catalogue file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Catalogue parsing or validation failed.
    #[error("catalogue rejected: {0}")]
    Catalogue(#[from] CatalogueError),
    /// Seeding failed in the persistence layer.
    #[error("catalogue bootstrap failed: {0}")]
    Bootstrap(#[from] CatalogueBootstrapError),
}

/// Load the catalogue at `path`, or the bundled one when no path is given.
///
/// # Errors
///
/// Returns [`CatalogueStartupError`] when the file cannot be read or the
/// document is invalid.
pub fn load_catalogue(path: Option<&Path>) -> Result<CatalogueDocument, CatalogueStartupError> {
    let Some(path) = path else {
        return Ok(CatalogueDocument::bundled()?);
    };
    let contents = read_file(path).map_err(|source| CatalogueStartupError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(CatalogueDocument::from_json(&contents)?)
}

/// Seed the lab catalogue when the settings allow it.
///
/// Returns `None` when seeding is disabled.
///
/// # Errors
///
/// Returns [`CatalogueStartupError`] when loading or seeding fails.
pub async fn seed_catalogue_on_startup(
    settings: &AppSettings,
    db_pool: &DbPool,
) -> Result<Option<SeedOutcome>, CatalogueStartupError> {
    if settings.skip_catalogue_seed {
        info!(reason = "disabled", "catalogue seeding skipped");
        return Ok(None);
    }

    let catalogue = load_catalogue(settings.catalogue_path.as_deref())?;
    let bootstrap = CatalogueBootstrap::new(Arc::new(DieselLabRepository::new(db_pool.clone())));
    let outcome = bootstrap.seed(&catalogue).await?;
    Ok(Some(outcome))
}
