//! Seed the lab catalogue into an empty database.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use labrank::domain::CatalogueBootstrap;
use labrank::domain::ports::SeedOutcome;
use labrank::outbound::persistence::{DbPool, DieselLabRepository, PoolConfig, run_migrations};
use labrank::startup::{AppSettings, load_catalogue};
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;

/// `seed-labs` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "seed-labs",
    about = "Apply migrations and seed the lab catalogue when the labs table is empty",
    version
)]
struct CliArgs {
    /// Catalogue JSON file. The bundled catalogue is used when omitted.
    #[arg(long = "catalogue", value_name = "path")]
    catalogue: Option<PathBuf>,
    /// Database connection URL. Falls back to `LABRANK_DATABASE_URL` or the
    /// configured URL file when omitted.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
}

fn main() -> io::Result<()> {
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main())
}

async fn async_main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let database_url = resolve_database_url(args.database_url)?;
    let catalogue = load_catalogue(args.catalogue.as_deref())
        .map_err(|error| io::Error::other(format!("load catalogue: {error}")))?;

    run_migrations(&database_url)
        .await
        .map_err(|error| io::Error::other(format!("run migrations: {error}")))?;
    let pool = DbPool::new(PoolConfig::new(&database_url).with_max_size(1))
        .await
        .map_err(|error| io::Error::other(format!("create database pool: {error}")))?;

    let bootstrap = CatalogueBootstrap::new(Arc::new(DieselLabRepository::new(pool)));
    let outcome = bootstrap
        .seed(&catalogue)
        .await
        .map_err(|error| io::Error::other(format!("seed catalogue: {error}")))?;

    match outcome {
        SeedOutcome::Seeded { inserted } => println!("status=seeded inserted={inserted}"),
        SeedOutcome::AlreadyPopulated { existing } => {
            println!("status=already_populated existing={existing}");
        }
    }
    Ok(())
}

fn resolve_database_url(explicit: Option<String>) -> io::Result<String> {
    if let Some(value) = explicit {
        if value.trim().is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "--database-url must not be empty when provided",
            ));
        }
        return Ok(value);
    }

    let settings = AppSettings::load_from_iter([OsString::from("seed-labs")])
        .map_err(|error| io::Error::other(format!("load settings: {error}")))?;
    settings
        .resolve_database_url()
        .map_err(|error| io::Error::new(io::ErrorKind::InvalidInput, error.to_string()))
}

#[cfg(test)]
mod tests {
    //! Unit tests for CLI parsing helpers.

    use clap::Parser;
    use rstest::rstest;

    use super::{CliArgs, resolve_database_url};

    #[rstest]
    fn explicit_database_url_is_used() {
        let url = resolve_database_url(Some("postgres://db/labrank".to_owned()))
            .expect("explicit url accepted");
        assert_eq!(url, "postgres://db/labrank");
    }

    #[rstest]
    fn blank_database_url_is_rejected() {
        let error = resolve_database_url(Some("  ".to_owned())).expect_err("blank url fails");
        assert_eq!(error.kind(), std::io::ErrorKind::InvalidInput);
    }

    #[rstest]
    fn parses_catalogue_flag() {
        let args = CliArgs::try_parse_from(["seed-labs", "--catalogue", "labs.json"])
            .expect("args parse");
        assert_eq!(args.catalogue.as_deref(), Some(std::path::Path::new("labs.json")));
        assert!(args.database_url.is_none());
    }
}
