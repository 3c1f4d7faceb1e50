//! Embedded PostgreSQL helpers shared by the Diesel adapter suites.
//!
//! Each suite starts its own [`TestCluster`], recreates a named database and
//! applies the service's embedded migrations before building a pool. Set
//! `SKIP_TEST_CLUSTER=1` where the PostgreSQL binaries cannot be fetched or
//! started; the suites then log a skip marker instead of failing.

use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use labrank::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use pg_embedded_setup_unpriv::TestCluster;
use postgres::{Client, NoTls};
use tokio::runtime::Runtime;
use uuid::Uuid;

static BOOTSTRAP_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

const BOOTSTRAP_RETRIES: u32 = 3;
const BOOTSTRAP_RETRY_DELAY_MS: u64 = 500;

/// A migrated database on a private cluster plus the runtime driving it.
pub struct Database {
    pub pool: DbPool,
    pub runtime: Runtime,
    _cluster: TestCluster,
}

fn cluster_dirs() -> Result<(PathBuf, PathBuf), std::io::Error> {
    let target = std::env::var_os("CARGO_TARGET_DIR").map_or_else(
        || PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("..").join("target"),
        PathBuf::from,
    );
    let base = target
        .join("pg-embed")
        .join(format!("labrank-{}-{}", std::process::id(), Uuid::new_v4()));
    let runtime_dir = base.join("install");
    let data_dir = base.join("data");
    std::fs::create_dir_all(&runtime_dir)?;
    std::fs::create_dir_all(&data_dir)?;
    Ok((runtime_dir, data_dir))
}

fn is_transient(error: &str) -> bool {
    let lower = error.to_lowercase();
    [
        "connection reset",
        "connection refused",
        "timed out",
        "timeout",
        "temporarily unavailable",
        "error decoding response body",
        "dns error",
    ]
    .iter()
    .any(|pattern| lower.contains(pattern))
}

/// Start a cluster, keeping its binaries and data under the target directory
/// unless `PG_RUNTIME_DIR` and `PG_DATA_DIR` are already set.
fn start_cluster() -> Result<TestCluster, String> {
    let _bootstrap = BOOTSTRAP_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner);

    let _env = if std::env::var_os("PG_RUNTIME_DIR").is_none()
        || std::env::var_os("PG_DATA_DIR").is_none()
    {
        let (runtime_dir, data_dir) = cluster_dirs().map_err(|err| err.to_string())?;
        Some(env_lock::lock_env([
            (
                "PG_RUNTIME_DIR",
                Some(runtime_dir.to_string_lossy().into_owned()),
            ),
            ("PG_DATA_DIR", Some(data_dir.to_string_lossy().into_owned())),
        ]))
    } else {
        None
    };

    let mut attempt = 0;
    loop {
        match TestCluster::new() {
            Ok(cluster) => return Ok(cluster),
            Err(err) => {
                let message = format!("{err:?}");
                if attempt >= BOOTSTRAP_RETRIES || !is_transient(&message) {
                    return Err(message);
                }
                std::thread::sleep(Duration::from_millis(
                    BOOTSTRAP_RETRY_DELAY_MS << attempt,
                ));
                attempt += 1;
            }
        }
    }
}

fn describe(error: &postgres::Error) -> String {
    match error.as_db_error() {
        Some(db) => format!("postgres error {:?}: {}", db.code(), db.message()),
        None => error.to_string(),
    }
}

/// Drop and recreate `name` through the maintenance database.
fn recreate_database(cluster: &TestCluster, name: &str) -> Result<(), String> {
    let admin_url = cluster.connection().database_url("postgres");
    let mut client = Client::connect(&admin_url, NoTls).map_err(|err| describe(&err))?;
    client
        .batch_execute(&format!(
            "DROP DATABASE IF EXISTS \"{name}\" WITH (FORCE); CREATE DATABASE \"{name}\";"
        ))
        .map_err(|err| describe(&err))
}

/// Provision `name` on a fresh cluster, migrate it and open a pool.
fn provision(name: &str) -> Result<Database, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let cluster = start_cluster()?;
    recreate_database(&cluster, name)?;
    let url = cluster.connection().database_url(name);

    let pool = runtime.block_on(async {
        run_migrations(&url).await.map_err(|err| err.to_string())?;
        DbPool::new(
            PoolConfig::new(&url)
                .with_max_size(2)
                .with_min_idle(Some(1)),
        )
        .await
        .map_err(|err| err.to_string())
    })?;

    Ok(Database {
        pool,
        runtime,
        _cluster: cluster,
    })
}

/// Honour `SKIP_TEST_CLUSTER`, otherwise fail loudly so CI breakage shows.
pub fn cluster_or_skip(name: &str) -> Option<Database> {
    match provision(name) {
        Ok(database) => Some(database),
        Err(reason) => {
            let skip = std::env::var("SKIP_TEST_CLUSTER")
                .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false);
            assert!(
                skip,
                "embedded Postgres setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip."
            );
            eprintln!("SKIP-TEST-CLUSTER: {reason}");
            None
        }
    }
}
