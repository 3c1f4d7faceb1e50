//! Application settings loaded via OrthoConfig.

use std::path::{Path, PathBuf};

use cap_std::{ambient_authority, fs::Dir};
use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_DATABASE_URL_FILE: &str = "instance/database_url";

/// Errors raised while resolving settings that need more than a lookup.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Neither the URL nor its fallback file produced a value.
    #[error("database URL missing: set LABRANK_DATABASE_URL or create {path}")]
    MissingDatabaseUrl {
        /// Fallback file that was consulted.
        path: PathBuf,
    },
    /// The fallback file exists but could not be read.
    #[error("failed to read database URL from {path}: {source}")]
    DatabaseUrlFile {
        /// Fallback file that was consulted.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The bind address is not a socket address.
    #[error("invalid bind address '{value}': {message}")]
    BindAddr {
        /// Configured value.
        value: String,
        /// Parser message.
        message: String,
    },
}

/// Service settings layered from defaults, config file, environment and CLI.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "LABRANK")]
pub struct AppSettings {
    /// PostgreSQL connection URL.
    pub database_url: Option<String>,
    /// File holding the connection URL when `database_url` is unset.
    pub database_url_file: Option<PathBuf>,
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// Catalogue document to seed from instead of the bundled one.
    pub catalogue_path: Option<PathBuf>,
    /// PBKDF2 iteration count override.
    pub hash_rounds: Option<u32>,
    /// Skip seeding the lab catalogue at startup.
    #[ortho_config(default = false)]
    pub skip_catalogue_seed: bool,
}

impl AppSettings {
    /// Return the configured bind address, falling back to the default.
    pub fn bind_addr(&self) -> &str {
        self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR)
    }

    /// Parse the bind address into a socket address.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::BindAddr`] when the value does not parse.
    pub fn socket_addr(&self) -> Result<std::net::SocketAddr, SettingsError> {
        let value = self.bind_addr();
        value.parse().map_err(|err: std::net::AddrParseError| SettingsError::BindAddr {
            value: value.to_owned(),
            message: err.to_string(),
        })
    }

    /// Return the database URL fallback file, falling back to the default.
    pub fn database_url_file(&self) -> PathBuf {
        self.database_url_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_URL_FILE))
    }

    /// Resolve the database URL.
    ///
    /// An explicit, non-blank `database_url` wins. Otherwise the first line of
    /// the fallback file is used.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] when no URL can be found or the fallback
    /// file cannot be read.
    pub fn resolve_database_url(&self) -> Result<String, SettingsError> {
        if let Some(url) = self
            .database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
        {
            return Ok(url.to_owned());
        }

        let path = self.database_url_file();
        let contents = match read_file(&path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(SettingsError::MissingDatabaseUrl { path });
            }
            Err(source) => return Err(SettingsError::DatabaseUrlFile { path, source }),
        };

        contents
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(str::to_owned)
            .ok_or(SettingsError::MissingDatabaseUrl { path })
    }
}

/// Read a UTF-8 file through a capability handle on its parent directory.
pub(crate) fn read_file(path: &Path) -> std::io::Result<String> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path.file_name().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, "path must name a file")
    })?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority())?;
    dir.read_to_string(Path::new(file_name))
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing and database URL resolution.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;
    use tempfile::TempDir;

    const VARS: [&str; 6] = [
        "LABRANK_DATABASE_URL",
        "LABRANK_DATABASE_URL_FILE",
        "LABRANK_BIND_ADDR",
        "LABRANK_CATALOGUE_PATH",
        "LABRANK_HASH_ROUNDS",
        "LABRANK_SKIP_CATALOGUE_SEED",
    ];

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("labrank")]).expect("config should load")
    }

    fn settings_with(database_url: Option<&str>, file: Option<PathBuf>) -> AppSettings {
        AppSettings {
            database_url: database_url.map(str::to_owned),
            database_url_file: file,
            bind_addr: None,
            catalogue_path: None,
            hash_rounds: None,
            skip_catalogue_seed: false,
        }
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(settings.bind_addr(), DEFAULT_BIND_ADDR);
        assert_eq!(
            settings.database_url_file(),
            PathBuf::from(DEFAULT_DATABASE_URL_FILE)
        );
        assert!(settings.database_url.is_none());
        assert!(settings.catalogue_path.is_none());
        assert!(settings.hash_rounds.is_none());
        assert!(!settings.skip_catalogue_seed);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            (
                "LABRANK_DATABASE_URL",
                Some("postgres://db/labrank".to_owned()),
            ),
            ("LABRANK_DATABASE_URL_FILE", None),
            ("LABRANK_BIND_ADDR", Some("127.0.0.1:9000".to_owned())),
            (
                "LABRANK_CATALOGUE_PATH",
                Some("/etc/labrank/labs.json".to_owned()),
            ),
            ("LABRANK_HASH_ROUNDS", Some("2000".to_owned())),
            ("LABRANK_SKIP_CATALOGUE_SEED", Some("true".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.database_url.as_deref(),
            Some("postgres://db/labrank")
        );
        assert_eq!(settings.bind_addr(), "127.0.0.1:9000");
        assert_eq!(
            settings.catalogue_path,
            Some(PathBuf::from("/etc/labrank/labs.json"))
        );
        assert_eq!(settings.hash_rounds, Some(2000));
        assert!(settings.skip_catalogue_seed);
    }

    #[rstest]
    fn explicit_url_wins_over_file() {
        let settings = settings_with(
            Some(" postgres://env/labrank "),
            Some(PathBuf::from("/nonexistent/database_url")),
        );
        assert_eq!(
            settings.resolve_database_url().expect("url resolves"),
            "postgres://env/labrank"
        );
    }

    #[rstest]
    fn blank_url_falls_back_to_file() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("database_url");
        std::fs::write(&path, "\npostgres://file/labrank\n").expect("write url file");

        let settings = settings_with(Some("   "), Some(path));
        assert_eq!(
            settings.resolve_database_url().expect("url resolves"),
            "postgres://file/labrank"
        );
    }

    #[rstest]
    fn missing_file_reports_missing_url() {
        let dir = TempDir::new().expect("temp dir");
        let settings = settings_with(None, Some(dir.path().join("absent")));
        assert!(matches!(
            settings.resolve_database_url(),
            Err(SettingsError::MissingDatabaseUrl { .. })
        ));
    }

    #[rstest]
    fn empty_file_reports_missing_url() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("database_url");
        std::fs::write(&path, "  \n").expect("write url file");

        let settings = settings_with(None, Some(path));
        assert!(matches!(
            settings.resolve_database_url(),
            Err(SettingsError::MissingDatabaseUrl { .. })
        ));
    }

    #[rstest]
    #[case("127.0.0.1:8080", true)]
    #[case("localhost", false)]
    fn socket_addr_parsing(#[case] value: &str, #[case] ok: bool) {
        let mut settings = settings_with(None, None);
        settings.bind_addr = Some(value.to_owned());
        assert_eq!(settings.socket_addr().is_ok(), ok);
    }
}
