//! HTTP server configuration object.

use std::net::SocketAddr;

use actix_web::cookie::{Key, SameSite};
use labrank::outbound::crypto::DEFAULT_ROUNDS;
use labrank::outbound::persistence::DbPool;

/// Everything `create_server` needs, assembled in `main`.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: DbPool,
    pub(crate) hash_rounds: u32,
}

impl ServerConfig {
    /// Construct a server configuration from session settings and a pool.
    #[must_use]
    pub fn new(
        key: Key,
        cookie_secure: bool,
        same_site: SameSite,
        bind_addr: SocketAddr,
        db_pool: DbPool,
    ) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            db_pool,
            hash_rounds: DEFAULT_ROUNDS,
        }
    }

    /// Override the PBKDF2 iteration count used for new digests.
    #[must_use]
    pub fn with_hash_rounds(mut self, rounds: u32) -> Self {
        self.hash_rounds = rounds;
        self
    }
}
