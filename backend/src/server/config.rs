//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::cookie::{Key, SameSite};
use backend::domain::ClaimSettings;
use backend::outbound::memory::InMemoryStore;
use backend::outbound::persistence::DbPool;

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;

/// Where repositories keep their data.
#[derive(Clone)]
pub enum Storage {
    Postgres(DbPool),
    /// Process-local store for development without a database.
    Memory(Arc<InMemoryStore>),
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) storage: Storage,
    pub(crate) claim_settings: ClaimSettings,
    pub(crate) identity_proxy_secret: Option<String>,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    /// Construct a server configuration over in-memory storage.
    #[must_use]
    pub fn new(
        key: Key,
        cookie_secure: bool,
        same_site: SameSite,
        bind_addr: SocketAddr,
        claim_settings: ClaimSettings,
    ) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            storage: Storage::Memory(Arc::new(InMemoryStore::new())),
            claim_settings,
            identity_proxy_secret: None,
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    /// Replace the storage backend.
    #[must_use]
    pub fn with_storage(mut self, storage: Storage) -> Self {
        self.storage = storage;
        self
    }

    /// Enable `/auth/external` with the given shared secret.
    #[must_use]
    pub fn with_identity_proxy_secret(mut self, secret: Option<String>) -> Self {
        self.identity_proxy_secret = secret;
        self
    }

    #[cfg(feature = "metrics")]
    /// Attach Prometheus middleware to the configuration.
    #[must_use]
    pub fn with_metrics(mut self, prometheus: PrometheusMetrics) -> Self {
        self.prometheus = Some(prometheus);
        self
    }
}
