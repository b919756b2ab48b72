//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on driving ports and stay testable without I/O.

use std::sync::Arc;

use zeroize::Zeroizing;

use crate::domain::ports::{
    AccountCommand, ClaimCommand, ClaimQuery, DirectoryQuery, EventCalendar, HotelCatalogue,
    MemoryWall,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub claims: Arc<dyn ClaimCommand>,
    pub claims_query: Arc<dyn ClaimQuery>,
    pub accounts: Arc<dyn AccountCommand>,
    pub directory: Arc<dyn DirectoryQuery>,
    pub hotels: Arc<dyn HotelCatalogue>,
    pub events: Arc<dyn EventCalendar>,
    pub memories: Arc<dyn MemoryWall>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub claims: Arc<dyn ClaimCommand>,
    pub claims_query: Arc<dyn ClaimQuery>,
    pub accounts: Arc<dyn AccountCommand>,
    pub directory: Arc<dyn DirectoryQuery>,
    pub hotels: Arc<dyn HotelCatalogue>,
    pub events: Arc<dyn EventCalendar>,
    pub memories: Arc<dyn MemoryWall>,
    identity_proxy_secret: Option<Arc<Zeroizing<String>>>,
}

impl HttpState {
    /// Construct state from a ports bundle. External sign-in stays disabled
    /// until a proxy secret is attached.
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            claims,
            claims_query,
            accounts,
            directory,
            hotels,
            events,
            memories,
        } = ports;
        Self {
            claims,
            claims_query,
            accounts,
            directory,
            hotels,
            events,
            memories,
            identity_proxy_secret: None,
        }
    }

    /// Enable `POST /auth/external` for callers presenting `secret`.
    #[must_use]
    pub fn with_identity_proxy_secret(mut self, secret: Option<String>) -> Self {
        self.identity_proxy_secret = secret
            .filter(|value| !value.trim().is_empty())
            .map(|value| Arc::new(Zeroizing::new(value)));
        self
    }

    /// Shared secret expected from the identity proxy, if configured.
    pub fn identity_proxy_secret(&self) -> Option<&str> {
        self.identity_proxy_secret
            .as_deref()
            .map(|secret| secret.as_str())
    }
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}
