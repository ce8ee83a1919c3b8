//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;

use tradepost::domain::ports::IdentityVerifier;
use tradepost::inbound::ws::OriginAllowList;
use tradepost::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: DbPool,
    pub(crate) verifier: Arc<dyn IdentityVerifier>,
    pub(crate) allowed_origins: OriginAllowList,
}

impl ServerConfig {
    /// Construct a server configuration.
    ///
    /// The origin allow-list starts empty, which refuses every WebSocket
    /// upgrade until [`ServerConfig::with_allowed_origins`] is called.
    #[must_use]
    pub fn new(
        bind_addr: SocketAddr,
        db_pool: DbPool,
        verifier: Arc<dyn IdentityVerifier>,
    ) -> Self {
        Self {
            bind_addr,
            db_pool,
            verifier,
            allowed_origins: OriginAllowList::default(),
        }
    }

    /// Replace the WebSocket origin allow-list.
    #[must_use]
    pub fn with_allowed_origins(mut self, allowed_origins: OriginAllowList) -> Self {
        self.allowed_origins = allowed_origins;
        self
    }
}
