//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    Authenticator, CardCollection, DirectMessaging, Marketplace, UserDirectory,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub authenticator: Arc<dyn Authenticator>,
    pub collection: Arc<dyn CardCollection>,
    pub marketplace: Arc<dyn Marketplace>,
    pub users: Arc<dyn UserDirectory>,
    pub messaging: Arc<dyn DirectMessaging>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub authenticator: Arc<dyn Authenticator>,
    pub collection: Arc<dyn CardCollection>,
    pub marketplace: Arc<dyn Marketplace>,
    pub users: Arc<dyn UserDirectory>,
    pub messaging: Arc<dyn DirectMessaging>,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from a ports bundle.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use tradepost::inbound::http::state::{HttpState, HttpStatePorts};
    /// use tradepost::test_support::InMemoryBackend;
    ///
    /// let backend = InMemoryBackend::default();
    /// let state = HttpState::new(backend.http_ports());
    /// let _users = Arc::clone(&state.users);
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            authenticator,
            collection,
            marketplace,
            users,
            messaging,
        } = ports;
        Self {
            authenticator,
            collection,
            marketplace,
            users,
            messaging,
        }
    }
}
