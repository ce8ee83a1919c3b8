//! Shared WebSocket adapter state.
//!
//! WebSocket entry points depend on domain ports instead of constructing
//! domain services directly. The connection registry is shared with the chat
//! service, which uses it as its `MessageDelivery` port.

use std::sync::Arc;

use crate::domain::ports::{Authenticator, DirectMessaging};
use crate::inbound::ws::origin::OriginAllowList;
use crate::inbound::ws::registry::ConnectionRegistry;

/// Dependency bundle for WebSocket handlers and sessions.
#[derive(Clone)]
pub struct WsState {
    pub authenticator: Arc<dyn Authenticator>,
    pub messaging: Arc<dyn DirectMessaging>,
    pub registry: Arc<ConnectionRegistry>,
    pub allowed_origins: Arc<OriginAllowList>,
}

impl WsState {
    /// Construct state from explicit port implementations.
    pub fn new(
        authenticator: Arc<dyn Authenticator>,
        messaging: Arc<dyn DirectMessaging>,
        registry: Arc<ConnectionRegistry>,
        allowed_origins: OriginAllowList,
    ) -> Self {
        Self {
            authenticator,
            messaging,
            registry,
            allowed_origins: Arc::new(allowed_origins),
        }
    }
}
