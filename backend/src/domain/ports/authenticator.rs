//! Driving port that turns a bearer credential into a bound identity.
//!
//! Both the REST extractor and the WebSocket handshake go through this port,
//! so a connection and a request are authenticated the same way.

use async_trait::async_trait;

use crate::domain::{AuthenticatedIdentity, BearerCredential, Error};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Verify `credential` and register the caller in the user directory.
    ///
    /// Fails with [`crate::domain::ErrorCode::Unauthorized`] for rejected
    /// credentials; no anonymous identity is ever returned.
    async fn authenticate(&self, credential: &BearerCredential)
    -> Result<AuthenticatedIdentity, Error>;
}
