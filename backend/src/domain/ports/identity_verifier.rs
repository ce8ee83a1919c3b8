//! Driven port for the external identity provider.
use async_trait::async_trait;

use crate::domain::{BearerCredential, VerifiedIdentity};

use super::define_port_error;

define_port_error! {
    /// Errors raised while verifying a bearer credential.
    pub enum IdentityVerificationError {
        /// The token is invalid, expired or carries unusable claims.
        Rejected => "credential rejected",
        /// The verifier could not reach its key material or provider.
        Unavailable => "identity provider unavailable",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Validate `credential` and return the asserted identity.
    async fn verify(
        &self,
        credential: &BearerCredential,
    ) -> Result<VerifiedIdentity, IdentityVerificationError>;
}
