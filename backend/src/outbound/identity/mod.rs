//! Identity provider adapters.

mod jwt_identity_verifier;

pub use jwt_identity_verifier::{JwtConfigError, JwtIdentityVerifier, JwtKey, JwtVerifierConfig};
