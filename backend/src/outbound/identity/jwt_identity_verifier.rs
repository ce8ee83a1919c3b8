//! `IdentityVerifier` backed by locally validated JWTs.
//!
//! Tokens are checked against either a shared HS256 secret or an RS256
//! public key, plus optional issuer and audience. The subject claim becomes
//! the [`SubjectId`]; the display name comes from `username`,
//! `preferred_username` or `name`, falling back to the subject.

use async_trait::async_trait;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::Deserialize;

use crate::domain::ports::{IdentityVerificationError, IdentityVerifier};
use crate::domain::user::USERNAME_MAX;
use crate::domain::{BearerCredential, SubjectId, Username, VerifiedIdentity};

/// Key material accepted by [`JwtIdentityVerifier`].
#[derive(Clone)]
pub enum JwtKey {
    /// Shared secret for HS256 tokens.
    Secret(String),
    /// PEM-encoded RSA public key for RS256 tokens.
    RsaPublicKeyPem(String),
}

/// Settings for [`JwtIdentityVerifier`].
#[derive(Clone)]
pub struct JwtVerifierConfig {
    pub key: JwtKey,
    pub issuer: Option<String>,
    pub audience: Option<String>,
}

/// Errors raised while building the verifier.
#[derive(Debug, thiserror::Error)]
pub enum JwtConfigError {
    #[error("invalid RSA public key: {0}")]
    InvalidPublicKey(String),
    #[error("JWT secret must not be empty")]
    EmptySecret,
}

#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    preferred_username: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

/// Validates bearer tokens without calling out to the provider.
#[derive(Clone)]
pub struct JwtIdentityVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtIdentityVerifier {
    /// Build a verifier from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`JwtConfigError`] for an empty secret or an unparseable PEM.
    pub fn new(config: JwtVerifierConfig) -> Result<Self, JwtConfigError> {
        let (key, algorithm) = match config.key {
            JwtKey::Secret(secret) if secret.is_empty() => return Err(JwtConfigError::EmptySecret),
            JwtKey::Secret(secret) => {
                (DecodingKey::from_secret(secret.as_bytes()), Algorithm::HS256)
            }
            JwtKey::RsaPublicKeyPem(pem) => (
                DecodingKey::from_rsa_pem(pem.as_bytes())
                    .map_err(|err| JwtConfigError::InvalidPublicKey(err.to_string()))?,
                Algorithm::RS256,
            ),
        };

        let mut validation = Validation::new(algorithm);
        match config.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }
        if let Some(issuer) = config.issuer {
            validation.set_issuer(&[issuer]);
        }

        Ok(Self { key, validation })
    }

    fn identity_from_claims(claims: Claims) -> Result<VerifiedIdentity, IdentityVerificationError> {
        let subject_id = SubjectId::new(claims.sub)
            .map_err(|err| IdentityVerificationError::rejected(format!("bad subject: {err}")))?;
        let username = [claims.username, claims.preferred_username, claims.name]
            .into_iter()
            .flatten()
            .find_map(|candidate| Username::new(candidate).ok())
            .map_or_else(|| fallback_username(&subject_id), Ok)?;
        Ok(VerifiedIdentity {
            subject_id,
            username,
        })
    }
}

fn fallback_username(subject: &SubjectId) -> Result<Username, IdentityVerificationError> {
    let truncated: String = subject.as_ref().chars().take(USERNAME_MAX).collect();
    Username::new(truncated)
        .map_err(|err| IdentityVerificationError::rejected(format!("bad subject: {err}")))
}

fn describe(kind: &ErrorKind) -> &'static str {
    match kind {
        ErrorKind::ExpiredSignature => "token expired",
        ErrorKind::ImmatureSignature => "token not yet valid",
        ErrorKind::InvalidSignature => "signature mismatch",
        ErrorKind::InvalidIssuer => "unexpected issuer",
        ErrorKind::InvalidAudience => "unexpected audience",
        ErrorKind::InvalidAlgorithm => "unexpected algorithm",
        ErrorKind::MissingRequiredClaim(_) => "missing required claim",
        _ => "malformed token",
    }
}

#[async_trait]
impl IdentityVerifier for JwtIdentityVerifier {
    async fn verify(
        &self,
        credential: &BearerCredential,
    ) -> Result<VerifiedIdentity, IdentityVerificationError> {
        let data = decode::<Claims>(credential.token(), &self.key, &self.validation)
            .map_err(|err| IdentityVerificationError::rejected(describe(err.kind())))?;
        Self::identity_from_claims(data.claims)
    }
}
