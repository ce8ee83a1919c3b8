//! Authentication primitives: bearer credentials and bound identities.
//!
//! Inbound adapters parse the raw `Authorization` value with
//! [`BearerCredential::parse`] before handing it to the authenticator, so the
//! domain never sees a malformed header.

use std::fmt;

use super::{SubjectId, User, Username};

/// Reasons a credential header is rejected before verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialError {
    /// No credential was supplied.
    Missing,
    /// The value does not use the `Bearer` scheme or has an empty token.
    Malformed,
}

impl fmt::Display for CredentialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "missing bearer credential"),
            Self::Malformed => write!(f, "credential must use the Bearer scheme"),
        }
    }
}

impl std::error::Error for CredentialError {}

/// Opaque bearer token extracted from an `Authorization` value.
///
/// The token is never logged; `Debug` redacts it.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerCredential(String);

impl BearerCredential {
    /// Parse an `Authorization` value of the form `Bearer <token>`.
    ///
    /// The scheme is matched case-insensitively.
    ///
    /// # Examples
    /// ```
    /// use tradepost::domain::{BearerCredential, CredentialError};
    ///
    /// let credential = BearerCredential::parse(Some("Bearer abc.def")).expect("bearer");
    /// assert_eq!(credential.token(), "abc.def");
    /// assert_eq!(BearerCredential::parse(None), Err(CredentialError::Missing));
    /// assert_eq!(
    ///     BearerCredential::parse(Some("Basic Zm9v")),
    ///     Err(CredentialError::Malformed)
    /// );
    /// ```
    pub fn parse(header: Option<&str>) -> Result<Self, CredentialError> {
        let raw = header.map(str::trim).filter(|value| !value.is_empty());
        let raw = raw.ok_or(CredentialError::Missing)?;
        let (scheme, token) = raw.split_once(' ').ok_or(CredentialError::Malformed)?;
        if !scheme.eq_ignore_ascii_case("bearer") {
            return Err(CredentialError::Malformed);
        }
        let token = token.trim();
        if token.is_empty() {
            return Err(CredentialError::Malformed);
        }
        Ok(Self(token.to_owned()))
    }

    /// Raw token handed to the identity verifier.
    pub fn token(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for BearerCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerCredential(<redacted>)")
    }
}

/// Identity asserted by the identity provider for a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    pub subject_id: SubjectId,
    pub username: Username,
}

/// Identity bound to a request or connection after authentication.
///
/// Carries the directory entry so callers can stamp messages and card
/// ownership without a second lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedIdentity {
    user: User,
}

impl AuthenticatedIdentity {
    pub fn new(user: User) -> Self {
        Self { user }
    }

    pub fn subject_id(&self) -> &SubjectId {
        self.user.subject_id()
    }

    pub fn username(&self) -> &Username {
        self.user.username()
    }

    pub fn user(&self) -> &User {
        &self.user
    }
}
