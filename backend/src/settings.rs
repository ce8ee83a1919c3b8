//! Application configuration loaded via OrthoConfig.
//!
//! Values come from CLI flags, `TRADEPOST_*` environment variables and an
//! optional configuration file, in OrthoConfig's usual precedence order.

use std::fmt;
use std::net::SocketAddr;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::inbound::ws::{OriginAllowList, OriginPatternError};
use crate::outbound::identity::{JwtKey, JwtVerifierConfig};
use crate::outbound::persistence::PoolConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:*";

/// Errors raised while turning raw settings into component configuration.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("database_url is required")]
    MissingDatabaseUrl,
    #[error("bind_addr `{0}` is not a socket address")]
    InvalidBindAddr(String),
    #[error("one of jwt_secret or jwt_public_key_pem is required")]
    MissingJwtKey,
    #[error("jwt_secret and jwt_public_key_pem are mutually exclusive")]
    ConflictingJwtKeys,
    #[error("db_max_connections must be greater than zero")]
    ZeroPoolSize,
    #[error(transparent)]
    AllowedOrigins(#[from] OriginPatternError),
}

/// Runtime settings for the server binary.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "TRADEPOST")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection string.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Shared HS256 secret for bearer tokens.
    pub jwt_secret: Option<String>,
    /// PEM-encoded RS256 public key for bearer tokens.
    pub jwt_public_key_pem: Option<String>,
    /// Expected `iss` claim.
    pub jwt_issuer: Option<String>,
    /// Expected `aud` claim.
    pub jwt_audience: Option<String>,
    /// WebSocket origin allow-list.
    ///
    /// From the environment this is a comma-separated list; a single entry
    /// needs a trailing comma to be read as a list.
    pub allowed_origins: Option<Vec<String>>,
    /// Apply embedded migrations before serving.
    #[ortho_config(default = false)]
    pub run_migrations: bool,
}

impl fmt::Debug for AppSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redacted = |value: &Option<String>| value.as_ref().map(|_| "<redacted>");
        f.debug_struct("AppSettings")
            .field("bind_addr", &self.bind_addr)
            .field("database_url", &redacted(&self.database_url))
            .field("db_max_connections", &self.db_max_connections)
            .field("jwt_secret", &redacted(&self.jwt_secret))
            .field("jwt_public_key_pem", &self.jwt_public_key_pem.is_some())
            .field("jwt_issuer", &self.jwt_issuer)
            .field("jwt_audience", &self.jwt_audience)
            .field("allowed_origins", &self.allowed_origins)
            .field("run_migrations", &self.run_migrations)
            .finish()
    }
}

impl AppSettings {
    /// Listen address, defaulting to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse()
            .map_err(|_| SettingsError::InvalidBindAddr(raw.to_owned()))
    }

    /// Pool configuration derived from `database_url` and `db_max_connections`.
    pub fn pool_config(&self) -> Result<PoolConfig, SettingsError> {
        let url = self
            .database_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or(SettingsError::MissingDatabaseUrl)?;
        let config = PoolConfig::new(url);
        match self.db_max_connections {
            Some(0) => Err(SettingsError::ZeroPoolSize),
            Some(max) => Ok(config.with_max_size(max)),
            None => Ok(config),
        }
    }

    /// Verifier configuration; exactly one key source must be set.
    pub fn jwt_config(&self) -> Result<JwtVerifierConfig, SettingsError> {
        let key = match (&self.jwt_secret, &self.jwt_public_key_pem) {
            (Some(_), Some(_)) => return Err(SettingsError::ConflictingJwtKeys),
            (Some(secret), None) => JwtKey::Secret(secret.clone()),
            (None, Some(pem)) => JwtKey::RsaPublicKeyPem(pem.clone()),
            (None, None) => return Err(SettingsError::MissingJwtKey),
        };
        Ok(JwtVerifierConfig {
            key,
            issuer: self.jwt_issuer.clone(),
            audience: self.jwt_audience.clone(),
        })
    }

    /// Parsed WebSocket origin allow-list, defaulting to local development.
    pub fn origin_allow_list(&self) -> Result<OriginAllowList, SettingsError> {
        let Some(entries) = self.allowed_origins.as_deref() else {
            return Ok(OriginAllowList::parse([DEFAULT_ALLOWED_ORIGINS])?);
        };
        let entries = entries
            .iter()
            .map(|entry| entry.trim())
            .filter(|entry| !entry.is_empty());
        Ok(OriginAllowList::parse(entries)?)
    }
}
