//! Tradepost backend: card marketplace and direct messaging.
//!
//! Layout follows ports and adapters: [`domain`] holds the marketplace state
//! machine, message routing and user directory; [`inbound`] exposes them over
//! REST and WebSocket; [`outbound`] implements persistence and identity
//! verification.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
