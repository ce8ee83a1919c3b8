//! Inbound adapters that translate external requests into domain port calls
//! while keeping framework details at the edge.
//!
//! REST handlers live under [`http`]; the realtime direct-message transport
//! lives under [`ws`]. Both authenticate through the same
//! [`crate::domain::ports::Authenticator`] port.

pub mod http;
pub mod ws;
