//! WebSocket-focused test helpers.
//!
//! Integration tests under `backend/tests/` compile as separate crates, so
//! sharing small WebSocket setup helpers helps avoid copy/paste drift.

use tradepost::inbound::ws::OriginAllowList;
use tradepost::inbound::ws::state::WsState;
use tradepost::test_support::InMemoryBackend;

/// Origins accepted by the integration suites.
pub const ALLOWED_ORIGINS: [&str; 3] = [
    "https://tradepost.example",
    "https://*.tradepost.example",
    "http://localhost:*",
];

/// Build a `WsState` over `backend` using [`ALLOWED_ORIGINS`].
pub fn ws_state(backend: &InMemoryBackend) -> WsState {
    let origins = OriginAllowList::parse(ALLOWED_ORIGINS).expect("valid origin patterns");
    backend.ws_state(origins)
}
