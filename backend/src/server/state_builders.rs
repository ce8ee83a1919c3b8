//! Builders wiring Diesel repositories into domain services and adapter state.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;

use tradepost::domain::ports::{Authenticator, UserDirectory};
use tradepost::domain::{AuthenticationService, CardService, ChatService, UserDirectoryService};
use tradepost::inbound::http::state::{HttpState, HttpStatePorts};
use tradepost::inbound::ws::ConnectionRegistry;
use tradepost::inbound::ws::state::WsState;
use tradepost::outbound::persistence::{
    DieselCardRepository, DieselMessageRepository, DieselUserRepository,
};

use super::ServerConfig;

/// Shared adapter state for one server instance.
#[derive(Clone)]
pub(super) struct AdapterStates {
    pub(super) http: web::Data<HttpState>,
    pub(super) ws: web::Data<WsState>,
}

/// Build every domain service once and hand the same instances to both
/// transports.
///
/// The connection registry is shared between the chat service, which
/// delivers through it, and the WebSocket sessions, which register with it.
pub(super) fn build_adapter_states(config: &ServerConfig) -> AdapterStates {
    let pool = &config.db_pool;
    let directory: Arc<dyn UserDirectory> = Arc::new(UserDirectoryService::new(Arc::new(
        DieselUserRepository::new(pool.clone()),
    )));
    let authenticator: Arc<dyn Authenticator> = Arc::new(AuthenticationService::new(
        Arc::clone(&config.verifier),
        Arc::clone(&directory),
    ));
    let cards = Arc::new(CardService::new(
        Arc::new(DieselCardRepository::new(pool.clone())),
        Arc::clone(&directory),
    ));
    let registry = Arc::new(ConnectionRegistry::new());
    let chat = Arc::new(ChatService::new(
        Arc::new(DieselMessageRepository::new(pool.clone())),
        Arc::clone(&directory),
        Arc::clone(&registry) as _,
        Arc::new(DefaultClock),
    ));

    let http = HttpState::new(HttpStatePorts {
        authenticator: Arc::clone(&authenticator),
        collection: Arc::clone(&cards) as _,
        marketplace: cards,
        users: directory,
        messaging: Arc::clone(&chat) as _,
    });
    let ws = WsState::new(
        authenticator,
        chat,
        registry,
        config.allowed_origins.clone(),
    );

    AdapterStates {
        http: web::Data::new(http),
        ws: web::Data::new(ws),
    }
}
