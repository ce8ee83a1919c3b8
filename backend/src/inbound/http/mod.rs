//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod card_dto;
pub mod chat;
pub mod collection;
pub mod envelope;
pub mod error;
pub mod health;
pub mod marketplace;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;

use actix_web::web;

pub use crate::domain::ApiResult;

/// The `/api/v1` scope with every REST handler and extractor config.
///
/// Callers register [`state::HttpState`] as app data.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use tradepost::inbound::http::api_scope;
///
/// let app = App::new().service(api_scope());
/// ```
pub fn api_scope() -> actix_web::Scope {
    web::scope("/api/v1")
        .app_data(error::json_config())
        .app_data(error::path_config())
        .app_data(error::query_config())
        .service(collection::add_card)
        .service(collection::list_collection)
        .service(marketplace::list_card)
        .service(marketplace::unlist_card)
        .service(marketplace::mark_sold)
        .service(marketplace::listings)
        .service(users::list_chat_partners)
        .service(users::list_users)
        .service(chat::chat_history)
}
