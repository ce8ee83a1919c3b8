//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: every HTTP endpoint from the inbound layer (collection,
//!   marketplace, users, chat, health)
//! - **Schemas**: envelope wrappers from
//!   [`crate::inbound::http::schemas`] plus the domain payload types
//! - **Security**: bearer token authentication scheme
//!
//! The realtime `GET /ws` contract is JSON frames over a WebSocket and is not
//! described here. Swagger UI serves the document in debug builds.

use crate::domain::{ChatMessage, ErrorCode, User};
use crate::inbound::http::card_dto::{AddCardBody, CardResponse, ChangeStatusBody, ListCardBody};
use crate::inbound::http::schemas::{
    CardEnvelopeSchema, CardListEnvelopeSchema, ErrorEnvelopeSchema, MessageListEnvelopeSchema,
    UserListEnvelopeSchema,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the bearer security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerAuth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Token issued by the external identity provider."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Tradepost API",
        description = "Card collection, marketplace and direct message history for authenticated users.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerAuth" = [])),
    paths(
        crate::inbound::http::collection::add_card,
        crate::inbound::http::collection::list_collection,
        crate::inbound::http::marketplace::list_card,
        crate::inbound::http::marketplace::unlist_card,
        crate::inbound::http::marketplace::mark_sold,
        crate::inbound::http::marketplace::listings,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::list_chat_partners,
        crate::inbound::http::chat::chat_history,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorEnvelopeSchema,
        CardEnvelopeSchema,
        CardListEnvelopeSchema,
        UserListEnvelopeSchema,
        MessageListEnvelopeSchema,
        CardResponse,
        AddCardBody,
        ListCardBody,
        ChangeStatusBody,
        User,
        ChatMessage,
        ErrorCode,
    )),
    tags(
        (name = "collection", description = "Cards owned by the caller"),
        (name = "marketplace", description = "Listing lifecycle and public listings"),
        (name = "users", description = "User directory"),
        (name = "chat", description = "Direct message history"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
