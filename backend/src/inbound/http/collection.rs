//! Collection API handlers.
//!
//! ```text
//! POST /api/v1/collection {"cardName":"Charizard","externalCardId":"base1-4"}
//! GET /api/v1/collection?userId=user_2abc
//! ```

use actix_web::{get, post, web};
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use utoipa::IntoParams;

use crate::domain::{ApiResult, Error, SubjectId};
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::card_dto::{AddCardBody, CardResponse, card_list};
use crate::inbound::http::envelope::ApiEnvelope;
use crate::inbound::http::schemas::{
    CardEnvelopeSchema, CardListEnvelopeSchema, ErrorEnvelopeSchema,
};
use crate::inbound::http::state::HttpState;

/// Query for `GET /api/v1/collection`.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct CollectionQuery {
    /// Owner whose collection to list; defaults to the caller.
    pub user_id: Option<String>,
}

/// Add a card to the caller's collection.
#[utoipa::path(
    post,
    path = "/api/v1/collection",
    request_body = AddCardBody,
    responses(
        (status = 200, description = "Card added", body = CardEnvelopeSchema),
        (status = 400, description = "Invalid request", body = ErrorEnvelopeSchema),
        (status = 401, description = "Unauthorised", body = ErrorEnvelopeSchema),
        (status = 403, description = "userId names another user", body = ErrorEnvelopeSchema),
        (status = 503, description = "Storage unavailable", body = ErrorEnvelopeSchema)
    ),
    tags = ["collection"],
    operation_id = "addCardToCollection"
)]
#[post("/collection")]
pub async fn add_card(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    payload: web::Json<AddCardBody>,
) -> ApiResult<web::Json<ApiEnvelope<CardResponse>>> {
    let body = payload.into_inner();
    caller.ensure_claimed(body.user_id.as_deref())?;
    let request = body.to_request()?;
    let card = state.collection.add_card(caller.identity(), request).await?;
    info!(card = %card.id(), owner = %card.owner(), "card added to collection");
    Ok(ApiEnvelope::ok(
        CardResponse::from(&card),
        "Card added to collection.",
    ))
}

/// List the cards owned by a user.
#[utoipa::path(
    get,
    path = "/api/v1/collection",
    params(CollectionQuery),
    responses(
        (status = 200, description = "Cards owned by the user", body = CardListEnvelopeSchema),
        (status = 400, description = "Invalid request", body = ErrorEnvelopeSchema),
        (status = 401, description = "Unauthorised", body = ErrorEnvelopeSchema),
        (status = 503, description = "Storage unavailable", body = ErrorEnvelopeSchema)
    ),
    tags = ["collection"],
    operation_id = "listCollection"
)]
#[get("/collection")]
pub async fn list_collection(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    query: web::Query<CollectionQuery>,
) -> ApiResult<web::Json<ApiEnvelope<Vec<CardResponse>>>> {
    let owner = match query.into_inner().user_id {
        Some(raw) => SubjectId::new(raw).map_err(|err| {
            Error::invalid_request(err.to_string()).with_details(json!({ "field": "userId" }))
        })?,
        None => caller.identity().subject_id().clone(),
    };
    let cards = state.collection.list_collection(&owner).await?;
    Ok(ApiEnvelope::ok(card_list(&cards), "Cards fetched for user."))
}
