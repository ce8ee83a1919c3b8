//! Marketplace API handlers.
//!
//! ```text
//! PUT /api/v1/marketplace/list/{cardId}   {"price": "10.00"}
//! PUT /api/v1/marketplace/unlist/{cardId} {}
//! PUT /api/v1/marketplace/sold/{cardId}   {}
//! GET /api/v1/marketplace
//! ```
//!
//! Status bodies are optional; an absent body behaves like `{}`.

use actix_web::{get, put, web};
use tracing::info;

use crate::domain::{ApiResult, CardId};
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::card_dto::{CardResponse, ChangeStatusBody, ListCardBody, card_list};
use crate::inbound::http::envelope::ApiEnvelope;
use crate::inbound::http::schemas::{
    CardEnvelopeSchema, CardListEnvelopeSchema, ErrorEnvelopeSchema,
};
use crate::inbound::http::state::HttpState;

fn claimed_user(body: Option<web::Json<ChangeStatusBody>>) -> Option<String> {
    body.and_then(|body| body.into_inner().user_id)
}

/// List a card for sale.
#[utoipa::path(
    put,
    path = "/api/v1/marketplace/list/{card_id}",
    params(("card_id" = i64, Path, description = "Card identifier")),
    request_body = ListCardBody,
    responses(
        (status = 200, description = "Card listed", body = CardEnvelopeSchema),
        (status = 400, description = "Missing or invalid price", body = ErrorEnvelopeSchema),
        (status = 401, description = "Unauthorised", body = ErrorEnvelopeSchema),
        (status = 403, description = "Caller does not own the card", body = ErrorEnvelopeSchema),
        (status = 404, description = "Card not found", body = ErrorEnvelopeSchema),
        (status = 409, description = "Card is not in the collection", body = ErrorEnvelopeSchema),
        (status = 503, description = "Storage unavailable", body = ErrorEnvelopeSchema)
    ),
    tags = ["marketplace"],
    operation_id = "listCardForSale"
)]
#[put("/marketplace/list/{card_id}")]
pub async fn list_card(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<i64>,
    payload: web::Json<ListCardBody>,
) -> ApiResult<web::Json<ApiEnvelope<CardResponse>>> {
    let body = payload.into_inner();
    caller.ensure_claimed(body.user_id.as_deref())?;
    let price = body.price.as_ref().map(|input| input.to_price()).transpose()?;
    let card_id = CardId::new(path.into_inner());
    let card = state
        .marketplace
        .list_card(caller.identity().subject_id(), card_id, price)
        .await?;
    info!(card = %card_id, "card listed for sale");
    Ok(ApiEnvelope::ok(
        CardResponse::from(&card),
        "Card listed for sale successfully.",
    ))
}

/// Withdraw a listed card back into the owner's collection.
#[utoipa::path(
    put,
    path = "/api/v1/marketplace/unlist/{card_id}",
    params(("card_id" = i64, Path, description = "Card identifier")),
    request_body(content = ChangeStatusBody, description = "Optional caller echo"),
    responses(
        (status = 200, description = "Listing removed", body = CardEnvelopeSchema),
        (status = 401, description = "Unauthorised", body = ErrorEnvelopeSchema),
        (status = 403, description = "Caller does not own the card", body = ErrorEnvelopeSchema),
        (status = 404, description = "Card not found", body = ErrorEnvelopeSchema),
        (status = 409, description = "Card is not for sale", body = ErrorEnvelopeSchema),
        (status = 503, description = "Storage unavailable", body = ErrorEnvelopeSchema)
    ),
    tags = ["marketplace"],
    operation_id = "unlistCard"
)]
#[put("/marketplace/unlist/{card_id}")]
pub async fn unlist_card(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<i64>,
    payload: Option<web::Json<ChangeStatusBody>>,
) -> ApiResult<web::Json<ApiEnvelope<CardResponse>>> {
    caller.ensure_claimed(claimed_user(payload).as_deref())?;
    let card_id = CardId::new(path.into_inner());
    let card = state
        .marketplace
        .unlist_card(caller.identity().subject_id(), card_id)
        .await?;
    info!(card = %card_id, "card listing removed");
    Ok(ApiEnvelope::ok(
        CardResponse::from(&card),
        "Card listing removed successfully.",
    ))
}

/// Record the sale of a listed card.
#[utoipa::path(
    put,
    path = "/api/v1/marketplace/sold/{card_id}",
    params(("card_id" = i64, Path, description = "Card identifier")),
    request_body(content = ChangeStatusBody, description = "Optional caller echo"),
    responses(
        (status = 200, description = "Card marked as sold", body = CardEnvelopeSchema),
        (status = 401, description = "Unauthorised", body = ErrorEnvelopeSchema),
        (status = 403, description = "Caller does not own the card", body = ErrorEnvelopeSchema),
        (status = 404, description = "Card not found", body = ErrorEnvelopeSchema),
        (status = 409, description = "Card is not for sale", body = ErrorEnvelopeSchema),
        (status = 503, description = "Storage unavailable", body = ErrorEnvelopeSchema)
    ),
    tags = ["marketplace"],
    operation_id = "markCardAsSold"
)]
#[put("/marketplace/sold/{card_id}")]
pub async fn mark_sold(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<i64>,
    payload: Option<web::Json<ChangeStatusBody>>,
) -> ApiResult<web::Json<ApiEnvelope<CardResponse>>> {
    caller.ensure_claimed(claimed_user(payload).as_deref())?;
    let card_id = CardId::new(path.into_inner());
    let card = state
        .marketplace
        .mark_sold(caller.identity().subject_id(), card_id)
        .await?;
    info!(card = %card_id, "card marked as sold");
    Ok(ApiEnvelope::ok(
        CardResponse::from(&card),
        "Card marked as sold successfully.",
    ))
}

/// Every card currently for sale.
#[utoipa::path(
    get,
    path = "/api/v1/marketplace",
    responses(
        (status = 200, description = "Cards for sale", body = CardListEnvelopeSchema),
        (status = 401, description = "Unauthorised", body = ErrorEnvelopeSchema),
        (status = 503, description = "Storage unavailable", body = ErrorEnvelopeSchema)
    ),
    tags = ["marketplace"],
    operation_id = "listMarketplace"
)]
#[get("/marketplace")]
pub async fn listings(
    state: web::Data<HttpState>,
    _caller: AuthenticatedUser,
) -> ApiResult<web::Json<ApiEnvelope<Vec<CardResponse>>>> {
    let cards = state.marketplace.listings().await?;
    Ok(ApiEnvelope::ok(
        card_list(&cards),
        "Marketplace listings fetched successfully.",
    ))
}

#[cfg(test)]
#[path = "marketplace_tests.rs"]
mod tests;
