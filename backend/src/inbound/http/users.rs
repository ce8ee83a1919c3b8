//! Users API handlers.
//!
//! ```text
//! GET /api/v1/users
//! GET /api/v1/users/chat-partners
//! ```

use actix_web::{get, web};

use crate::domain::{ApiResult, User};
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::envelope::ApiEnvelope;
use crate::inbound::http::schemas::{ErrorEnvelopeSchema, UserListEnvelopeSchema};
use crate::inbound::http::state::HttpState;

/// List every known user except the caller.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use tradepost::inbound::http::users::list_users;
///
/// let app = App::new().service(list_users);
/// ```
#[utoipa::path(
    get,
    path = "/api/v1/users",
    responses(
        (status = 200, description = "Other users", body = UserListEnvelopeSchema),
        (status = 401, description = "Unauthorised", body = ErrorEnvelopeSchema),
        (status = 503, description = "Storage unavailable", body = ErrorEnvelopeSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
) -> ApiResult<web::Json<ApiEnvelope<Vec<User>>>> {
    let users = state
        .users
        .list_other_users(caller.identity().subject_id())
        .await?;
    Ok(ApiEnvelope::ok(users, "Users fetched successfully."))
}

/// List users the caller has exchanged messages with.
#[utoipa::path(
    get,
    path = "/api/v1/users/chat-partners",
    responses(
        (status = 200, description = "Chat partners", body = UserListEnvelopeSchema),
        (status = 401, description = "Unauthorised", body = ErrorEnvelopeSchema),
        (status = 503, description = "Storage unavailable", body = ErrorEnvelopeSchema)
    ),
    tags = ["users"],
    operation_id = "listChatPartners"
)]
#[get("/users/chat-partners")]
pub async fn list_chat_partners(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
) -> ApiResult<web::Json<ApiEnvelope<Vec<User>>>> {
    let users = state
        .users
        .list_users_with_history(caller.identity().subject_id())
        .await?;
    Ok(ApiEnvelope::ok(users, "Chat partners fetched."))
}
