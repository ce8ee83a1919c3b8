//! OpenAPI schema definitions for response envelopes.
//!
//! Handlers return the generic `ApiEnvelope<T>`; OpenAPI needs one concrete
//! schema per payload. These wrappers mirror the serialised shape and exist
//! only for documentation.

use utoipa::ToSchema;

use crate::domain::{ChatMessage, ErrorCode, User};
use crate::inbound::http::card_dto::CardResponse;

/// Failure envelope returned by every endpoint.
#[derive(ToSchema)]
#[schema(as = ErrorEnvelope)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorEnvelopeSchema {
    /// Always `false`.
    #[schema(example = false)]
    success: bool,
    /// Always `null`.
    #[schema(value_type = Option<Object>)]
    data: Option<serde_json::Value>,
    /// Human-readable message returned to clients.
    #[schema(example = "card 7 not found")]
    message: String,
    /// Stable machine-readable error code.
    code: ErrorCode,
    /// Supplementary error details for clients.
    details: Option<serde_json::Value>,
    /// Correlation identifier, echoed in the `trace-id` header.
    #[schema(rename = "traceId", example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
}

/// Success envelope carrying one card.
#[derive(ToSchema)]
#[schema(as = CardEnvelope)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct CardEnvelopeSchema {
    #[schema(example = true)]
    success: bool,
    data: CardResponse,
    #[schema(example = "Card listed for sale successfully.")]
    message: String,
}

/// Success envelope carrying a list of cards.
#[derive(ToSchema)]
#[schema(as = CardListEnvelope)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct CardListEnvelopeSchema {
    #[schema(example = true)]
    success: bool,
    data: Vec<CardResponse>,
    #[schema(example = "Marketplace listings fetched successfully.")]
    message: String,
}

/// Success envelope carrying a list of users.
#[derive(ToSchema)]
#[schema(as = UserListEnvelope)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct UserListEnvelopeSchema {
    #[schema(example = true)]
    success: bool,
    data: Vec<User>,
    #[schema(example = "Users fetched successfully.")]
    message: String,
}

/// Success envelope carrying a conversation.
#[derive(ToSchema)]
#[schema(as = MessageListEnvelope)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct MessageListEnvelopeSchema {
    #[schema(example = true)]
    success: bool,
    data: Vec<ChatMessage>,
    #[schema(example = "Chat history fetched successfully.")]
    message: String,
}
