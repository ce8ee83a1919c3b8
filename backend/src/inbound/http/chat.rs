//! Conversation history handler.
//!
//! ```text
//! GET /api/v1/chat/history/{recipientId}
//! ```
//!
//! Live messages travel over the WebSocket adapter; this endpoint replays the
//! stored conversation between the caller and one other user.

use actix_web::{get, web};
use serde_json::json;

use crate::domain::{ApiResult, ChatMessage, Error, SubjectId};
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::envelope::ApiEnvelope;
use crate::inbound::http::schemas::{ErrorEnvelopeSchema, MessageListEnvelopeSchema};
use crate::inbound::http::state::HttpState;

/// Messages exchanged with `recipient_id`, oldest first.
#[utoipa::path(
    get,
    path = "/api/v1/chat/history/{recipient_id}",
    params(("recipient_id" = String, Path, description = "Subject id of the other party")),
    responses(
        (status = 200, description = "Conversation history", body = MessageListEnvelopeSchema),
        (status = 400, description = "Invalid recipient id", body = ErrorEnvelopeSchema),
        (status = 401, description = "Unauthorised", body = ErrorEnvelopeSchema),
        (status = 503, description = "Storage unavailable", body = ErrorEnvelopeSchema)
    ),
    tags = ["chat"],
    operation_id = "getChatHistory"
)]
#[get("/chat/history/{recipient_id}")]
pub async fn chat_history(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<ApiEnvelope<Vec<ChatMessage>>>> {
    let other = SubjectId::new(path.into_inner()).map_err(|err| {
        Error::invalid_request(err.to_string()).with_details(json!({ "field": "recipientId" }))
    })?;
    let history = state
        .messaging
        .conversation_history(caller.identity().subject_id(), &other)
        .await?;
    Ok(ApiEnvelope::ok(history, "Chat history fetched successfully."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockDirectMessaging;
    use crate::domain::{MessageContent, MessageId, Username};
    use crate::inbound::http::test_utils::MockPorts;
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use chrono::{TimeZone, Utc};
    use rstest::rstest;
    use serde_json::Value;

    fn message(id: i64, from: &str, to: &str, minute: u32) -> ChatMessage {
        ChatMessage {
            id: MessageId::new(id),
            sender_id: SubjectId::new(from).expect("sender"),
            sender_username: Username::new(from).expect("sender name"),
            recipient_id: SubjectId::new(to).expect("recipient"),
            recipient_username: Username::new(to).expect("recipient name"),
            content: MessageContent::new(format!("message {id}")).expect("content"),
            timestamp: Utc
                .with_ymd_and_hms(2026, 3, 1, 12, minute, 0)
                .single()
                .expect("timestamp"),
        }
    }

    #[rstest]
    #[actix_web::test]
    async fn returns_history_in_store_order() {
        let mut messaging = MockDirectMessaging::new();
        messaging
            .expect_conversation_history()
            .withf(|caller, other| caller.as_ref() == "u1" && other.as_ref() == "u2")
            .times(1)
            .returning(|_, _| Ok(vec![message(1, "u1", "u2", 1), message(2, "u2", "u1", 2)]));
        let app = actix_test::init_service(
            MockPorts {
                messaging,
                ..MockPorts::default()
            }
            .into_app(),
        )
        .await;

        let request = actix_test::TestRequest::get()
            .uri("/api/v1/chat/history/u2")
            .insert_header(("Authorization", "Bearer u1"))
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["message"], json!("Chat history fetched successfully."));
        assert_eq!(
            body["data"][0],
            json!({
                "id": 1,
                "senderId": "u1",
                "senderUsername": "u1",
                "recipientId": "u2",
                "recipientUsername": "u2",
                "content": "message 1",
                "timestamp": "2026-03-01T12:01:00Z",
            })
        );
        assert_eq!(body["data"][1]["senderId"], json!("u2"));
    }

    #[rstest]
    #[actix_web::test]
    async fn blank_recipient_is_invalid() {
        let mut messaging = MockDirectMessaging::new();
        messaging.expect_conversation_history().times(0);
        let app = actix_test::init_service(
            MockPorts {
                messaging,
                ..MockPorts::default()
            }
            .into_app(),
        )
        .await;

        let request = actix_test::TestRequest::get()
            .uri("/api/v1/chat/history/%20")
            .insert_header(("Authorization", "Bearer u1"))
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
