//! Direct messages exchanged between two users.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{SubjectId, Username};

/// Maximum message length in characters.
pub const MESSAGE_CONTENT_MAX: usize = 4000;

/// Validation errors for message content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MessageValidationError {
    #[error("message content must not be empty")]
    Empty,
    #[error("message content must be at most {max} characters")]
    TooLong { max: usize },
}

/// Message body. Stored verbatim; blank bodies are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MessageContent(String);

impl MessageContent {
    /// Validate message content.
    pub fn new(content: impl Into<String>) -> Result<Self, MessageValidationError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(MessageValidationError::Empty);
        }
        if content.chars().count() > MESSAGE_CONTENT_MAX {
            return Err(MessageValidationError::TooLong {
                max: MESSAGE_CONTENT_MAX,
            });
        }
        Ok(Self(content))
    }
}

impl AsRef<str> for MessageContent {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<MessageContent> for String {
    fn from(value: MessageContent) -> Self {
        value.0
    }
}

impl TryFrom<String> for MessageContent {
    type Error = MessageValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Store-assigned message identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(i64);

impl MessageId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One side of a conversation, captured when the message was sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub subject_id: SubjectId,
    pub username: Username,
}

/// A message that has been stamped but not yet stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewChatMessage {
    pub sender: Participant,
    pub recipient: Participant,
    pub content: MessageContent,
    pub sent_at: DateTime<Utc>,
}

/// Persisted direct message.
///
/// Usernames are snapshots taken at send time and do not follow later
/// renames. Serialises in camelCase for both REST and WebSocket payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    #[schema(value_type = i64, example = 1)]
    pub id: MessageId,
    #[schema(value_type = String, example = "user_2abc")]
    pub sender_id: SubjectId,
    #[schema(value_type = String, example = "ada")]
    pub sender_username: Username,
    #[schema(value_type = String, example = "user_2def")]
    pub recipient_id: SubjectId,
    #[schema(value_type = String, example = "grace")]
    pub recipient_username: Username,
    #[schema(value_type = String, example = "Still have that holo?")]
    pub content: MessageContent,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// Attach the store-assigned identifier to a stamped message.
    pub fn from_new(id: MessageId, new: NewChatMessage) -> Self {
        Self {
            id,
            sender_id: new.sender.subject_id,
            sender_username: new.sender.username,
            recipient_id: new.recipient.subject_id,
            recipient_username: new.recipient.username,
            content: new.content,
            timestamp: new.sent_at,
        }
    }

    /// Whether the message belongs to the conversation between `a` and `b`.
    pub fn is_between(&self, a: &SubjectId, b: &SubjectId) -> bool {
        (&self.sender_id == a && &self.recipient_id == b)
            || (&self.sender_id == b && &self.recipient_id == a)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;
    use serde_json::json;

    fn subject(raw: &str) -> SubjectId {
        SubjectId::new(raw).expect("subject")
    }

    fn participant(raw: &str, name: &str) -> Participant {
        Participant {
            subject_id: subject(raw),
            username: Username::new(name).expect("username"),
        }
    }

    fn message() -> ChatMessage {
        ChatMessage::from_new(
            MessageId::new(3),
            NewChatMessage {
                sender: participant("u1", "ada"),
                recipient: participant("u2", "grace"),
                content: MessageContent::new("hello").expect("content"),
                sent_at: Utc
                    .with_ymd_and_hms(2026, 1, 2, 3, 4, 5)
                    .single()
                    .expect("timestamp"),
            },
        )
    }

    #[rstest]
    #[case("", MessageValidationError::Empty)]
    #[case(" \n\t", MessageValidationError::Empty)]
    fn rejects_blank_content(#[case] raw: &str, #[case] expected: MessageValidationError) {
        assert_eq!(MessageContent::new(raw), Err(expected));
    }

    #[rstest]
    fn rejects_overlong_content() {
        let raw = "a".repeat(MESSAGE_CONTENT_MAX + 1);
        assert_eq!(
            MessageContent::new(raw),
            Err(MessageValidationError::TooLong {
                max: MESSAGE_CONTENT_MAX
            })
        );
    }

    #[rstest]
    #[case("u1", "u2", true)]
    #[case("u2", "u1", true)]
    #[case("u1", "u3", false)]
    #[case("u3", "u2", false)]
    fn conversation_membership_is_symmetric(
        #[case] a: &str,
        #[case] b: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(message().is_between(&subject(a), &subject(b)), expected);
    }

    #[rstest]
    fn serialises_in_camel_case() {
        let value = serde_json::to_value(message()).expect("serialise");
        assert_eq!(
            value,
            json!({
                "id": 3,
                "senderId": "u1",
                "senderUsername": "ada",
                "recipientId": "u2",
                "recipientUsername": "grace",
                "content": "hello",
                "timestamp": "2026-01-02T03:04:05Z",
            })
        );
    }
}
