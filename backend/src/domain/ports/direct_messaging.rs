//! Driving port for direct messaging.

use async_trait::async_trait;

use crate::domain::{AuthenticatedIdentity, ChatMessage, Error, MessageContent, SubjectId};

/// How far a stored message got towards its recipient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// Pushed to this many live connections of the recipient.
    Delivered { connections: usize },
    /// Recipient offline; the message is only in the conversation history.
    Stored,
}

/// Result of a successful send. Offline recipients are not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendReceipt {
    pub message: ChatMessage,
    pub outcome: DeliveryOutcome,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DirectMessaging: Send + Sync {
    /// Stamp, persist and forward a message from the authenticated `sender`.
    async fn send_direct_message(
        &self,
        sender: &AuthenticatedIdentity,
        recipient: &SubjectId,
        content: MessageContent,
    ) -> Result<SendReceipt, Error>;

    /// Conversation between `caller` and `other`, oldest first.
    async fn conversation_history(
        &self,
        caller: &SubjectId,
        other: &SubjectId,
    ) -> Result<Vec<ChatMessage>, Error>;
}
