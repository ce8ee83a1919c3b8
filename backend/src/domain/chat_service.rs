//! Direct message routing: stamp, persist, then push to live connections.
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, info};

use crate::domain::ports::{
    DeliveryOutcome, DirectMessaging, MessageDelivery, MessageRepository, SendReceipt,
    UserDirectory,
};
use crate::domain::service_support::map_message_persistence_error;
use crate::domain::{
    AuthenticatedIdentity, ChatMessage, Error, MessageContent, NewChatMessage, Participant,
    SubjectId,
};

/// Chat service implementing [`DirectMessaging`].
///
/// The sender is always the authenticated identity; nothing in the inbound
/// payload can override it.
#[derive(Clone)]
pub struct ChatService<M> {
    messages: Arc<M>,
    directory: Arc<dyn UserDirectory>,
    delivery: Arc<dyn MessageDelivery>,
    clock: Arc<dyn Clock>,
}

impl<M> ChatService<M> {
    /// Create a chat service.
    ///
    /// ```rust,no_run
    /// # use std::sync::Arc;
    /// # use mockable::DefaultClock;
    /// # use tradepost::domain::ChatService;
    /// # use tradepost::inbound::ws::ConnectionRegistry;
    /// # fn example(
    /// #     messages: Arc<tradepost::outbound::persistence::DieselMessageRepository>,
    /// #     directory: Arc<dyn tradepost::domain::ports::UserDirectory>,
    /// # ) {
    /// let registry = Arc::new(ConnectionRegistry::default());
    /// let _service = ChatService::new(messages, directory, registry, Arc::new(DefaultClock));
    /// # }
    /// ```
    pub fn new(
        messages: Arc<M>,
        directory: Arc<dyn UserDirectory>,
        delivery: Arc<dyn MessageDelivery>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            messages,
            directory,
            delivery,
            clock,
        }
    }
}

#[async_trait]
impl<M> DirectMessaging for ChatService<M>
where
    M: MessageRepository,
{
    async fn send_direct_message(
        &self,
        sender: &AuthenticatedIdentity,
        recipient: &SubjectId,
        content: MessageContent,
    ) -> Result<SendReceipt, Error> {
        let Some(recipient_user) = self.directory.find_user(recipient).await? else {
            return Err(Error::not_found(format!("recipient {recipient} not found")));
        };
        let stamped = NewChatMessage {
            sender: Participant {
                subject_id: sender.subject_id().clone(),
                username: sender.username().clone(),
            },
            recipient: Participant {
                subject_id: recipient_user.subject_id().clone(),
                username: recipient_user.username().clone(),
            },
            content,
            sent_at: self.clock.utc(),
        };
        let message = self
            .messages
            .append(stamped)
            .await
            .map_err(map_message_persistence_error)?;

        let outcome = match self.delivery.deliver(recipient, &message) {
            0 => DeliveryOutcome::Stored,
            connections => DeliveryOutcome::Delivered { connections },
        };
        info!(
            message = %message.id,
            sender = %message.sender_id,
            recipient = %message.recipient_id,
            ?outcome,
            "direct message routed"
        );
        Ok(SendReceipt { message, outcome })
    }

    async fn conversation_history(
        &self,
        caller: &SubjectId,
        other: &SubjectId,
    ) -> Result<Vec<ChatMessage>, Error> {
        let history = self
            .messages
            .conversation(caller, other)
            .await
            .map_err(map_message_persistence_error)?;
        debug!(caller = %caller, other = %other, count = history.len(), "history loaded");
        Ok(history)
    }
}

#[cfg(test)]
#[path = "chat_service_tests.rs"]
mod tests;
