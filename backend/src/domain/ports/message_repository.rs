//! Port abstraction for the conversation store.
use async_trait::async_trait;

use crate::domain::{ChatMessage, NewChatMessage, SubjectId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by message repository adapters.
    pub enum MessagePersistenceError {
        /// Repository connection could not be established.
        Connection => "message repository connection failed",
        /// Query or mutation failed during execution.
        Query => "message repository query failed",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Persist a stamped message and return it with its assigned id.
    async fn append(&self, message: NewChatMessage) -> Result<ChatMessage, MessagePersistenceError>;

    /// Messages between `a` and `b` in either direction, oldest first.
    async fn conversation(
        &self,
        a: &SubjectId,
        b: &SubjectId,
    ) -> Result<Vec<ChatMessage>, MessagePersistenceError>;
}
