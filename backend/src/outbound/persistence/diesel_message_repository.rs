//! PostgreSQL-backed `MessageRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{MessagePersistenceError, MessageRepository};
use crate::domain::{ChatMessage, MessageContent, MessageId, NewChatMessage, SubjectId, Username};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{ChatMessageRow, NewChatMessageRow};
use super::pool::{DbPool, PoolError};
use super::schema::chat_messages;

/// Diesel-backed conversation store.
#[derive(Clone)]
pub struct DieselMessageRepository {
    pool: DbPool,
}

impl DieselMessageRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> MessagePersistenceError {
    map_basic_pool_error(error, MessagePersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> MessagePersistenceError {
    map_basic_diesel_error(
        error,
        MessagePersistenceError::query,
        MessagePersistenceError::connection,
    )
}

fn row_to_message(row: ChatMessageRow) -> Result<ChatMessage, MessagePersistenceError> {
    fn corrupt(err: impl std::fmt::Display) -> MessagePersistenceError {
        MessagePersistenceError::query(format!("stored message invalid: {err}"))
    }

    Ok(ChatMessage {
        id: MessageId::new(row.id),
        sender_id: SubjectId::new(row.sender_subject_id).map_err(corrupt)?,
        sender_username: Username::new(row.sender_username).map_err(corrupt)?,
        recipient_id: SubjectId::new(row.recipient_subject_id).map_err(corrupt)?,
        recipient_username: Username::new(row.recipient_username).map_err(corrupt)?,
        content: MessageContent::new(row.content).map_err(corrupt)?,
        timestamp: row.sent_at,
    })
}

#[async_trait]
impl MessageRepository for DieselMessageRepository {
    async fn append(
        &self,
        message: NewChatMessage,
    ) -> Result<ChatMessage, MessagePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = diesel::insert_into(chat_messages::table)
            .values(&NewChatMessageRow {
                sender_subject_id: message.sender.subject_id.as_ref(),
                sender_username: message.sender.username.as_ref(),
                recipient_subject_id: message.recipient.subject_id.as_ref(),
                recipient_username: message.recipient.username.as_ref(),
                content: message.content.as_ref(),
                sent_at: message.sent_at,
            })
            .returning(ChatMessageRow::as_returning())
            .get_result::<ChatMessageRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_message(row)
    }

    async fn conversation(
        &self,
        a: &SubjectId,
        b: &SubjectId,
    ) -> Result<Vec<ChatMessage>, MessagePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let (a, b) = (a.as_ref(), b.as_ref());

        let rows: Vec<ChatMessageRow> = chat_messages::table
            .filter(
                chat_messages::sender_subject_id
                    .eq(a)
                    .and(chat_messages::recipient_subject_id.eq(b))
                    .or(chat_messages::sender_subject_id
                        .eq(b)
                        .and(chat_messages::recipient_subject_id.eq(a))),
            )
            .order((chat_messages::sent_at.asc(), chat_messages::id.asc()))
            .select(ChatMessageRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_message).collect()
    }
}
