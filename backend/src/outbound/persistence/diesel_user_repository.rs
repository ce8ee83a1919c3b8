//! PostgreSQL-backed `UserRepository`.
//!
//! Find-or-create relies on the unique constraint on `users.subject_id`: the
//! insert is a no-op for a subject that already exists (including one created
//! by a concurrent request) and the follow-up read returns the stored row.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{SubjectId, User, UserId, Username};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{chat_messages, users};

/// Diesel-backed user directory store.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    map_basic_pool_error(error, UserPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    map_basic_diesel_error(
        error,
        UserPersistenceError::query,
        UserPersistenceError::connection,
    )
}

fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    let UserRow {
        id,
        subject_id,
        username,
    } = row;
    let subject_id =
        SubjectId::new(subject_id).map_err(|err| UserPersistenceError::query(err.to_string()))?;
    let username =
        Username::new(username).map_err(|err| UserPersistenceError::query(err.to_string()))?;
    Ok(User::new(UserId::new(id), subject_id, username))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_or_create(
        &self,
        subject_id: &SubjectId,
        username: &Username,
    ) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(users::table)
            .values(&NewUserRow {
                subject_id: subject_id.as_ref(),
                username: username.as_ref(),
            })
            .on_conflict(users::subject_id)
            .do_nothing()
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let row = users::table
            .filter(users::subject_id.eq(subject_id.as_ref()))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_user(row)
    }

    async fn find_by_subject(
        &self,
        subject_id: &SubjectId,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = users::table
            .filter(users::subject_id.eq(subject_id.as_ref()))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_user).transpose()
    }

    async fn list_excluding(
        &self,
        subject_id: &SubjectId,
    ) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<UserRow> = users::table
            .filter(users::subject_id.ne(subject_id.as_ref()))
            .order((users::username.asc(), users::id.asc()))
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_user).collect()
    }

    async fn list_conversation_partners(
        &self,
        subject_id: &SubjectId,
    ) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let subject = subject_id.as_ref();

        let wrote_to = chat_messages::table
            .filter(chat_messages::sender_subject_id.eq(subject))
            .select(chat_messages::recipient_subject_id);
        let heard_from = chat_messages::table
            .filter(chat_messages::recipient_subject_id.eq(subject))
            .select(chat_messages::sender_subject_id);

        let rows: Vec<UserRow> = users::table
            .filter(
                users::subject_id
                    .eq_any(wrote_to)
                    .or(users::subject_id.eq_any(heard_from)),
            )
            .filter(users::subject_id.ne(subject))
            .order((users::username.asc(), users::id.asc()))
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_user).collect()
    }
}
