//! Port abstraction for the user directory store and its errors.
use async_trait::async_trait;

use crate::domain::{SubjectId, User, Username};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection => "user repository connection failed",
        /// Query or mutation failed during execution.
        Query => "user repository query failed",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Return the user for `subject_id`, creating it with `username` when absent.
    ///
    /// Concurrent first contacts for the same subject must resolve to a single
    /// record; the losing writer returns the winner's row.
    async fn find_or_create(
        &self,
        subject_id: &SubjectId,
        username: &Username,
    ) -> Result<User, UserPersistenceError>;

    /// Fetch a user by external subject identifier.
    async fn find_by_subject(
        &self,
        subject_id: &SubjectId,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// All users except `subject_id`, ordered by username.
    async fn list_excluding(
        &self,
        subject_id: &SubjectId,
    ) -> Result<Vec<User>, UserPersistenceError>;

    /// Users who have exchanged at least one message with `subject_id`.
    async fn list_conversation_partners(
        &self,
        subject_id: &SubjectId,
    ) -> Result<Vec<User>, UserPersistenceError>;
}
