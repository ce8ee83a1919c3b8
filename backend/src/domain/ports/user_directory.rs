//! Driving port for user directory use-cases.
//!
//! Inbound adapters use this port to resolve and list users without
//! importing persistence concerns.

use async_trait::async_trait;

use crate::domain::{Error, SubjectId, User, Username};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Return the existing user for `subject_id` or register a new one.
    async fn find_or_create_user(
        &self,
        subject_id: &SubjectId,
        username: &Username,
    ) -> Result<User, Error>;

    /// Look up a known user.
    async fn find_user(&self, subject_id: &SubjectId) -> Result<Option<User>, Error>;

    /// Every known user except the caller.
    async fn list_other_users(&self, caller: &SubjectId) -> Result<Vec<User>, Error>;

    /// Users who have exchanged messages with `subject_id`.
    async fn list_users_with_history(&self, subject_id: &SubjectId) -> Result<Vec<User>, Error>;
}
