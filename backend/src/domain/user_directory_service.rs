//! User directory and authentication services.
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::ports::{Authenticator, IdentityVerifier, UserDirectory, UserRepository};
use crate::domain::service_support::{map_identity_error, map_user_persistence_error};
use crate::domain::{AuthenticatedIdentity, BearerCredential, Error, SubjectId, User, Username};

/// Directory service backed by a [`UserRepository`].
#[derive(Clone)]
pub struct UserDirectoryService<R> {
    users: Arc<R>,
}

impl<R> UserDirectoryService<R> {
    pub fn new(users: Arc<R>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl<R> UserDirectory for UserDirectoryService<R>
where
    R: UserRepository,
{
    async fn find_or_create_user(
        &self,
        subject_id: &SubjectId,
        username: &Username,
    ) -> Result<User, Error> {
        self.users
            .find_or_create(subject_id, username)
            .await
            .map_err(map_user_persistence_error)
    }

    async fn find_user(&self, subject_id: &SubjectId) -> Result<Option<User>, Error> {
        self.users
            .find_by_subject(subject_id)
            .await
            .map_err(map_user_persistence_error)
    }

    async fn list_other_users(&self, caller: &SubjectId) -> Result<Vec<User>, Error> {
        self.users
            .list_excluding(caller)
            .await
            .map_err(map_user_persistence_error)
    }

    async fn list_users_with_history(&self, subject_id: &SubjectId) -> Result<Vec<User>, Error> {
        self.users
            .list_conversation_partners(subject_id)
            .await
            .map_err(map_user_persistence_error)
    }
}

/// Authenticates bearer credentials and registers first-time callers.
#[derive(Clone)]
pub struct AuthenticationService {
    verifier: Arc<dyn IdentityVerifier>,
    directory: Arc<dyn UserDirectory>,
}

impl AuthenticationService {
    pub fn new(verifier: Arc<dyn IdentityVerifier>, directory: Arc<dyn UserDirectory>) -> Self {
        Self {
            verifier,
            directory,
        }
    }
}

#[async_trait]
impl Authenticator for AuthenticationService {
    async fn authenticate(
        &self,
        credential: &BearerCredential,
    ) -> Result<AuthenticatedIdentity, Error> {
        let verified = self.verifier.verify(credential).await.map_err(|err| {
            warn!(error = %err, "bearer credential verification failed");
            map_identity_error(err)
        })?;
        let user = self
            .directory
            .find_or_create_user(&verified.subject_id, &verified.username)
            .await?;
        debug!(subject = %user.subject_id(), "caller authenticated");
        Ok(AuthenticatedIdentity::new(user))
    }
}

#[cfg(test)]
#[path = "user_directory_service_tests.rs"]
mod tests;
