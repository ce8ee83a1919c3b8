//! Port abstraction for the card ledger.
//!
//! Transitions run inside the adapter so the row lock, the ownership and
//! state checks, and the update share one transaction. Adapters delegate the
//! decision itself to [`Card::apply`].
use async_trait::async_trait;

use crate::domain::{
    Card, CardId, CardStatusKind, CardTransition, CardTransitionError, NewCard, SubjectId,
};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by card repository adapters.
    pub enum CardPersistenceError {
        /// Repository connection could not be established.
        Connection => "card repository connection failed",
        /// Query or mutation failed during execution.
        Query => "card repository query failed",
    }
}

/// Failure modes of [`CardRepository::apply_transition`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CardUpdateError {
    #[error("card {0} not found")]
    NotFound(CardId),
    #[error(transparent)]
    Rejected(#[from] CardTransitionError),
    #[error(transparent)]
    Persistence(#[from] CardPersistenceError),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CardRepository: Send + Sync {
    /// Store a new card in the owner's collection.
    async fn insert(&self, card: NewCard) -> Result<Card, CardPersistenceError>;

    /// Cards owned by `owner`, ordered by id.
    async fn list_by_owner(&self, owner: &SubjectId) -> Result<Vec<Card>, CardPersistenceError>;

    /// Cards in `status`, ordered by id.
    async fn list_by_status(
        &self,
        status: CardStatusKind,
    ) -> Result<Vec<Card>, CardPersistenceError>;

    /// Atomically load, check and update a card on behalf of `actor`.
    ///
    /// Nothing is written when the transition is rejected.
    async fn apply_transition(
        &self,
        id: CardId,
        actor: &SubjectId,
        transition: CardTransition,
    ) -> Result<Card, CardUpdateError>;
}
