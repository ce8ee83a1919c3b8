//! Driving ports for card collection and marketplace use-cases.

use async_trait::async_trait;

use crate::domain::{
    AuthenticatedIdentity, Card, CardId, CardName, Error, ExternalCardId, Price, SubjectId,
};

/// Request to add a card to the caller's collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddCardRequest {
    pub name: CardName,
    pub external_id: ExternalCardId,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CardCollection: Send + Sync {
    /// Add a card to the caller's collection in `IN_COLLECTION` state.
    async fn add_card(
        &self,
        owner: &AuthenticatedIdentity,
        request: AddCardRequest,
    ) -> Result<Card, Error>;

    /// Cards owned by `owner`, ordered by id.
    async fn list_collection(&self, owner: &SubjectId) -> Result<Vec<Card>, Error>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Marketplace: Send + Sync {
    /// Put a collected card up for sale at `price`.
    async fn list_card(
        &self,
        actor: &SubjectId,
        card: CardId,
        price: Option<Price>,
    ) -> Result<Card, Error>;

    /// Withdraw a listing and clear its price.
    async fn unlist_card(&self, actor: &SubjectId, card: CardId) -> Result<Card, Error>;

    /// Record a listed card as sold, retaining the price as the sale record.
    async fn mark_sold(&self, actor: &SubjectId, card: CardId) -> Result<Card, Error>;

    /// All cards currently for sale, ordered by id.
    async fn listings(&self) -> Result<Vec<Card>, Error>;
}
