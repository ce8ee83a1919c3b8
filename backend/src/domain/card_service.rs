//! Card collection and marketplace services.
//!
//! Both driving ports share one service so collection inserts and
//! marketplace transitions go through the same ledger.
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::ports::{
    AddCardRequest, CardCollection, CardRepository, CardUpdateError, Marketplace, UserDirectory,
};
use crate::domain::service_support::map_card_persistence_error;
use crate::domain::{
    AuthenticatedIdentity, Card, CardId, CardStatusKind, CardTransition, CardTransitionError,
    Error, NewCard, Price, SubjectId,
};

/// Ledger-backed implementation of [`CardCollection`] and [`Marketplace`].
#[derive(Clone)]
pub struct CardService<R> {
    cards: Arc<R>,
    directory: Arc<dyn UserDirectory>,
}

impl<R> CardService<R> {
    pub fn new(cards: Arc<R>, directory: Arc<dyn UserDirectory>) -> Self {
        Self { cards, directory }
    }
}

fn map_update_error(error: CardUpdateError) -> Error {
    match error {
        CardUpdateError::NotFound(id) => Error::not_found(format!("card {id} not found")),
        CardUpdateError::Rejected(rejection) => {
            let message = rejection.to_string();
            match rejection {
                CardTransitionError::NotOwner { .. } => Error::forbidden(message),
                CardTransitionError::InvalidTransition {
                    card,
                    from,
                    operation,
                } => Error::invalid_state_transition(message).with_details(json!({
                    "cardId": card.get(),
                    "status": from.as_str(),
                    "operation": operation,
                })),
            }
        }
        CardUpdateError::Persistence(err) => map_card_persistence_error(err),
    }
}

impl<R> CardService<R>
where
    R: CardRepository,
{
    async fn transition(
        &self,
        actor: &SubjectId,
        card: CardId,
        transition: CardTransition,
    ) -> Result<Card, Error> {
        match self.cards.apply_transition(card, actor, transition).await {
            Ok(updated) => {
                info!(
                    card = %card,
                    actor = %actor,
                    operation = transition.name(),
                    status = %updated.status().kind(),
                    "card transition applied"
                );
                Ok(updated)
            }
            Err(err) => {
                warn!(
                    card = %card,
                    actor = %actor,
                    operation = transition.name(),
                    error = %err,
                    "card transition refused"
                );
                Err(map_update_error(err))
            }
        }
    }
}

#[async_trait]
impl<R> CardCollection for CardService<R>
where
    R: CardRepository,
{
    async fn add_card(
        &self,
        owner: &AuthenticatedIdentity,
        request: AddCardRequest,
    ) -> Result<Card, Error> {
        // The ledger references owners by subject; make sure the row exists.
        self.directory
            .find_or_create_user(owner.subject_id(), owner.username())
            .await?;
        let card = self
            .cards
            .insert(NewCard {
                name: request.name,
                external_id: request.external_id,
                owner: owner.subject_id().clone(),
                owner_username: owner.username().clone(),
            })
            .await
            .map_err(map_card_persistence_error)?;
        info!(card = %card.id(), owner = %owner.subject_id(), "card added to collection");
        Ok(card)
    }

    async fn list_collection(&self, owner: &SubjectId) -> Result<Vec<Card>, Error> {
        self.cards
            .list_by_owner(owner)
            .await
            .map_err(map_card_persistence_error)
    }
}

#[async_trait]
impl<R> Marketplace for CardService<R>
where
    R: CardRepository,
{
    async fn list_card(
        &self,
        actor: &SubjectId,
        card: CardId,
        price: Option<Price>,
    ) -> Result<Card, Error> {
        let Some(price) = price else {
            return Err(Error::invalid_request("price is required to list a card")
                .with_details(json!({ "field": "price" })));
        };
        self.transition(actor, card, CardTransition::List { price })
            .await
    }

    async fn unlist_card(&self, actor: &SubjectId, card: CardId) -> Result<Card, Error> {
        self.transition(actor, card, CardTransition::Unlist).await
    }

    async fn mark_sold(&self, actor: &SubjectId, card: CardId) -> Result<Card, Error> {
        self.transition(actor, card, CardTransition::MarkSold).await
    }

    async fn listings(&self) -> Result<Vec<Card>, Error> {
        self.cards
            .list_by_status(CardStatusKind::ForSale)
            .await
            .map_err(map_card_persistence_error)
    }
}

#[cfg(test)]
#[path = "card_service_tests.rs"]
mod tests;
