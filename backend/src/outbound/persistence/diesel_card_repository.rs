//! PostgreSQL-backed `CardRepository`.
//!
//! Transitions lock the card row with `SELECT ... FOR UPDATE`, let the domain
//! decide via [`Card::apply`], and write the new status columns in the same
//! transaction. A rejected transition rolls back without writing.
//!
//! Cards reference their owner by subject; reads join `users` on it to pick up
//! the owner's username.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{CardPersistenceError, CardRepository, CardUpdateError};
use crate::domain::{
    Card, CardId, CardName, CardStatus, CardStatusKind, CardTransition, CardTransitionError,
    ExternalCardId, NewCard, Price, SubjectId, Username,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{CardRow, CardStatusUpdate, NewCardRow};
use super::pool::{DbPool, PoolError};
use super::schema::{cards, users};

/// Diesel-backed card ledger.
#[derive(Clone)]
pub struct DieselCardRepository {
    pool: DbPool,
}

impl DieselCardRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CardPersistenceError {
    map_basic_pool_error(error, CardPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> CardPersistenceError {
    map_basic_diesel_error(
        error,
        CardPersistenceError::query,
        CardPersistenceError::connection,
    )
}

fn stored_price(cents: Option<i64>) -> Result<Option<Price>, CardPersistenceError> {
    cents
        .map(Price::from_cents)
        .transpose()
        .map_err(|err| CardPersistenceError::query(format!("stored price invalid: {err}")))
}

fn row_to_card(row: CardRow, owner_username: String) -> Result<Card, CardPersistenceError> {
    let CardRow {
        id,
        name,
        external_card_id,
        owner_subject_id,
        status,
        price_cents,
        sale_price_cents,
    } = row;
    let corrupt = |err: &dyn std::fmt::Display| CardPersistenceError::query(err.to_string());

    let kind = status
        .parse::<CardStatusKind>()
        .map_err(|err| corrupt(&err))?;
    let status = CardStatus::from_parts(
        kind,
        stored_price(price_cents)?,
        stored_price(sale_price_cents)?,
    )
    .map_err(|err| corrupt(&err))?;

    Ok(Card::new(
        CardId::new(id),
        CardName::new(name).map_err(|err| corrupt(&err))?,
        ExternalCardId::new(external_card_id).map_err(|err| corrupt(&err))?,
        SubjectId::new(owner_subject_id).map_err(|err| corrupt(&err))?,
        Username::new(owner_username).map_err(|err| corrupt(&err))?,
        status,
    ))
}

/// Failures raised inside the transition transaction.
enum TransitionFailure {
    Diesel(diesel::result::Error),
    NotFound,
    Rejected(CardTransitionError),
    Stored(CardPersistenceError),
}

impl From<diesel::result::Error> for TransitionFailure {
    fn from(error: diesel::result::Error) -> Self {
        Self::Diesel(error)
    }
}

impl From<CardTransitionError> for TransitionFailure {
    fn from(error: CardTransitionError) -> Self {
        Self::Rejected(error)
    }
}

fn status_update(status: CardStatus) -> CardStatusUpdate<'static> {
    CardStatusUpdate {
        status: status.kind().as_str(),
        price_cents: status.price().map(Price::cents),
        sale_price_cents: status.sale_price().map(Price::cents),
        updated_at: Utc::now(),
    }
}

#[async_trait]
impl CardRepository for DieselCardRepository {
    async fn insert(&self, card: NewCard) -> Result<Card, CardPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = diesel::insert_into(cards::table)
            .values(&NewCardRow {
                name: card.name.as_ref(),
                external_card_id: card.external_id.as_ref(),
                owner_subject_id: card.owner.as_ref(),
                status: CardStatusKind::InCollection.as_str(),
            })
            .returning(CardRow::as_returning())
            .get_result::<CardRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_card(row, card.owner_username.as_ref().to_owned())
    }

    async fn list_by_owner(&self, owner: &SubjectId) -> Result<Vec<Card>, CardPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<(CardRow, String)> = cards::table
            .inner_join(users::table.on(users::subject_id.eq(cards::owner_subject_id)))
            .filter(cards::owner_subject_id.eq(owner.as_ref()))
            .order(cards::id.asc())
            .select((CardRow::as_select(), users::username))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(|(row, username)| row_to_card(row, username)).collect()
    }

    async fn list_by_status(
        &self,
        status: CardStatusKind,
    ) -> Result<Vec<Card>, CardPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<(CardRow, String)> = cards::table
            .inner_join(users::table.on(users::subject_id.eq(cards::owner_subject_id)))
            .filter(cards::status.eq(status.as_str()))
            .order(cards::id.asc())
            .select((CardRow::as_select(), users::username))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(|(row, username)| row_to_card(row, username)).collect()
    }

    async fn apply_transition(
        &self,
        id: CardId,
        actor: &SubjectId,
        transition: CardTransition,
    ) -> Result<Card, CardUpdateError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let outcome = conn
            .transaction::<Card, TransitionFailure, _>(|conn| {
                async move {
                    let row = cards::table
                        .filter(cards::id.eq(id.get()))
                        .select(CardRow::as_select())
                        .for_update()
                        .first::<CardRow>(conn)
                        .await
                        .optional()?;
                    let Some(row) = row else {
                        return Err(TransitionFailure::NotFound);
                    };
                    let owner_username = users::table
                        .filter(users::subject_id.eq(row.owner_subject_id.as_str()))
                        .select(users::username)
                        .first::<String>(conn)
                        .await?;
                    let current =
                        row_to_card(row, owner_username).map_err(TransitionFailure::Stored)?;
                    let next = current.apply(actor, transition)?;

                    diesel::update(cards::table.filter(cards::id.eq(id.get())))
                        .set(&status_update(next.status()))
                        .execute(conn)
                        .await?;
                    Ok(next)
                }
                .scope_boxed()
            })
            .await;

        outcome.map_err(|failure| match failure {
            TransitionFailure::Diesel(err) => CardUpdateError::Persistence(map_diesel_error(err)),
            TransitionFailure::NotFound => CardUpdateError::NotFound(id),
            TransitionFailure::Rejected(rejection) => CardUpdateError::Rejected(rejection),
            TransitionFailure::Stored(err) => CardUpdateError::Persistence(err),
        })
    }
}
