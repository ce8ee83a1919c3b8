//! Card ledger data model and the marketplace state machine.
//!
//! A card moves between three states:
//!
//! ```text
//! IN_COLLECTION --list(price)--> FOR_SALE --markSold--> SOLD
//!       ^                            |
//!       +----------unlist------------+
//! ```
//!
//! Every transition is owner-only. The asking price exists only while the
//! card is for sale; a sold card keeps the final amount as a sale record.

use std::fmt;
use std::str::FromStr;

use super::{Price, SubjectId, Username};

/// Maximum length for card names and catalogue references.
pub const CARD_TEXT_MAX: usize = 255;

/// Validation errors raised while building card values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardValidationError {
    EmptyName,
    NameTooLong { max: usize },
    EmptyExternalId,
    ExternalIdTooLong { max: usize },
    UnknownStatus(String),
    /// Stored status and price columns disagree.
    InconsistentPrice { status: CardStatusKind },
}

impl fmt::Display for CardValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "card name must not be empty"),
            Self::NameTooLong { max } => {
                write!(f, "card name must be at most {max} characters")
            }
            Self::EmptyExternalId => write!(f, "external card id must not be empty"),
            Self::ExternalIdTooLong { max } => {
                write!(f, "external card id must be at most {max} characters")
            }
            Self::UnknownStatus(raw) => write!(f, "unknown card status: {raw}"),
            Self::InconsistentPrice { status } => {
                write!(f, "price columns are inconsistent with status {status}")
            }
        }
    }
}

impl std::error::Error for CardValidationError {}

fn bounded_text(
    raw: String,
    empty: CardValidationError,
    too_long: CardValidationError,
) -> Result<String, CardValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(empty);
    }
    if trimmed.chars().count() > CARD_TEXT_MAX {
        return Err(too_long);
    }
    Ok(trimmed.to_owned())
}

/// Store-assigned card identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CardId(i64);

impl CardId {
    /// Wrap a store-assigned identifier.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Access the raw identifier.
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Display name of a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardName(String);

impl CardName {
    /// Validate and construct a [`CardName`]; surrounding whitespace is trimmed.
    pub fn new(name: impl Into<String>) -> Result<Self, CardValidationError> {
        bounded_text(
            name.into(),
            CardValidationError::EmptyName,
            CardValidationError::NameTooLong { max: CARD_TEXT_MAX },
        )
        .map(Self)
    }
}

impl AsRef<str> for CardName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Reference into the external card catalogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalCardId(String);

impl ExternalCardId {
    /// Validate and construct an [`ExternalCardId`].
    pub fn new(id: impl Into<String>) -> Result<Self, CardValidationError> {
        bounded_text(
            id.into(),
            CardValidationError::EmptyExternalId,
            CardValidationError::ExternalIdTooLong { max: CARD_TEXT_MAX },
        )
        .map(Self)
    }
}

impl AsRef<str> for ExternalCardId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Status label without the attached amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardStatusKind {
    InCollection,
    ForSale,
    Sold,
}

impl CardStatusKind {
    /// Canonical storage and wire label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InCollection => "IN_COLLECTION",
            Self::ForSale => "FOR_SALE",
            Self::Sold => "SOLD",
        }
    }
}

impl fmt::Display for CardStatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CardStatusKind {
    type Err = CardValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "IN_COLLECTION" => Ok(Self::InCollection),
            "FOR_SALE" => Ok(Self::ForSale),
            "SOLD" => Ok(Self::Sold),
            other => Err(CardValidationError::UnknownStatus(other.to_owned())),
        }
    }
}

/// Lifecycle state of a card together with the amount it carries.
///
/// Encoding the price inside the variant makes "price present iff for sale"
/// unrepresentable to violate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardStatus {
    InCollection,
    ForSale { price: Price },
    Sold { sale_price: Price },
}

impl CardStatus {
    /// Rebuild a status from its stored columns.
    ///
    /// # Examples
    /// ```
    /// use tradepost::domain::{CardStatus, CardStatusKind, Price};
    ///
    /// let price: Price = "10.00".parse().expect("valid price");
    /// let status = CardStatus::from_parts(CardStatusKind::ForSale, Some(price), None)
    ///     .expect("consistent columns");
    /// assert_eq!(status.price(), Some(price));
    /// assert!(CardStatus::from_parts(CardStatusKind::InCollection, Some(price), None).is_err());
    /// ```
    pub fn from_parts(
        kind: CardStatusKind,
        price: Option<Price>,
        sale_price: Option<Price>,
    ) -> Result<Self, CardValidationError> {
        match (kind, price, sale_price) {
            (CardStatusKind::InCollection, None, None) => Ok(Self::InCollection),
            (CardStatusKind::ForSale, Some(price), None) => Ok(Self::ForSale { price }),
            (CardStatusKind::Sold, None, Some(sale_price)) => Ok(Self::Sold { sale_price }),
            (status, _, _) => Err(CardValidationError::InconsistentPrice { status }),
        }
    }

    /// Status label.
    pub fn kind(&self) -> CardStatusKind {
        match self {
            Self::InCollection => CardStatusKind::InCollection,
            Self::ForSale { .. } => CardStatusKind::ForSale,
            Self::Sold { .. } => CardStatusKind::Sold,
        }
    }

    /// Asking price; present only while the card is for sale.
    pub fn price(&self) -> Option<Price> {
        match self {
            Self::ForSale { price } => Some(*price),
            _ => None,
        }
    }

    /// Final amount recorded when the card was sold.
    pub fn sale_price(&self) -> Option<Price> {
        match self {
            Self::Sold { sale_price } => Some(*sale_price),
            _ => None,
        }
    }
}

/// Owner-initiated marketplace operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardTransition {
    List { price: Price },
    Unlist,
    MarkSold,
}

impl CardTransition {
    /// Operation name used in error messages and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::List { .. } => "list",
            Self::Unlist => "unlist",
            Self::MarkSold => "markSold",
        }
    }
}

/// Reasons a transition is refused. The card is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CardTransitionError {
    #[error("card {card} is not owned by {actor}")]
    NotOwner { card: CardId, actor: SubjectId },
    #[error("cannot {operation} card {card} while it is {from}")]
    InvalidTransition {
        card: CardId,
        from: CardStatusKind,
        operation: &'static str,
    },
}

/// A card instance owned by a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    id: CardId,
    name: CardName,
    external_id: ExternalCardId,
    owner: SubjectId,
    owner_username: Username,
    status: CardStatus,
}

/// Validated input for a card that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCard {
    pub name: CardName,
    pub external_id: ExternalCardId,
    pub owner: SubjectId,
    pub owner_username: Username,
}

impl Card {
    /// Assemble a card from validated parts.
    pub fn new(
        id: CardId,
        name: CardName,
        external_id: ExternalCardId,
        owner: SubjectId,
        owner_username: Username,
        status: CardStatus,
    ) -> Self {
        Self {
            id,
            name,
            external_id,
            owner,
            owner_username,
            status,
        }
    }

    /// Materialise a freshly inserted card; new cards start in the collection.
    pub fn from_new(id: CardId, new: NewCard) -> Self {
        Self::new(
            id,
            new.name,
            new.external_id,
            new.owner,
            new.owner_username,
            CardStatus::InCollection,
        )
    }

    pub fn id(&self) -> CardId {
        self.id
    }

    pub fn name(&self) -> &CardName {
        &self.name
    }

    pub fn external_id(&self) -> &ExternalCardId {
        &self.external_id
    }

    pub fn owner(&self) -> &SubjectId {
        &self.owner
    }

    /// Display name of the owner, shown as the seller on listings.
    pub fn owner_username(&self) -> &Username {
        &self.owner_username
    }

    pub fn status(&self) -> CardStatus {
        self.status
    }

    /// Apply an owner-initiated transition, returning the updated card.
    ///
    /// Ownership is checked before the state so non-owners learn nothing
    /// about the card's status.
    ///
    /// # Examples
    /// ```
    /// use tradepost::domain::{
    ///     Card, CardId, CardName, CardStatus, CardTransition, ExternalCardId, SubjectId,
    ///     Username,
    /// };
    ///
    /// let owner = SubjectId::new("user_1").expect("subject");
    /// let card = Card::new(
    ///     CardId::new(1),
    ///     CardName::new("Charizard").expect("name"),
    ///     ExternalCardId::new("base1-4").expect("external id"),
    ///     owner.clone(),
    ///     Username::new("ash").expect("username"),
    ///     CardStatus::InCollection,
    /// );
    /// let listed = card
    ///     .apply(&owner, CardTransition::List { price: "10.00".parse().expect("price") })
    ///     .expect("owner may list");
    /// assert_eq!(listed.status().price().map(|p| p.to_string()), Some("10.00".to_owned()));
    /// ```
    pub fn apply(
        &self,
        actor: &SubjectId,
        transition: CardTransition,
    ) -> Result<Self, CardTransitionError> {
        if &self.owner != actor {
            return Err(CardTransitionError::NotOwner {
                card: self.id,
                actor: actor.clone(),
            });
        }
        let next = match (self.status, transition) {
            (CardStatus::InCollection, CardTransition::List { price }) => {
                CardStatus::ForSale { price }
            }
            (CardStatus::ForSale { .. }, CardTransition::Unlist) => CardStatus::InCollection,
            (CardStatus::ForSale { price }, CardTransition::MarkSold) => {
                CardStatus::Sold { sale_price: price }
            }
            (current, op) => {
                return Err(CardTransitionError::InvalidTransition {
                    card: self.id,
                    from: current.kind(),
                    operation: op.name(),
                });
            }
        };
        Ok(Self {
            status: next,
            ..self.clone()
        })
    }
}

#[cfg(test)]
#[path = "card_tests.rs"]
mod tests;
