//! Request and response payloads for card endpoints.

use serde::{Deserialize, Serialize};
use serde_json::{Number, json};
use utoipa::ToSchema;

use crate::domain::ports::AddCardRequest;
use crate::domain::{Card, CardName, ExternalCardId, Error, Price};

/// Card as returned by collection and marketplace endpoints.
///
/// `price` is set only while the card is listed; a sold card keeps its final
/// amount in `salePrice`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CardResponse {
    #[schema(example = 7)]
    pub id: i64,
    #[schema(example = "Charizard")]
    pub card_name: String,
    #[schema(example = "base1-4")]
    pub external_card_id: String,
    #[schema(example = "user_2abc")]
    pub owner_id: String,
    /// Seller name shown next to listings.
    #[schema(example = "ash")]
    pub owner_username: String,
    #[schema(example = "FOR_SALE")]
    pub status: String,
    #[schema(example = "10.00")]
    pub price: Option<String>,
    #[schema(example = "12.50")]
    pub sale_price: Option<String>,
}

impl From<&Card> for CardResponse {
    fn from(card: &Card) -> Self {
        let status = card.status();
        Self {
            id: card.id().get(),
            card_name: card.name().as_ref().to_owned(),
            external_card_id: card.external_id().as_ref().to_owned(),
            owner_id: card.owner().as_ref().to_owned(),
            owner_username: card.owner_username().as_ref().to_owned(),
            status: status.kind().as_str().to_owned(),
            price: status.price().map(|price| price.to_string()),
            sale_price: status.sale_price().map(|price| price.to_string()),
        }
    }
}

/// Convert a slice of cards for a list response.
pub fn card_list(cards: &[Card]) -> Vec<CardResponse> {
    cards.iter().map(CardResponse::from).collect()
}

/// Body of `POST /api/v1/collection`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddCardBody {
    #[schema(example = "Charizard")]
    pub card_name: String,
    #[serde(alias = "cardId")]
    #[schema(example = "base1-4")]
    pub external_card_id: String,
    /// Optional echo of the caller's subject id.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Accepted for compatibility; the verified token supplies the username.
    #[serde(default)]
    pub username: Option<String>,
}

impl AddCardBody {
    /// Validate the text fields into an [`AddCardRequest`].
    pub fn to_request(&self) -> Result<AddCardRequest, Error> {
        let name = CardName::new(self.card_name.as_str()).map_err(|err| {
            Error::invalid_request(err.to_string()).with_details(json!({ "field": "cardName" }))
        })?;
        let external_id = ExternalCardId::new(self.external_card_id.as_str()).map_err(|err| {
            Error::invalid_request(err.to_string())
                .with_details(json!({ "field": "externalCardId" }))
        })?;
        Ok(AddCardRequest { name, external_id })
    }
}

/// Price accepted as a JSON number or a decimal string.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum PriceInput {
    Number(Number),
    Text(String),
}

impl PriceInput {
    fn as_decimal_text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Number(number) => match (number.as_i64(), number.as_f64()) {
                (Some(whole), _) => whole.to_string(),
                // `f64`'s Display never uses exponent notation.
                (None, Some(float)) => float.to_string(),
                (None, None) => number.to_string(),
            },
        }
    }

    /// Parse into a [`Price`], reporting failures against the `price` field.
    pub fn to_price(&self) -> Result<Price, Error> {
        let text = self.as_decimal_text();
        text.parse::<Price>().map_err(|err| {
            Error::invalid_request(err.to_string())
                .with_details(json!({ "field": "price", "value": text }))
        })
    }
}

/// Body of `PUT /api/v1/marketplace/list/{cardId}`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListCardBody {
    /// Asking price as a number or decimal string with at most two decimals.
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "10.50")]
    pub price: Option<PriceInput>,
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Body of the unlist and sold endpoints.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangeStatusBody {
    #[serde(default)]
    pub user_id: Option<String>,
}
