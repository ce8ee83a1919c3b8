//! Internal Diesel row structs.
//!
//! These types never leave the persistence layer; repositories convert them
//! into validated domain values.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::{cards, chat_messages, users};

/// Row read from `users`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i64,
    pub subject_id: String,
    pub username: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub subject_id: &'a str,
    pub username: &'a str,
}

/// Row read from `cards`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = cards)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CardRow {
    pub id: i64,
    pub name: String,
    pub external_card_id: String,
    pub owner_subject_id: String,
    pub status: String,
    pub price_cents: Option<i64>,
    pub sale_price_cents: Option<i64>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = cards)]
pub(crate) struct NewCardRow<'a> {
    pub name: &'a str,
    pub external_card_id: &'a str,
    pub owner_subject_id: &'a str,
    pub status: &'a str,
}

/// Status columns written by a transition. `None` clears the column.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = cards)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct CardStatusUpdate<'a> {
    pub status: &'a str,
    pub price_cents: Option<i64>,
    pub sale_price_cents: Option<i64>,
    pub updated_at: DateTime<Utc>,
}

/// Row read from `chat_messages`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = chat_messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ChatMessageRow {
    pub id: i64,
    pub sender_subject_id: String,
    pub sender_username: String,
    pub recipient_subject_id: String,
    pub recipient_username: String,
    pub content: String,
    pub sent_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = chat_messages)]
pub(crate) struct NewChatMessageRow<'a> {
    pub sender_subject_id: &'a str,
    pub sender_username: &'a str,
    pub recipient_subject_id: &'a str,
    pub recipient_username: &'a str,
    pub content: &'a str,
    pub sent_at: DateTime<Utc>,
}
