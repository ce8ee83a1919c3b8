//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Users keyed by identity-provider subject.
    users (id) {
        id -> Int8,
        /// Unique external identity.
        subject_id -> Varchar,
        username -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Card ledger.
    ///
    /// `price_cents` is set only for `FOR_SALE`, `sale_price_cents` only for
    /// `SOLD`; CHECK constraints enforce both.
    cards (id) {
        id -> Int8,
        name -> Varchar,
        external_card_id -> Varchar,
        owner_subject_id -> Varchar,
        status -> Varchar,
        price_cents -> Nullable<Int8>,
        sale_price_cents -> Nullable<Int8>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Direct messages.
    chat_messages (id) {
        id -> Int8,
        sender_subject_id -> Varchar,
        sender_username -> Varchar,
        recipient_subject_id -> Varchar,
        recipient_username -> Varchar,
        content -> Text,
        sent_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(users, cards, chat_messages);
