//! Port error mapping shared by the domain services.
//!
//! Storage failures surface as `service_unavailable`; their detail stays in
//! the message for logs and is never retried here.

use crate::domain::Error;
use crate::domain::ports::{
    CardPersistenceError, IdentityVerificationError, MessagePersistenceError,
    UserPersistenceError,
};

pub(crate) fn map_user_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user directory unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::service_unavailable(format!("user directory query failed: {message}"))
        }
    }
}

pub(crate) fn map_card_persistence_error(error: CardPersistenceError) -> Error {
    match error {
        CardPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("card ledger unavailable: {message}"))
        }
        CardPersistenceError::Query { message } => {
            Error::service_unavailable(format!("card ledger query failed: {message}"))
        }
    }
}

pub(crate) fn map_message_persistence_error(error: MessagePersistenceError) -> Error {
    match error {
        MessagePersistenceError::Connection { message } => {
            Error::service_unavailable(format!("conversation store unavailable: {message}"))
        }
        MessagePersistenceError::Query { message } => {
            Error::service_unavailable(format!("conversation store query failed: {message}"))
        }
    }
}

pub(crate) fn map_identity_error(error: IdentityVerificationError) -> Error {
    match error {
        IdentityVerificationError::Rejected { .. } => Error::unauthorized("invalid credential"),
        IdentityVerificationError::Unavailable { message } => {
            Error::service_unavailable(format!("identity provider unavailable: {message}"))
        }
    }
}
