//! Domain primitives, services and ports.
//!
//! Purpose: hold the marketplace state machine, message routing and user
//! directory logic independent of HTTP, WebSocket and database concerns.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - User, SubjectId, Username: directory entries.
//! - Card, CardStatus, CardTransition, Price: card ledger and state machine.
//! - ChatMessage, MessageContent: direct messages.
//! - AuthenticatedIdentity, BearerCredential: authentication primitives.
//! - UserDirectoryService, AuthenticationService, CardService, ChatService:
//!   driving port implementations.

pub mod card;
mod card_service;
mod chat_service;
pub mod error;
pub mod identity;
pub mod message;
pub mod ports;
pub mod price;
mod service_support;
pub mod trace_id;
pub mod user;
mod user_directory_service;

pub use self::card::{
    CARD_TEXT_MAX, Card, CardId, CardName, CardStatus, CardStatusKind, CardTransition,
    CardTransitionError, CardValidationError, ExternalCardId, NewCard,
};
pub use self::card_service::CardService;
pub use self::chat_service::ChatService;
pub use self::error::{Error, ErrorCode};
pub use self::identity::{
    AuthenticatedIdentity, BearerCredential, CredentialError, VerifiedIdentity,
};
pub use self::message::{
    ChatMessage, MESSAGE_CONTENT_MAX, MessageContent, MessageId, MessageValidationError,
    NewChatMessage, Participant,
};
pub use self::price::{PRICE_MAX_CENTS, Price, PriceError};
pub use self::trace_id::TraceId;
pub use self::user::{SubjectId, User, UserId, UserValidationError, Username};
pub use self::user_directory_service::{AuthenticationService, UserDirectoryService};

/// Header carrying the request trace identifier.
pub const TRACE_ID_HEADER: &str = "trace-id";

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use tradepost::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::forbidden("nope"))
/// }
/// assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
