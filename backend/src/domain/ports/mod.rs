//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`UserDirectory`, `Authenticator`, `CardCollection`,
//! `Marketplace`, `DirectMessaging`) are called by inbound adapters. Driven
//! ports (repositories, `IdentityVerifier`, `MessageDelivery`) are
//! implemented by outbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod authenticator;
mod card_collection;
mod card_repository;
mod direct_messaging;
mod identity_verifier;
mod message_delivery;
mod message_repository;
mod user_directory;
mod user_repository;

#[cfg(test)]
pub use authenticator::MockAuthenticator;
pub use authenticator::Authenticator;
#[cfg(test)]
pub use card_collection::{MockCardCollection, MockMarketplace};
pub use card_collection::{AddCardRequest, CardCollection, Marketplace};
#[cfg(test)]
pub use card_repository::MockCardRepository;
pub use card_repository::{CardPersistenceError, CardRepository, CardUpdateError};
#[cfg(test)]
pub use direct_messaging::MockDirectMessaging;
pub use direct_messaging::{DeliveryOutcome, DirectMessaging, SendReceipt};
#[cfg(test)]
pub use identity_verifier::MockIdentityVerifier;
pub use identity_verifier::{IdentityVerificationError, IdentityVerifier};
#[cfg(test)]
pub use message_delivery::MockMessageDelivery;
pub use message_delivery::MessageDelivery;
#[cfg(test)]
pub use message_repository::MockMessageRepository;
pub use message_repository::{MessagePersistenceError, MessageRepository};
#[cfg(test)]
pub use user_directory::MockUserDirectory;
pub use user_directory::UserDirectory;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
