//! In-memory adapters for tests.
//!
//! Compiled for unit tests and, behind the `test-support` feature, for the
//! integration suites under `backend/tests/`. [`InMemoryStore`] implements the
//! three repository ports over one mutex-guarded store so conversation
//! partners can be derived from stored messages the way the SQL adapter does.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use mockable::DefaultClock;

use crate::domain::ports::{
    Authenticator, CardPersistenceError, CardRepository, CardUpdateError,
    IdentityVerificationError, IdentityVerifier, MessagePersistenceError, MessageRepository,
    UserDirectory, UserPersistenceError, UserRepository,
};
use crate::domain::{
    AuthenticationService, BearerCredential, Card, CardId, CardService, CardStatusKind,
    CardTransition, ChatMessage, ChatService, MessageId, NewCard, NewChatMessage, SubjectId, User,
    UserDirectoryService, UserId, Username, VerifiedIdentity,
};
use crate::inbound::http::state::HttpStatePorts;
use crate::inbound::ws::origin::OriginAllowList;
use crate::inbound::ws::registry::ConnectionRegistry;
use crate::inbound::ws::state::WsState;

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    cards: Vec<Card>,
    messages: Vec<ChatMessage>,
}

/// Shared in-memory tables implementing every repository port.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryStore {
    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of every stored user in insertion order.
    pub fn users(&self) -> Vec<User> {
        self.lock().users.clone()
    }

    /// Snapshot of every stored card, ordered by id.
    pub fn cards(&self) -> Vec<Card> {
        self.lock().cards.clone()
    }

    /// Snapshot of every stored message in insertion order.
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.lock().messages.clone()
    }
}

fn next_id(len: usize) -> i64 {
    i64::try_from(len).map_or(i64::MAX, |count| count.saturating_add(1))
}

fn sorted_by_username(mut users: Vec<User>) -> Vec<User> {
    users.sort_by(|a, b| a.username().as_ref().cmp(b.username().as_ref()));
    users
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_or_create(
        &self,
        subject_id: &SubjectId,
        username: &Username,
    ) -> Result<User, UserPersistenceError> {
        let mut tables = self.lock();
        if let Some(existing) = tables
            .users
            .iter()
            .find(|user| user.subject_id() == subject_id)
        {
            return Ok(existing.clone());
        }
        let user = User::new(
            UserId::new(next_id(tables.users.len())),
            subject_id.clone(),
            username.clone(),
        );
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn find_by_subject(
        &self,
        subject_id: &SubjectId,
    ) -> Result<Option<User>, UserPersistenceError> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|user| user.subject_id() == subject_id)
            .cloned())
    }

    async fn list_excluding(
        &self,
        subject_id: &SubjectId,
    ) -> Result<Vec<User>, UserPersistenceError> {
        let others = self
            .lock()
            .users
            .iter()
            .filter(|user| user.subject_id() != subject_id)
            .cloned()
            .collect();
        Ok(sorted_by_username(others))
    }

    async fn list_conversation_partners(
        &self,
        subject_id: &SubjectId,
    ) -> Result<Vec<User>, UserPersistenceError> {
        let tables = self.lock();
        let partners: HashSet<&SubjectId> = tables
            .messages
            .iter()
            .filter_map(|message| {
                if &message.sender_id == subject_id {
                    Some(&message.recipient_id)
                } else if &message.recipient_id == subject_id {
                    Some(&message.sender_id)
                } else {
                    None
                }
            })
            .filter(|partner| *partner != subject_id)
            .collect();
        let users = tables
            .users
            .iter()
            .filter(|user| partners.contains(user.subject_id()))
            .cloned()
            .collect();
        Ok(sorted_by_username(users))
    }
}

#[async_trait]
impl CardRepository for InMemoryStore {
    async fn insert(&self, card: NewCard) -> Result<Card, CardPersistenceError> {
        let mut tables = self.lock();
        let card = Card::from_new(CardId::new(next_id(tables.cards.len())), card);
        tables.cards.push(card.clone());
        Ok(card)
    }

    async fn list_by_owner(&self, owner: &SubjectId) -> Result<Vec<Card>, CardPersistenceError> {
        Ok(self
            .lock()
            .cards
            .iter()
            .filter(|card| card.owner() == owner)
            .cloned()
            .collect())
    }

    async fn list_by_status(
        &self,
        status: CardStatusKind,
    ) -> Result<Vec<Card>, CardPersistenceError> {
        Ok(self
            .lock()
            .cards
            .iter()
            .filter(|card| card.status().kind() == status)
            .cloned()
            .collect())
    }

    async fn apply_transition(
        &self,
        id: CardId,
        actor: &SubjectId,
        transition: CardTransition,
    ) -> Result<Card, CardUpdateError> {
        let mut tables = self.lock();
        let slot = tables
            .cards
            .iter_mut()
            .find(|card| card.id() == id)
            .ok_or(CardUpdateError::NotFound(id))?;
        let updated = slot.apply(actor, transition)?;
        *slot = updated.clone();
        Ok(updated)
    }
}

#[async_trait]
impl MessageRepository for InMemoryStore {
    async fn append(
        &self,
        message: NewChatMessage,
    ) -> Result<ChatMessage, MessagePersistenceError> {
        let mut tables = self.lock();
        let stored = ChatMessage::from_new(MessageId::new(next_id(tables.messages.len())), message);
        tables.messages.push(stored.clone());
        Ok(stored)
    }

    async fn conversation(
        &self,
        a: &SubjectId,
        b: &SubjectId,
    ) -> Result<Vec<ChatMessage>, MessagePersistenceError> {
        let mut history: Vec<ChatMessage> = self
            .lock()
            .messages
            .iter()
            .filter(|message| message.is_between(a, b))
            .cloned()
            .collect();
        history.sort_by_key(|message| (message.timestamp, message.id));
        Ok(history)
    }
}

/// Identity verifier backed by a fixed token table.
///
/// Tokens missing from the table are rejected.
#[derive(Clone, Default)]
pub struct StaticIdentityVerifier {
    tokens: HashMap<String, VerifiedIdentity>,
}

impl StaticIdentityVerifier {
    /// Accept `token` as `subject` with display name `username`.
    ///
    /// # Panics
    ///
    /// Panics when `subject` or `username` are not valid directory values.
    #[must_use]
    pub fn with_user(mut self, token: &str, subject: &str, username: &str) -> Self {
        let identity = VerifiedIdentity {
            subject_id: SubjectId::new(subject).expect("valid fixture subject"),
            username: Username::new(username).expect("valid fixture username"),
        };
        self.tokens.insert(token.to_owned(), identity);
        self
    }
}

#[async_trait]
impl IdentityVerifier for StaticIdentityVerifier {
    async fn verify(
        &self,
        credential: &BearerCredential,
    ) -> Result<VerifiedIdentity, IdentityVerificationError> {
        self.tokens
            .get(credential.token())
            .cloned()
            .ok_or_else(|| IdentityVerificationError::rejected("unknown token"))
    }
}

/// Fully wired domain over in-memory adapters.
///
/// The default backend knows three users: token `ada-token` (`user_ada`,
/// `ada`), `grace-token` (`user_grace`, `grace`) and `linus-token`
/// (`user_linus`, `linus`).
#[derive(Clone)]
pub struct InMemoryBackend {
    pub store: InMemoryStore,
    pub registry: Arc<ConnectionRegistry>,
    verifier: Arc<StaticIdentityVerifier>,
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new(
            StaticIdentityVerifier::default()
                .with_user("ada-token", "user_ada", "ada")
                .with_user("grace-token", "user_grace", "grace")
                .with_user("linus-token", "user_linus", "linus"),
        )
    }
}

impl InMemoryBackend {
    pub fn new(verifier: StaticIdentityVerifier) -> Self {
        Self {
            store: InMemoryStore::default(),
            registry: Arc::new(ConnectionRegistry::new()),
            verifier: Arc::new(verifier),
        }
    }

    pub fn directory(&self) -> Arc<dyn UserDirectory> {
        Arc::new(UserDirectoryService::new(Arc::new(self.store.clone())))
    }

    pub fn authenticator(&self) -> Arc<dyn Authenticator> {
        Arc::new(AuthenticationService::new(
            Arc::clone(&self.verifier) as _,
            self.directory(),
        ))
    }

    fn chat(&self) -> Arc<ChatService<InMemoryStore>> {
        Arc::new(ChatService::new(
            Arc::new(self.store.clone()),
            self.directory(),
            Arc::clone(&self.registry) as _,
            Arc::new(DefaultClock),
        ))
    }

    /// Port bundle for [`crate::inbound::http::state::HttpState`].
    pub fn http_ports(&self) -> HttpStatePorts {
        let cards = Arc::new(CardService::new(Arc::new(self.store.clone()), self.directory()));
        HttpStatePorts {
            authenticator: self.authenticator(),
            collection: Arc::clone(&cards) as _,
            marketplace: cards,
            users: self.directory(),
            messaging: self.chat(),
        }
    }

    /// WebSocket state sharing this backend's connection registry.
    pub fn ws_state(&self, allowed_origins: OriginAllowList) -> WsState {
        WsState::new(
            self.authenticator(),
            self.chat(),
            Arc::clone(&self.registry),
            allowed_origins,
        )
    }
}
