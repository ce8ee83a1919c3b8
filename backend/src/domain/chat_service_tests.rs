//! Tests for direct message routing.

use super::*;
use crate::domain::ports::{
    MessagePersistenceError, MockMessageDelivery, MockMessageRepository, MockUserDirectory,
};
use crate::domain::{ErrorCode, MessageId, User, UserId, Username};
use chrono::{DateTime, Local, TimeZone, Utc};
use rstest::{fixture, rstest};

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
        .single()
        .expect("fixture timestamp")
}

fn user(id: i64, subject: &str, name: &str) -> User {
    User::new(
        UserId::new(id),
        SubjectId::new(subject).expect("subject"),
        Username::new(name).expect("username"),
    )
}

fn sender() -> AuthenticatedIdentity {
    AuthenticatedIdentity::new(user(1, "u1", "ada"))
}

fn recipient() -> SubjectId {
    SubjectId::new("u2").expect("subject")
}

fn content() -> MessageContent {
    MessageContent::new("got any holos?").expect("content")
}

#[fixture]
fn directory() -> Arc<dyn UserDirectory> {
    let mut directory = MockUserDirectory::new();
    directory.expect_find_user().returning(|subject| {
        Ok((subject.as_ref() == "u2").then(|| user(2, "u2", "grace")))
    });
    Arc::new(directory)
}

fn echoing_repository() -> MockMessageRepository {
    let mut repo = MockMessageRepository::new();
    repo.expect_append()
        .times(1)
        .returning(|new| Ok(ChatMessage::from_new(MessageId::new(11), new)));
    repo
}

fn service(
    repo: MockMessageRepository,
    directory: Arc<dyn UserDirectory>,
    delivery: MockMessageDelivery,
) -> ChatService<MockMessageRepository> {
    ChatService::new(
        Arc::new(repo),
        directory,
        Arc::new(delivery),
        Arc::new(FixtureClock { utc_now: now() }),
    )
}

#[rstest]
#[tokio::test]
async fn stamps_sender_recipient_and_server_time(directory: Arc<dyn UserDirectory>) {
    let mut delivery = MockMessageDelivery::new();
    delivery.expect_deliver().returning(|_, _| 1);
    let chat = service(echoing_repository(), directory, delivery);

    let receipt = chat
        .send_direct_message(&sender(), &recipient(), content())
        .await
        .expect("sent");
    let message = receipt.message;
    assert_eq!(message.sender_id.as_ref(), "u1");
    assert_eq!(message.sender_username.as_ref(), "ada");
    assert_eq!(message.recipient_id.as_ref(), "u2");
    assert_eq!(message.recipient_username.as_ref(), "grace");
    assert_eq!(message.timestamp, now());
}

#[rstest]
#[case(0, DeliveryOutcome::Stored)]
#[case(1, DeliveryOutcome::Delivered { connections: 1 })]
#[case(3, DeliveryOutcome::Delivered { connections: 3 })]
#[tokio::test]
async fn outcome_reflects_live_connections(
    directory: Arc<dyn UserDirectory>,
    #[case] reached: usize,
    #[case] expected: DeliveryOutcome,
) {
    let mut delivery = MockMessageDelivery::new();
    delivery
        .expect_deliver()
        .withf(|to, message| to.as_ref() == "u2" && message.id == MessageId::new(11))
        .times(1)
        .returning(move |_, _| reached);
    let chat = service(echoing_repository(), directory, delivery);

    let receipt = chat
        .send_direct_message(&sender(), &recipient(), content())
        .await
        .expect("offline recipients are not an error");
    assert_eq!(receipt.outcome, expected);
}

#[rstest]
#[tokio::test]
async fn unknown_recipient_is_not_found_and_nothing_is_stored(
    directory: Arc<dyn UserDirectory>,
) {
    let mut repo = MockMessageRepository::new();
    repo.expect_append().never();
    let mut delivery = MockMessageDelivery::new();
    delivery.expect_deliver().never();
    let chat = service(repo, directory, delivery);

    let err = chat
        .send_direct_message(
            &sender(),
            &SubjectId::new("ghost").expect("subject"),
            content(),
        )
        .await
        .expect_err("unknown recipient");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn failed_persistence_skips_delivery(directory: Arc<dyn UserDirectory>) {
    let mut repo = MockMessageRepository::new();
    repo.expect_append()
        .returning(|_| Err(MessagePersistenceError::connection("pool exhausted")));
    let mut delivery = MockMessageDelivery::new();
    delivery.expect_deliver().never();
    let chat = service(repo, directory, delivery);

    let err = chat
        .send_direct_message(&sender(), &recipient(), content())
        .await
        .expect_err("storage failure");
    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[tokio::test]
async fn history_is_returned_as_stored(directory: Arc<dyn UserDirectory>) {
    let mut repo = MockMessageRepository::new();
    repo.expect_conversation()
        .withf(|a, b| a.as_ref() == "u1" && b.as_ref() == "u2")
        .times(1)
        .returning(|_, _| Ok(Vec::new()));
    let chat = service(repo, directory, MockMessageDelivery::new());

    let history = chat
        .conversation_history(&SubjectId::new("u1").expect("subject"), &recipient())
        .await
        .expect("history");
    assert!(history.is_empty());
}
