//! Tests for the card collection and marketplace service.

use super::*;
use crate::domain::ports::{CardPersistenceError, MockCardRepository, MockUserDirectory};
use crate::domain::{CardName, CardStatus, ErrorCode, ExternalCardId, User, UserId, Username};
use rstest::{fixture, rstest};
use serde_json::json;

fn owner() -> SubjectId {
    SubjectId::new("user_owner").expect("subject")
}

fn price(raw: &str) -> Price {
    raw.parse().expect("price")
}

fn card(status: CardStatus) -> Card {
    Card::new(
        CardId::new(5),
        CardName::new("Blastoise").expect("name"),
        ExternalCardId::new("base1-2").expect("external id"),
        owner(),
        Username::new("ash").expect("username"),
        status,
    )
}

fn identity() -> AuthenticatedIdentity {
    AuthenticatedIdentity::new(User::new(
        UserId::new(1),
        owner(),
        Username::new("ash").expect("username"),
    ))
}

#[fixture]
fn directory() -> Arc<dyn UserDirectory> {
    let mut directory = MockUserDirectory::new();
    directory
        .expect_find_or_create_user()
        .returning(|_, _| Ok(identity().user().clone()));
    Arc::new(directory)
}

#[rstest]
#[tokio::test]
async fn add_card_registers_owner_and_inserts(directory: Arc<dyn UserDirectory>) {
    let mut repo = MockCardRepository::new();
    repo.expect_insert()
        .withf(|new| {
            new.owner.as_ref() == "user_owner"
                && new.owner_username.as_ref() == "ash"
                && new.name.as_ref() == "Blastoise"
        })
        .times(1)
        .returning(|new| Ok(Card::from_new(CardId::new(5), new)));
    let service = CardService::new(Arc::new(repo), directory);

    let added = service
        .add_card(
            &identity(),
            AddCardRequest {
                name: CardName::new("Blastoise").expect("name"),
                external_id: ExternalCardId::new("base1-2").expect("external id"),
            },
        )
        .await
        .expect("card added");
    assert_eq!(added.status(), CardStatus::InCollection);
    assert_eq!(added.status().price(), None);
}

#[rstest]
#[tokio::test]
async fn list_without_price_is_rejected_before_store_access(directory: Arc<dyn UserDirectory>) {
    let mut repo = MockCardRepository::new();
    repo.expect_apply_transition().never();
    let service = CardService::new(Arc::new(repo), directory);

    let err = service
        .list_card(&owner(), CardId::new(5), None)
        .await
        .expect_err("missing price");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.details(), Some(&json!({ "field": "price" })));
}

#[rstest]
#[tokio::test]
async fn list_passes_price_to_the_ledger(directory: Arc<dyn UserDirectory>) {
    let mut repo = MockCardRepository::new();
    repo.expect_apply_transition()
        .withf(|id, actor, transition| {
            *id == CardId::new(5)
                && actor.as_ref() == "user_owner"
                && *transition
                    == CardTransition::List {
                        price: "10.00".parse().expect("price"),
                    }
        })
        .times(1)
        .returning(|_, _, _| {
            Ok(card(CardStatus::ForSale {
                price: "10.00".parse().expect("price"),
            }))
        });
    let service = CardService::new(Arc::new(repo), directory);

    let listed = service
        .list_card(&owner(), CardId::new(5), Some(price("10.00")))
        .await
        .expect("listed");
    assert_eq!(listed.status().price(), Some(price("10.00")));
}

#[rstest]
#[case::missing(CardUpdateError::NotFound(CardId::new(5)), ErrorCode::NotFound)]
#[case::not_owner(
    CardUpdateError::Rejected(CardTransitionError::NotOwner {
        card: CardId::new(5),
        actor: SubjectId::new("intruder").expect("subject"),
    }),
    ErrorCode::Forbidden
)]
#[case::bad_state(
    CardUpdateError::Rejected(CardTransitionError::InvalidTransition {
        card: CardId::new(5),
        from: CardStatusKind::InCollection,
        operation: "markSold",
    }),
    ErrorCode::InvalidStateTransition
)]
#[case::storage(
    CardUpdateError::Persistence(CardPersistenceError::connection("down")),
    ErrorCode::ServiceUnavailable
)]
#[tokio::test]
async fn ledger_failures_map_to_error_codes(
    directory: Arc<dyn UserDirectory>,
    #[case] failure: CardUpdateError,
    #[case] expected: ErrorCode,
) {
    let mut repo = MockCardRepository::new();
    repo.expect_apply_transition()
        .returning(move |_, _, _| Err(failure.clone()));
    let service = CardService::new(Arc::new(repo), directory);

    let err = service
        .mark_sold(&owner(), CardId::new(5))
        .await
        .expect_err("refused");
    assert_eq!(err.code(), expected);
}

#[rstest]
#[tokio::test]
async fn invalid_transition_reports_current_status(directory: Arc<dyn UserDirectory>) {
    let mut repo = MockCardRepository::new();
    repo.expect_apply_transition().returning(|_, _, _| {
        Err(CardUpdateError::Rejected(
            CardTransitionError::InvalidTransition {
                card: CardId::new(5),
                from: CardStatusKind::Sold,
                operation: "unlist",
            },
        ))
    });
    let service = CardService::new(Arc::new(repo), directory);

    let err = service
        .unlist_card(&owner(), CardId::new(5))
        .await
        .expect_err("refused");
    assert_eq!(
        err.details(),
        Some(&json!({ "cardId": 5, "status": "SOLD", "operation": "unlist" }))
    );
}

#[rstest]
#[tokio::test]
async fn listings_query_for_sale_cards(directory: Arc<dyn UserDirectory>) {
    let mut repo = MockCardRepository::new();
    repo.expect_list_by_status()
        .withf(|status| *status == CardStatusKind::ForSale)
        .times(1)
        .returning(|_| {
            Ok(vec![card(CardStatus::ForSale {
                price: "3.00".parse().expect("price"),
            })])
        });
    let service = CardService::new(Arc::new(repo), directory);

    let listings = service.listings().await.expect("listings");
    assert_eq!(listings.len(), 1);
}
