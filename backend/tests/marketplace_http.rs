//! End-to-end REST flows for the collection and marketplace endpoints.
//!
//! Requests run through the real `/api/v1` scope and domain services over
//! the in-memory repositories.

#[path = "support/http.rs"]
mod http_support;

use actix_web::http::StatusCode;
use actix_web::test::TestRequest;
use http_support::{bearer, call_json, init_api};
use rstest::rstest;
use serde_json::{Value, json};
use tradepost::domain::TRACE_ID_HEADER;
use tradepost::test_support::InMemoryBackend;

async fn add_card<S>(app: &S, token: &str, name: &str, external_id: &str) -> i64
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let request = bearer(TestRequest::post().uri("/api/v1/collection"), token)
        .set_json(json!({ "cardName": name, "externalCardId": external_id }))
        .to_request();
    let (status, body) = call_json(app, request).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["data"]["id"].as_i64().expect("card id")
}

fn card_names(body: &Value) -> Vec<&str> {
    body["data"]
        .as_array()
        .expect("card list")
        .iter()
        .filter_map(|card| card["cardName"].as_str())
        .collect()
}

#[rstest]
#[actix_web::test]
async fn card_moves_through_listing_lifecycle() {
    let backend = InMemoryBackend::default();
    let app = init_api(&backend).await;
    let card_id = add_card(&app, "ada-token", "Charizard", "base1-4").await;

    let list = bearer(
        TestRequest::put().uri(&format!("/api/v1/marketplace/list/{card_id}")),
        "ada-token",
    )
    .set_json(json!({ "price": 10.5 }))
    .to_request();
    let (status, body) = call_json(&app, list).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["status"], "FOR_SALE");
    assert_eq!(body["data"]["price"], "10.50");
    assert_eq!(body["data"]["ownerUsername"], "ada");

    let listings = bearer(TestRequest::get().uri("/api/v1/marketplace"), "grace-token")
        .to_request();
    let (_, body) = call_json(&app, listings).await;
    assert_eq!(card_names(&body), vec!["Charizard"]);
    assert_eq!(body["data"][0]["ownerId"], "user_ada");
    assert_eq!(body["data"][0]["ownerUsername"], "ada");

    let unlist = bearer(
        TestRequest::put().uri(&format!("/api/v1/marketplace/unlist/{card_id}")),
        "ada-token",
    )
    .to_request();
    let (status, body) = call_json(&app, unlist).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["status"], "IN_COLLECTION");
    assert_eq!(body["data"]["price"], Value::Null);

    let relist = bearer(
        TestRequest::put().uri(&format!("/api/v1/marketplace/list/{card_id}")),
        "ada-token",
    )
    .set_json(json!({ "price": "12.00", "userId": "user_ada" }))
    .to_request();
    let (status, _) = call_json(&app, relist).await;
    assert_eq!(status, StatusCode::OK);

    let sold = bearer(
        TestRequest::put().uri(&format!("/api/v1/marketplace/sold/{card_id}")),
        "ada-token",
    )
    .set_json(json!({}))
    .to_request();
    let (status, body) = call_json(&app, sold).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["status"], "SOLD");
    assert_eq!(body["data"]["salePrice"], "12.00");

    let listings = bearer(TestRequest::get().uri("/api/v1/marketplace"), "ada-token")
        .to_request();
    let (_, body) = call_json(&app, listings).await;
    assert!(card_names(&body).is_empty());

    let stored = backend.store.cards();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored.first().map(|card| card.owner().as_ref()), Some("user_ada"));
}

#[rstest]
#[actix_web::test]
async fn collections_are_scoped_to_their_owner() {
    let backend = InMemoryBackend::default();
    let app = init_api(&backend).await;
    add_card(&app, "ada-token", "Pikachu", "base1-58").await;
    add_card(&app, "grace-token", "Mewtwo", "base1-10").await;

    let own = bearer(TestRequest::get().uri("/api/v1/collection"), "ada-token").to_request();
    let (_, body) = call_json(&app, own).await;
    assert_eq!(card_names(&body), vec!["Pikachu"]);

    let other = bearer(
        TestRequest::get().uri("/api/v1/collection?userId=user_grace"),
        "ada-token",
    )
    .to_request();
    let (_, body) = call_json(&app, other).await;
    assert_eq!(card_names(&body), vec!["Mewtwo"]);
}

#[rstest]
#[case::not_owner(
    "grace-token",
    "/api/v1/marketplace/list/1",
    json!({ "price": 5 }),
    StatusCode::FORBIDDEN,
    "forbidden"
)]
#[case::claimed_other_user(
    "ada-token",
    "/api/v1/marketplace/list/1",
    json!({ "price": 5, "userId": "user_grace" }),
    StatusCode::FORBIDDEN,
    "forbidden"
)]
#[case::missing_price(
    "ada-token",
    "/api/v1/marketplace/list/1",
    json!({}),
    StatusCode::BAD_REQUEST,
    "invalid_request"
)]
#[case::three_decimals(
    "ada-token",
    "/api/v1/marketplace/list/1",
    json!({ "price": "1.005" }),
    StatusCode::BAD_REQUEST,
    "invalid_request"
)]
#[case::negative_price(
    "ada-token",
    "/api/v1/marketplace/list/1",
    json!({ "price": -1 }),
    StatusCode::BAD_REQUEST,
    "invalid_request"
)]
#[case::unlist_unlisted(
    "ada-token",
    "/api/v1/marketplace/unlist/1",
    json!({}),
    StatusCode::CONFLICT,
    "invalid_state_transition"
)]
#[case::sell_unlisted(
    "ada-token",
    "/api/v1/marketplace/sold/1",
    json!({}),
    StatusCode::CONFLICT,
    "invalid_state_transition"
)]
#[case::unknown_card(
    "ada-token",
    "/api/v1/marketplace/sold/99",
    json!({}),
    StatusCode::NOT_FOUND,
    "not_found"
)]
#[actix_web::test]
async fn rejected_transitions_leave_card_untouched(
    #[case] token: &str,
    #[case] uri: &str,
    #[case] payload: Value,
    #[case] expected_status: StatusCode,
    #[case] expected_code: &str,
) {
    let backend = InMemoryBackend::default();
    let app = init_api(&backend).await;
    add_card(&app, "ada-token", "Blastoise", "base1-2").await;

    let request = bearer(TestRequest::put().uri(uri), token)
        .set_json(payload)
        .to_request();
    let (status, body) = call_json(&app, request).await;

    assert_eq!(status, expected_status, "{body}");
    assert_eq!(body["code"], expected_code);
    let stored = backend.store.cards();
    assert_eq!(
        stored.first().map(|card| card.status().kind().as_str()),
        Some("IN_COLLECTION")
    );
}

#[rstest]
#[case::missing_header(None)]
#[case::unknown_token(Some("Bearer nobody"))]
#[case::wrong_scheme(Some("Basic YWRhOnB3"))]
#[actix_web::test]
async fn unauthenticated_requests_are_rejected(#[case] authorization: Option<&str>) {
    let backend = InMemoryBackend::default();
    let app = init_api(&backend).await;

    let mut request = TestRequest::get().uri("/api/v1/marketplace");
    if let Some(value) = authorization {
        request = request.insert_header((actix_web::http::header::AUTHORIZATION, value));
    }
    let response = actix_web::test::call_service(&app, request.to_request()).await;
    let status = response.status();
    let trace_header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let body: Value = actix_web::test::read_body_json(response).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "unauthorized");
    assert_eq!(body["traceId"].as_str(), trace_header.as_deref());
}

#[rstest]
#[actix_web::test]
async fn user_directory_lists_everyone_else() {
    let backend = InMemoryBackend::default();
    let app = init_api(&backend).await;
    for token in ["linus-token", "grace-token", "ada-token"] {
        let touch = bearer(TestRequest::get().uri("/api/v1/collection"), token).to_request();
        call_json(&app, touch).await;
    }

    let request = bearer(TestRequest::get().uri("/api/v1/users"), "grace-token").to_request();
    let (status, body) = call_json(&app, request).await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body["data"]
        .as_array()
        .expect("user list")
        .iter()
        .filter_map(|user| user["username"].as_str())
        .collect();
    assert_eq!(names, vec!["ada", "linus"]);
}
