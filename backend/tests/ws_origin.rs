//! Origin checks on the `/ws` upgrade.
//!
//! Browsers attach exactly one `Origin` header to a WebSocket handshake; the
//! endpoint only upgrades when it is present, parses and is allow-listed.

#[path = "support/ws.rs"]
mod ws_support;

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::header::{self, HeaderValue};
use actix_web::http::StatusCode;
use actix_web::test::{self as actix_test, TestRequest};
use actix_web::{App, web};
use rstest::rstest;
use tradepost::inbound::ws;
use tradepost::test_support::InMemoryBackend;

// Example Sec-WebSocket-Key from RFC 6455 section 1.3.
const RFC6455_SAMPLE_KEY: &str = "dGhlIHNhbXBsZSBub25jZQ==";

async fn ws_app()
-> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error> {
    let state = ws_support::ws_state(&InMemoryBackend::default());
    actix_test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .service(ws::ws_entry),
    )
    .await
}

fn origin(bytes: &[u8]) -> HeaderValue {
    HeaderValue::from_bytes(bytes).expect("opaque header value")
}

/// Handshake request carrying each of `origins` as a separate header.
fn handshake(origins: Vec<HeaderValue>) -> Request {
    let request = TestRequest::get()
        .uri("/ws")
        .insert_header((header::UPGRADE, "websocket"))
        .insert_header((header::CONNECTION, "Upgrade"))
        .insert_header((header::SEC_WEBSOCKET_VERSION, "13"))
        .insert_header((header::SEC_WEBSOCKET_KEY, RFC6455_SAMPLE_KEY));
    origins
        .into_iter()
        .fold(request, |request, value| {
            request.append_header((header::ORIGIN, value))
        })
        .to_request()
}

#[rstest]
#[case::apex("https://tradepost.example")]
#[case::subdomain("https://shop.tradepost.example")]
#[case::local_dev_server("http://localhost:5173")]
fn allow_listed_origins_upgrade(#[case] allowed: &str) {
    actix_rt::System::new().block_on(async move {
        let app = ws_app().await;

        let request = handshake(vec![origin(allowed.as_bytes())]);
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::SWITCHING_PROTOCOLS);
        assert_eq!(
            response.headers().get(header::UPGRADE).map(HeaderValue::as_bytes),
            Some(b"websocket".as_slice())
        );
    });
}

#[rstest]
#[case::missing(vec![], StatusCode::FORBIDDEN)]
#[case::unlisted(vec![origin(b"https://example.com")], StatusCode::FORBIDDEN)]
#[case::suffix_lookalike(
    vec![origin(b"https://tradepost.example.evil.test")],
    StatusCode::FORBIDDEN
)]
#[case::plain_http_apex(vec![origin(b"http://tradepost.example")], StatusCode::FORBIDDEN)]
#[case::localhost_port_zero(vec![origin(b"http://localhost:0")], StatusCode::FORBIDDEN)]
#[case::localhost_default_port(vec![origin(b"http://localhost")], StatusCode::FORBIDDEN)]
#[case::two_headers(
    vec![origin(b"https://tradepost.example"), origin(b"https://example.com")],
    StatusCode::BAD_REQUEST
)]
#[case::not_utf8(vec![origin(&[0x80])], StatusCode::BAD_REQUEST)]
#[case::not_a_url(vec![origin(b"not a url")], StatusCode::BAD_REQUEST)]
fn other_origins_are_refused(
    #[case] origins: Vec<HeaderValue>,
    #[case] expected: StatusCode,
) {
    actix_rt::System::new().block_on(async move {
        let app = ws_app().await;

        let response = actix_test::call_service(&app, handshake(origins)).await;

        assert_eq!(response.status(), expected);
        assert!(response.headers().get(header::UPGRADE).is_none());
    });
}
