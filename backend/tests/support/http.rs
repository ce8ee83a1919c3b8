//! HTTP test helpers shared by the REST integration suites.

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::header;
use actix_web::test::{self as actix_test, TestRequest};
use actix_web::{App, web};
use serde_json::Value;
use tradepost::Trace;
use tradepost::inbound::http::api_scope;
use tradepost::inbound::http::state::HttpState;
use tradepost::test_support::InMemoryBackend;

/// Initialise the `/api/v1` scope over `backend`, wrapped in trace middleware.
pub async fn init_api(
    backend: &InMemoryBackend,
) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error> {
    actix_test::init_service(
        App::new()
            .app_data(web::Data::new(HttpState::new(backend.http_ports())))
            .wrap(Trace)
            .service(api_scope()),
    )
    .await
}

/// Attach `Authorization: Bearer <token>` to `request`.
pub fn bearer(request: TestRequest, token: &str) -> TestRequest {
    request.insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
}

/// Call `app` and return the status with the decoded JSON body.
pub async fn call_json<S>(app: &S, request: Request) -> (actix_web::http::StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let response = actix_test::call_service(app, request).await;
    let status = response.status();
    let body = actix_test::read_body(response).await;
    let value = serde_json::from_slice(&body).expect("JSON response body");
    (status, value)
}
