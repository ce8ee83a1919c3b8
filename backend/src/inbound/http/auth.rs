//! Bearer authentication for HTTP handlers.
//!
//! Keep the HTTP modules focused on request/response mapping by concentrating
//! credential parsing and caller checks here. Every REST call verifies its
//! `Authorization` header through the [`Authenticator`] port, which also
//! registers first-time callers in the user directory.
//!
//! [`Authenticator`]: crate::domain::ports::Authenticator

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;
use serde_json::json;
use tracing::{error, warn};

use crate::domain::{AuthenticatedIdentity, BearerCredential, Error};

use super::state::HttpState;

/// Extractor yielding the verified caller of the current request.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub AuthenticatedIdentity);

impl AuthenticatedUser {
    /// Verified identity of the caller.
    pub fn identity(&self) -> &AuthenticatedIdentity {
        &self.0
    }

    /// Reject requests whose body or query names a different caller.
    ///
    /// Clients may echo their own subject as `userId`; the bearer token stays
    /// authoritative and a mismatch is refused.
    pub fn ensure_claimed(&self, claimed: Option<&str>) -> Result<(), Error> {
        match claimed {
            Some(claimed) if claimed != self.0.subject_id().as_ref() => {
                warn!(
                    caller = %self.0.subject_id(),
                    claimed,
                    "request claimed a different user id"
                );
                Err(Error::forbidden("userId does not match the authenticated user")
                    .with_details(json!({ "field": "userId" })))
            }
            _ => Ok(()),
        }
    }
}

fn credential_from(req: &HttpRequest) -> Result<BearerCredential, Error> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .map(|value| value.to_str())
        .transpose()
        .map_err(|_| Error::unauthorized("authorization header is not valid text"))?;
    BearerCredential::parse(header).map_err(|err| {
        warn!(error = %err, "rejected request without usable bearer credential");
        Error::unauthorized(err.to_string())
    })
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        let credential = credential_from(req);
        Box::pin(async move {
            let Some(state) = state else {
                error!("HttpState missing from application data");
                return Err(Error::internal("authentication is not configured"));
            };
            let identity = state.authenticator.authenticate(&credential?).await?;
            Ok(Self(identity))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockAuthenticator;
    use crate::domain::{ErrorCode, SubjectId, User, UserId, Username};
    use crate::inbound::http::test_utils::state_with_authenticator;
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use actix_web::{App, HttpResponse};
    use rstest::{fixture, rstest};
    use serde_json::Value;

    fn identity(subject: &str) -> AuthenticatedIdentity {
        AuthenticatedIdentity::new(User::new(
            UserId::new(1),
            SubjectId::new(subject).expect("subject"),
            Username::new("ada").expect("username"),
        ))
    }

    #[fixture]
    fn authenticator() -> MockAuthenticator {
        let mut authenticator = MockAuthenticator::new();
        authenticator
            .expect_authenticate()
            .returning(|credential| match credential.token() {
                "good" => Ok(identity("user_1")),
                _ => Err(Error::unauthorized("invalid credential")),
            });
        authenticator
    }

    async fn call(authenticator: MockAuthenticator, header: Option<&str>) -> (StatusCode, Value) {
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state_with_authenticator(authenticator)))
                .route(
                    "/whoami",
                    web::get().to(|caller: AuthenticatedUser| async move {
                        HttpResponse::Ok().json(json!({
                            "subjectId": caller.identity().subject_id().as_ref(),
                        }))
                    }),
                ),
        )
        .await;
        let mut request = actix_test::TestRequest::get().uri("/whoami");
        if let Some(header) = header {
            request = request.insert_header((AUTHORIZATION, header));
        }
        let response = actix_test::call_service(&app, request.to_request()).await;
        let status = response.status();
        let body: Value = actix_test::read_body_json(response).await;
        (status, body)
    }

    #[rstest]
    #[actix_web::test]
    async fn resolves_verified_caller(authenticator: MockAuthenticator) {
        let (status, body) = call(authenticator, Some("Bearer good")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "subjectId": "user_1" }));
    }

    #[rstest]
    #[case::missing(None)]
    #[case::wrong_scheme(Some("Basic dXNlcjpwYXNz"))]
    #[case::bad_token(Some("Bearer forged"))]
    #[actix_web::test]
    async fn refuses_unusable_credentials(
        authenticator: MockAuthenticator,
        #[case] header: Option<&str>,
    ) {
        let (status, body) = call(authenticator, header).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], json!("unauthorized"));
        assert_eq!(body["success"], json!(false));
    }

    #[rstest]
    #[case(None, true)]
    #[case(Some("user_1"), true)]
    #[case(Some("user_2"), false)]
    fn claimed_user_must_match_caller(#[case] claimed: Option<&str>, #[case] allowed: bool) {
        let caller = AuthenticatedUser(identity("user_1"));
        let outcome = caller.ensure_claimed(claimed);
        assert_eq!(outcome.is_ok(), allowed);
        if let Err(err) = outcome {
            assert_eq!(err.code(), ErrorCode::Forbidden);
        }
    }
}
