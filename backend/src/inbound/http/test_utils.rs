//! Shared helpers for HTTP handler tests.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};

use crate::domain::ports::{
    MockAuthenticator, MockCardCollection, MockDirectMessaging, MockMarketplace,
    MockUserDirectory,
};
use crate::domain::{AuthenticatedIdentity, Error, SubjectId, User, UserId, Username};
use crate::inbound::http::state::{HttpState, HttpStatePorts};

/// Identity with the subject and username both set to `subject`.
pub fn identity(subject: &str) -> AuthenticatedIdentity {
    AuthenticatedIdentity::new(User::new(
        UserId::new(1),
        SubjectId::new(subject).expect("fixture subject"),
        Username::new(subject).expect("fixture username"),
    ))
}

/// Authenticator accepting any bearer token and treating it as the subject.
///
/// The token `"invalid"` is rejected.
pub fn bearer_authenticator() -> MockAuthenticator {
    let mut authenticator = MockAuthenticator::new();
    authenticator
        .expect_authenticate()
        .returning(|credential| match credential.token() {
            "invalid" => Err(Error::unauthorized("invalid credential")),
            token => Ok(identity(token)),
        });
    authenticator
}

/// Mock bundle for every port held by [`HttpState`].
pub struct MockPorts {
    pub authenticator: MockAuthenticator,
    pub collection: MockCardCollection,
    pub marketplace: MockMarketplace,
    pub users: MockUserDirectory,
    pub messaging: MockDirectMessaging,
}

impl Default for MockPorts {
    fn default() -> Self {
        Self {
            authenticator: bearer_authenticator(),
            collection: MockCardCollection::new(),
            marketplace: MockMarketplace::new(),
            users: MockUserDirectory::new(),
            messaging: MockDirectMessaging::new(),
        }
    }
}

impl MockPorts {
    pub fn into_state(self) -> HttpState {
        HttpState::new(HttpStatePorts {
            authenticator: Arc::new(self.authenticator),
            collection: Arc::new(self.collection),
            marketplace: Arc::new(self.marketplace),
            users: Arc::new(self.users),
            messaging: Arc::new(self.messaging),
        })
    }

    /// Application serving the full API scope over these mocks.
    pub fn into_app(
        self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(self.into_state()))
            .service(crate::inbound::http::api_scope())
    }
}

/// State using `authenticator` and inert mocks for every other port.
pub fn state_with_authenticator(authenticator: MockAuthenticator) -> HttpState {
    MockPorts {
        authenticator,
        ..MockPorts::default()
    }
    .into_state()
}
