//! Tests for the user directory and authentication services.

use super::*;
use crate::domain::ports::{
    IdentityVerificationError, MockIdentityVerifier, MockUserDirectory, MockUserRepository,
    UserPersistenceError,
};
use crate::domain::{ErrorCode, UserId, VerifiedIdentity};
use rstest::rstest;

fn user(id: i64, subject: &str, name: &str) -> User {
    User::new(
        UserId::new(id),
        SubjectId::new(subject).expect("subject"),
        Username::new(name).expect("username"),
    )
}

fn credential() -> BearerCredential {
    BearerCredential::parse(Some("Bearer token")).expect("credential")
}

#[rstest]
#[tokio::test]
async fn find_or_create_delegates_to_repository() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_or_create()
        .withf(|subject, name| subject.as_ref() == "u1" && name.as_ref() == "ada")
        .times(1)
        .returning(|_, _| Ok(user(1, "u1", "ada")));
    let service = UserDirectoryService::new(Arc::new(repo));

    let found = service
        .find_or_create_user(
            &SubjectId::new("u1").expect("subject"),
            &Username::new("ada").expect("username"),
        )
        .await
        .expect("user");
    assert_eq!(found.id(), UserId::new(1));
}

#[rstest]
#[case(UserPersistenceError::connection("refused"))]
#[case(UserPersistenceError::query("syntax"))]
#[tokio::test]
async fn storage_failures_map_to_service_unavailable(#[case] failure: UserPersistenceError) {
    let mut repo = MockUserRepository::new();
    repo.expect_list_excluding()
        .returning(move |_| Err(failure.clone()));
    let service = UserDirectoryService::new(Arc::new(repo));

    let err = service
        .list_other_users(&SubjectId::new("u1").expect("subject"))
        .await
        .expect_err("storage failure");
    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[tokio::test]
async fn authentication_registers_verified_caller() {
    let mut verifier = MockIdentityVerifier::new();
    verifier.expect_verify().times(1).returning(|_| {
        Ok(VerifiedIdentity {
            subject_id: SubjectId::new("u9").expect("subject"),
            username: Username::new("grace").expect("username"),
        })
    });
    let mut directory = MockUserDirectory::new();
    directory
        .expect_find_or_create_user()
        .withf(|subject, name| subject.as_ref() == "u9" && name.as_ref() == "grace")
        .times(1)
        .returning(|_, _| Ok(user(9, "u9", "grace")));
    let service = AuthenticationService::new(Arc::new(verifier), Arc::new(directory));

    let identity = service.authenticate(&credential()).await.expect("identity");
    assert_eq!(identity.subject_id().as_ref(), "u9");
    assert_eq!(identity.username().as_ref(), "grace");
}

#[rstest]
#[case(IdentityVerificationError::rejected("expired"), ErrorCode::Unauthorized)]
#[case(IdentityVerificationError::unavailable("jwks"), ErrorCode::ServiceUnavailable)]
#[tokio::test]
async fn verifier_failures_never_touch_the_directory(
    #[case] failure: IdentityVerificationError,
    #[case] expected: ErrorCode,
) {
    let mut verifier = MockIdentityVerifier::new();
    verifier
        .expect_verify()
        .returning(move |_| Err(failure.clone()));
    let mut directory = MockUserDirectory::new();
    directory.expect_find_or_create_user().never();
    let service = AuthenticationService::new(Arc::new(verifier), Arc::new(directory));

    let err = service
        .authenticate(&credential())
        .await
        .expect_err("rejected");
    assert_eq!(err.code(), expected);
}
