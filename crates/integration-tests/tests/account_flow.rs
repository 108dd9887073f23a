//! Account flows: sign-up, profile edits and password changes.

#![allow(clippy::unwrap_used)]

use pawshop_integration_tests::{KNOWN_EMAIL, PASSWORD, RESET_TOKEN, StubShop};
use pawshop_storefront::services::{
    AccountError, PasswordChange, PasswordReset, ProfileChanges, Registration,
};
use pawshop_storefront::session::SessionEvent;
use pawshop_storefront::{AppError, Storefront};
use secrecy::SecretString;
use tempfile::TempDir;

async fn open(shop: &StubShop, dir: &TempDir) -> Storefront {
    Storefront::open(shop.config(dir.path()).unwrap()).unwrap()
}

fn registration(email: &str) -> Registration {
    Registration {
        username: " mai ".to_owned(),
        email: email.to_owned(),
        password: SecretString::from(PASSWORD),
        confirm_password: SecretString::from(PASSWORD),
        first_name: "Mai".to_owned(),
        last_name: " Tran".to_owned(),
        phone_number: "0912345678".to_owned(),
    }
}

#[tokio::test]
async fn test_register_then_sign_in() {
    let shop = StubShop::start().await.unwrap();
    let dir = tempfile::tempdir().unwrap();
    let mut storefront = open(&shop, &dir).await;

    storefront
        .register(&registration("mai@example.com"))
        .await
        .unwrap();
    {
        let data = shop.data().await;
        let body = &data.registrations[0];
        assert_eq!(body["username"], "mai");
        assert_eq!(body["lastName"], "Tran");
        assert_eq!(body["password"], PASSWORD);
    }
    // Registering does not sign in
    assert!(!storefront.session().is_authenticated());

    storefront.login("mai@example.com", PASSWORD).await.unwrap();
    assert!(storefront.session().is_authenticated());
}

#[tokio::test]
async fn test_register_taken_email_shows_server_message() {
    let shop = StubShop::start().await.unwrap();
    let dir = tempfile::tempdir().unwrap();
    let storefront = open(&shop, &dir).await;

    let err = storefront
        .register(&registration(KNOWN_EMAIL))
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "Email đã tồn tại");
    assert!(shop.data().await.registrations.is_empty());
}

#[tokio::test]
async fn test_register_mismatched_confirmation_is_not_sent() {
    let shop = StubShop::start().await.unwrap();
    let dir = tempfile::tempdir().unwrap();
    let storefront = open(&shop, &dir).await;

    let form = Registration {
        confirm_password: SecretString::from("something-else"),
        ..registration("mai@example.com")
    };
    let err = storefront.register(&form).await.unwrap_err();
    assert!(matches!(err, AppError::Account(AccountError::PasswordMismatch)));
    assert!(shop.data().await.registrations.is_empty());
}

#[tokio::test]
async fn test_profile_edit_refreshes_stored_identity() {
    let shop = StubShop::start().await.unwrap();
    let dir = tempfile::tempdir().unwrap();
    let mut storefront = open(&shop, &dir).await;
    storefront.login(KNOWN_EMAIL, PASSWORD).await.unwrap();
    let mut events = storefront.session().subscribe();

    let profile = storefront.profile().await.unwrap();
    assert_eq!(profile.id, "u-1");
    assert_eq!(profile.username.as_deref(), Some("an"));

    let changes = ProfileChanges {
        last_name: Some("Le".to_owned()),
        phone_number: Some("0999888777".to_owned()),
        ..ProfileChanges::default()
    };
    let identity = storefront.update_profile(&changes).await.unwrap();
    assert_eq!(identity.full_name(), "An Le");

    {
        let data = shop.data().await;
        let body = &data.profile_edits[0];
        assert_eq!(body["Id"], "u-1");
        assert_eq!(body["FirstName"], "An");
        assert_eq!(body["LastName"], "Le");
        assert_eq!(body["AvatarUrl"], "");
    }
    assert!(matches!(
        events.try_recv().unwrap(),
        SessionEvent::ProfileUpdated(updated) if updated.phone_number.as_deref() == Some("0999888777")
    ));

    // The edit survives a restart without signing in again
    let reopened = open(&shop, &dir).await;
    assert!(reopened.session().is_authenticated());
    assert_eq!(reopened.session().identity().unwrap().full_name(), "An Le");
}

#[tokio::test]
async fn test_profile_with_revoked_token_signs_out() {
    let shop = StubShop::start().await.unwrap();
    let dir = tempfile::tempdir().unwrap();
    let mut storefront = open(&shop, &dir).await;
    storefront.login(KNOWN_EMAIL, PASSWORD).await.unwrap();
    shop.data().await.token_revoked = true;

    let err = storefront.profile().await.unwrap_err();
    assert!(err.is_unauthorized());
    assert!(!storefront.session().is_authenticated());
}

#[tokio::test]
async fn test_change_password() {
    let shop = StubShop::start().await.unwrap();
    let dir = tempfile::tempdir().unwrap();
    let mut storefront = open(&shop, &dir).await;
    storefront.login(KNOWN_EMAIL, PASSWORD).await.unwrap();

    let wrong = PasswordChange {
        current: SecretString::from("not-it"),
        new: SecretString::from("gau-gau-456"),
        confirm: SecretString::from("gau-gau-456"),
    };
    let err = storefront.change_password(&wrong).await.unwrap_err();
    assert_eq!(err.user_message(), "Mật khẩu hiện tại không đúng");
    // A wrong password is not an expired session
    assert!(storefront.session().is_authenticated());

    let change = PasswordChange {
        current: SecretString::from(PASSWORD),
        ..wrong
    };
    storefront.change_password(&change).await.unwrap();
    let data = shop.data().await;
    assert_eq!(data.password_changes.len(), 1);
    assert_eq!(data.password_changes[0]["NewPassword"], "gau-gau-456");
    assert_eq!(data.password_changes[0]["ConfirmNewPassword"], "gau-gau-456");
}

#[tokio::test]
async fn test_forgot_and_reset_password() {
    let shop = StubShop::start().await.unwrap();
    let dir = tempfile::tempdir().unwrap();
    let storefront = open(&shop, &dir).await;

    let email = storefront.forgot_password("  an@example.com ").await.unwrap();
    assert_eq!(email.as_str(), KNOWN_EMAIL);
    assert_eq!(shop.data().await.reset_requests, vec![KNOWN_EMAIL]);

    let expired = PasswordReset {
        token: "old-token".to_owned(),
        new: SecretString::from("gau-gau-456"),
        confirm: SecretString::from("gau-gau-456"),
    };
    let err = storefront.reset_password(&expired).await.unwrap_err();
    assert_eq!(err.user_message(), "Token không hợp lệ hoặc đã hết hạn");

    let reset = PasswordReset {
        token: format!(" {RESET_TOKEN} "),
        ..expired
    };
    storefront.reset_password(&reset).await.unwrap();
    assert_eq!(shop.data().await.password_resets, vec!["gau-gau-456"]);
}
