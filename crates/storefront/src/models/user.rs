//! Signed-in user identity, the login exchange and the account request bodies.
//!
//! The profile edit and password change bodies use the backend's PascalCase
//! field names; everything else is camelCase.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use pawshop_core::Email;

/// Profile of the signed-in user, as persisted under the `user` storage key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub email: Email,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
}

impl Identity {
    /// `"First Last"`, trimmed; empty when neither part is known.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or(""),
            self.last_name.as_deref().unwrap_or("")
        )
        .trim()
        .to_owned()
    }
}

/// Body of `POST /Authenticate/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Successful login response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub email: Email,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
}

impl LoginResponse {
    /// Split into the profile to persist and the bearer token.
    #[must_use]
    pub fn into_parts(self) -> (Identity, SecretString) {
        let identity = Identity {
            email: self.email,
            username: self.username,
            role: self.role,
            first_name: self.first_name,
            last_name: self.last_name,
            phone_number: self.phone_number,
        };
        (identity, SecretString::from(self.token))
    }
}

/// Body of `POST /Authenticate/register`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest<'a> {
    pub username: &'a str,
    pub email: Email,
    pub password: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub phone_number: &'a str,
}

/// `GET /Authenticate/info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Account id assigned by the backend's identity store.
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, alias = "userName")]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// Body of `POST /Authenticate/edit-info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProfileUpdate {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub avatar_url: String,
}

impl Identity {
    /// Copy the editable fields of a saved profile edit onto the stored identity.
    pub fn apply(&mut self, update: &ProfileUpdate) {
        self.first_name = Some(update.first_name.clone());
        self.last_name = Some(update.last_name.clone());
        self.phone_number = Some(update.phone_number.clone());
    }
}

/// Body of `POST /Authenticate/change-password`.
#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ChangePasswordRequest<'a> {
    pub current_password: &'a str,
    pub new_password: &'a str,
    pub confirm_new_password: &'a str,
}

/// Body of `POST /Authenticate/forgot-password`.
#[derive(Debug, Clone, Serialize)]
pub struct ForgotPasswordRequest<'a> {
    pub email: &'a str,
}

/// Body of `POST /Authenticate/reset-password`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest<'a> {
    pub token: &'a str,
    pub new_password: &'a str,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn test_full_name() {
        let mut identity: Identity =
            serde_json::from_str(r#"{"email": "an@example.com", "firstName": "An"}"#).unwrap();
        assert_eq!(identity.full_name(), "An");
        identity.last_name = Some("Nguyen".to_owned());
        assert_eq!(identity.full_name(), "An Nguyen");
        identity.first_name = None;
        identity.last_name = None;
        assert_eq!(identity.full_name(), "");
    }

    #[test]
    fn test_login_response_into_parts() {
        let response: LoginResponse = serde_json::from_str(
            r#"{"token": "jwt", "email": "an@example.com", "username": "an", "role": "User"}"#,
        )
        .unwrap();
        let (identity, token) = response.into_parts();
        assert_eq!(identity.email.as_str(), "an@example.com");
        assert_eq!(identity.role.as_deref(), Some("User"));
        assert_eq!(token.expose_secret(), "jwt");
    }

    #[test]
    fn test_account_bodies_use_backend_casing() {
        let update = ProfileUpdate {
            id: "u-1".to_owned(),
            first_name: "An".to_owned(),
            last_name: "Nguyen".to_owned(),
            phone_number: "0901".to_owned(),
            avatar_url: String::new(),
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json["Id"], "u-1");
        assert_eq!(json["PhoneNumber"], "0901");

        let change = ChangePasswordRequest {
            current_password: "old",
            new_password: "new-secret",
            confirm_new_password: "new-secret",
        };
        let json = serde_json::to_value(&change).unwrap();
        assert_eq!(json["ConfirmNewPassword"], "new-secret");

        let reset = ResetPasswordRequest {
            token: "t",
            new_password: "new-secret",
        };
        assert_eq!(serde_json::to_value(&reset).unwrap()["newPassword"], "new-secret");
    }

    #[test]
    fn test_identity_takes_saved_profile_fields() {
        let mut identity: Identity =
            serde_json::from_str(r#"{"email": "an@example.com", "username": "an"}"#).unwrap();
        identity.apply(&ProfileUpdate {
            id: "u-1".to_owned(),
            first_name: "An".to_owned(),
            last_name: "Tran".to_owned(),
            phone_number: "0902".to_owned(),
            avatar_url: "a.png".to_owned(),
        });
        assert_eq!(identity.full_name(), "An Tran");
        assert_eq!(identity.phone_number.as_deref(), Some("0902"));
        assert_eq!(identity.username.as_deref(), Some("an"));
    }

    #[test]
    fn test_profile_tolerates_sparse_info() {
        let profile: Profile =
            serde_json::from_str(r#"{"id": "u-1", "userName": "an", "avatarUrl": null}"#).unwrap();
        assert_eq!(profile.username.as_deref(), Some("an"));
        assert_eq!(profile.avatar_url, None);
    }
}
