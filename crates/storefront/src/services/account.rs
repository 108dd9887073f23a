//! Account forms: registration, password changes and profile edits.
//!
//! Each form is checked here before anything is sent, so obviously bad input
//! never costs a round trip.

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use pawshop_core::Email;

use crate::models::{
    ChangePasswordRequest, Profile, ProfileUpdate, RegisterRequest, ResetPasswordRequest,
};

/// Shortest password accepted when changing or resetting one.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Why an account form was not sent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccountError {
    #[error("Please enter your {0}")]
    MissingField(&'static str),

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("The password confirmation does not match")]
    PasswordMismatch,

    #[error("The new password must be at least {MIN_PASSWORD_LEN} characters")]
    PasswordTooShort,

    #[error("Please enter the reset token from your email")]
    MissingResetToken,

    #[error("Nothing to change")]
    NoChanges,
}

/// The sign-up form.
#[derive(Debug)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: SecretString,
    pub confirm_password: SecretString,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
}

impl Registration {
    /// The request body, with every field but the password trimmed.
    ///
    /// # Errors
    ///
    /// Returns an [`AccountError`] for a blank field, a malformed email or a
    /// confirmation that does not match.
    pub fn request(&self) -> Result<RegisterRequest<'_>, AccountError> {
        let username = required("username", &self.username)?;
        let email = parse_email(&self.email)?;
        let first_name = required("first name", &self.first_name)?;
        let last_name = required("last name", &self.last_name)?;
        let phone_number = required("phone number", &self.phone_number)?;

        let password = self.password.expose_secret();
        if password.is_empty() {
            return Err(AccountError::MissingField("password"));
        }
        if password != self.confirm_password.expose_secret() {
            return Err(AccountError::PasswordMismatch);
        }

        Ok(RegisterRequest {
            username,
            email,
            password,
            first_name,
            last_name,
            phone_number,
        })
    }
}

/// The change-password form of a signed-in shopper.
#[derive(Debug)]
pub struct PasswordChange {
    pub current: SecretString,
    pub new: SecretString,
    pub confirm: SecretString,
}

impl PasswordChange {
    /// # Errors
    ///
    /// Returns an [`AccountError`] if the current password is blank or the new
    /// one is unconfirmed or too short.
    pub fn request(&self) -> Result<ChangePasswordRequest<'_>, AccountError> {
        let current_password = self.current.expose_secret();
        if current_password.is_empty() {
            return Err(AccountError::MissingField("current password"));
        }
        let new_password = new_password(&self.new, &self.confirm)?;
        Ok(ChangePasswordRequest {
            current_password,
            new_password,
            confirm_new_password: self.confirm.expose_secret(),
        })
    }
}

/// The reset-password form, filled with the token from the reset email.
#[derive(Debug)]
pub struct PasswordReset {
    pub token: String,
    pub new: SecretString,
    pub confirm: SecretString,
}

impl PasswordReset {
    /// # Errors
    ///
    /// Returns an [`AccountError`] if the token is blank or the new password is
    /// unconfirmed or too short.
    pub fn request(&self) -> Result<ResetPasswordRequest<'_>, AccountError> {
        let token = self.token.trim();
        if token.is_empty() {
            return Err(AccountError::MissingResetToken);
        }
        let new_password = new_password(&self.new, &self.confirm)?;
        Ok(ResetPasswordRequest {
            token,
            new_password,
        })
    }
}

/// Profile fields to change; `None` keeps the saved value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub avatar_url: Option<String>,
}

impl ProfileChanges {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.phone_number.is_none()
            && self.avatar_url.is_none()
    }

    /// The full edit body: these changes over the saved `profile`.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::NoChanges`] if nothing was given.
    pub fn update_for(&self, profile: &Profile) -> Result<ProfileUpdate, AccountError> {
        if self.is_empty() {
            return Err(AccountError::NoChanges);
        }
        let merge = |change: &Option<String>, saved: &Option<String>| {
            change
                .as_deref()
                .or(saved.as_deref())
                .unwrap_or_default()
                .trim()
                .to_owned()
        };
        Ok(ProfileUpdate {
            id: profile.id.clone(),
            first_name: merge(&self.first_name, &profile.first_name),
            last_name: merge(&self.last_name, &profile.last_name),
            phone_number: merge(&self.phone_number, &profile.phone_number),
            avatar_url: merge(&self.avatar_url, &profile.avatar_url),
        })
    }
}

/// A typed-in account email.
///
/// # Errors
///
/// Returns an [`AccountError`] for blank or malformed input.
pub fn parse_email(input: &str) -> Result<Email, AccountError> {
    if input.trim().is_empty() {
        return Err(AccountError::MissingField("email"));
    }
    Email::parse(input).map_err(|_| AccountError::InvalidEmail)
}

fn required<'a>(label: &'static str, value: &'a str) -> Result<&'a str, AccountError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AccountError::MissingField(label));
    }
    Ok(value)
}

fn new_password<'a>(
    new: &'a SecretString,
    confirm: &SecretString,
) -> Result<&'a str, AccountError> {
    let new = new.expose_secret();
    if new != confirm.expose_secret() {
        return Err(AccountError::PasswordMismatch);
    }
    if new.chars().count() < MIN_PASSWORD_LEN {
        return Err(AccountError::PasswordTooShort);
    }
    Ok(new)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn secret(s: &str) -> SecretString {
        SecretString::from(s.to_owned())
    }

    fn registration() -> Registration {
        Registration {
            username: " an ".to_owned(),
            email: "an@example.com".to_owned(),
            password: secret(" pass "),
            confirm_password: secret(" pass "),
            first_name: "An".to_owned(),
            last_name: "Nguyen".to_owned(),
            phone_number: "0901234567".to_owned(),
        }
    }

    #[test]
    fn test_registration_trims_all_but_password() {
        let form = registration();
        let request = form.request().unwrap();
        assert_eq!(request.username, "an");
        assert_eq!(request.password, " pass ");

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["phoneNumber"], "0901234567");
        assert_eq!(json["email"], "an@example.com");
    }

    #[test]
    fn test_registration_rejections() {
        let mut form = registration();
        form.confirm_password = secret("other");
        assert_eq!(form.request().err(), Some(AccountError::PasswordMismatch));

        let mut form = registration();
        form.last_name = "  ".to_owned();
        assert_eq!(form.request().err(), Some(AccountError::MissingField("last name")));

        let mut form = registration();
        form.email = "an@localhost".to_owned();
        assert_eq!(form.request().err(), Some(AccountError::InvalidEmail));
    }

    #[test]
    fn test_new_password_rules() {
        let change = PasswordChange {
            current: secret("old-pass"),
            new: secret("abc12"),
            confirm: secret("abc12"),
        };
        assert_eq!(change.request().err(), Some(AccountError::PasswordTooShort));

        // A mismatch is reported before the length
        let change = PasswordChange {
            current: secret("old-pass"),
            new: secret("abc"),
            confirm: secret("abd"),
        };
        assert_eq!(change.request().err(), Some(AccountError::PasswordMismatch));

        let change = PasswordChange {
            current: secret(""),
            new: secret("abcdef"),
            confirm: secret("abcdef"),
        };
        assert_eq!(
            change.request().err(),
            Some(AccountError::MissingField("current password"))
        );
    }

    #[test]
    fn test_reset_needs_a_token() {
        let reset = PasswordReset {
            token: "   ".to_owned(),
            new: secret("abcdef"),
            confirm: secret("abcdef"),
        };
        assert_eq!(reset.request().err(), Some(AccountError::MissingResetToken));

        let reset = PasswordReset {
            token: " tok-1 ".to_owned(),
            ..reset
        };
        assert_eq!(reset.request().unwrap().token, "tok-1");
    }

    #[test]
    fn test_profile_changes_keep_saved_values() {
        let profile: Profile = serde_json::from_str(
            r#"{"id": "u-1", "firstName": "An", "lastName": "Nguyen", "phoneNumber": "0901"}"#,
        )
        .unwrap();

        assert_eq!(
            ProfileChanges::default().update_for(&profile),
            Err(AccountError::NoChanges)
        );

        let changes = ProfileChanges {
            phone_number: Some(" 0999 ".to_owned()),
            ..ProfileChanges::default()
        };
        let update = changes.update_for(&profile).unwrap();
        assert_eq!(update.id, "u-1");
        assert_eq!(update.first_name, "An");
        assert_eq!(update.phone_number, "0999");
        assert_eq!(update.avatar_url, "");
    }

    #[test]
    fn test_parse_email() {
        assert_eq!(parse_email(" "), Err(AccountError::MissingField("email")));
        assert_eq!(parse_email("nope"), Err(AccountError::InvalidEmail));
        assert!(parse_email("an@example.com").is_ok());
    }
}
