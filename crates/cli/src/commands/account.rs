//! Account commands: sign-up, profile and passwords.
//!
//! # Usage
//!
//! ```bash
//! paws register --username mai --email mai@example.com \
//!     --first-name Mai --last-name Tran --phone 0912345678
//! paws profile show
//! paws profile edit --phone 0999888777
//! paws password change
//! paws password forgot -e mai@example.com
//! paws password reset --token <token from the email>
//! ```
//!
//! Passwords are read from stdin, one per line, unless `PAWS_PASSWORD` is set.

use pawshop_storefront::services::{PasswordChange, PasswordReset, ProfileChanges, Registration};
use pawshop_storefront::{AppError, Storefront};
use secrecy::SecretString;

use super::auth::read_secret;

/// Sign-up details from the command line.
pub struct SignUp {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub password: Option<String>,
}

pub async fn register(storefront: &Storefront, sign_up: SignUp) -> Result<(), AppError> {
    let (password, confirm_password) = new_password(sign_up.password)?;
    let form = Registration {
        username: sign_up.username,
        email: sign_up.email,
        password,
        confirm_password,
        first_name: sign_up.first_name,
        last_name: sign_up.last_name,
        phone_number: sign_up.phone,
    };

    storefront.register(&form).await?;
    println!("Account created. Sign in with `paws login -e {}`.", form.email.trim());
    Ok(())
}

pub async fn show_profile(storefront: &mut Storefront) -> Result<(), AppError> {
    let profile = storefront.profile().await?;
    let field = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());

    println!("Username:   {}", field(&profile.username));
    println!("Email:      {}", field(&profile.email));
    println!("First name: {}", field(&profile.first_name));
    println!("Last name:  {}", field(&profile.last_name));
    println!("Phone:      {}", field(&profile.phone_number));
    if let Some(avatar) = profile.avatar_url.as_deref().filter(|url| !url.is_empty()) {
        println!("Avatar:     {avatar}");
    }
    Ok(())
}

pub async fn edit_profile(
    storefront: &mut Storefront,
    changes: ProfileChanges,
) -> Result<(), AppError> {
    let identity = storefront.update_profile(&changes).await?;
    println!("Profile updated.");
    let name = identity.full_name();
    if !name.is_empty() {
        println!("  Name:  {name}");
    }
    if let Some(phone) = &identity.phone_number {
        println!("  Phone: {phone}");
    }
    Ok(())
}

pub async fn change_password(
    storefront: &mut Storefront,
    current: Option<String>,
) -> Result<(), AppError> {
    let current = match current {
        Some(current) => SecretString::from(current),
        None => read_secret("Current password")?,
    };
    let (new, confirm) = new_password(None)?;

    storefront
        .change_password(&PasswordChange {
            current,
            new,
            confirm,
        })
        .await?;
    println!("Password changed.");
    Ok(())
}

pub async fn forgot_password(storefront: &Storefront, email: &str) -> Result<(), AppError> {
    let email = storefront.forgot_password(email).await?;
    println!("If {email} has an account, a reset token is on its way.");
    println!("Then run `paws password reset --token <token>`.");
    Ok(())
}

pub async fn reset_password(storefront: &Storefront, token: String) -> Result<(), AppError> {
    let (new, confirm) = new_password(None)?;
    storefront
        .reset_password(&PasswordReset {
            token,
            new,
            confirm,
        })
        .await?;
    println!("Password reset. You can sign in with the new password.");
    Ok(())
}

/// A new password and its confirmation, prompting for both unless one was
/// supplied.
fn new_password(given: Option<String>) -> Result<(SecretString, SecretString), AppError> {
    match given {
        Some(password) => Ok((
            SecretString::from(password.clone()),
            SecretString::from(password),
        )),
        None => Ok((
            read_secret("New password")?,
            read_secret("Confirm new password")?,
        )),
    }
}
