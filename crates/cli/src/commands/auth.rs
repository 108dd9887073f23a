//! Session commands.
//!
//! # Usage
//!
//! ```bash
//! paws login -e an@example.com
//! paws whoami
//! paws logout
//! ```

use std::io::BufRead;

use pawshop_storefront::{AppError, Storefront};
use secrecy::{ExposeSecret, SecretString};

pub async fn login(
    storefront: &mut Storefront,
    email: &str,
    password: Option<String>,
) -> Result<(), AppError> {
    let password = match password {
        Some(password) => SecretString::from(password),
        None => read_secret("Password")?,
    };

    let identity = storefront.login(email, password.expose_secret()).await?;
    let name = identity.full_name();
    if name.is_empty() {
        println!("Signed in as {}.", identity.email);
    } else {
        println!("Welcome back, {name}!");
    }
    Ok(())
}

pub fn logout(storefront: &mut Storefront) -> Result<(), AppError> {
    let was_signed_in = storefront.session().is_authenticated();
    storefront.logout()?;
    if was_signed_in {
        println!("Signed out.");
    } else {
        println!("You are not signed in.");
    }
    Ok(())
}

pub fn whoami(storefront: &Storefront) {
    match storefront.session().identity() {
        Some(identity) if storefront.session().is_authenticated() => {
            println!("{}", identity.email);
            let name = identity.full_name();
            if !name.is_empty() {
                println!("  Name: {name}");
            }
            if let Some(role) = &identity.role {
                println!("  Role: {role}");
            }
        }
        _ => println!("Not signed in."),
    }
}

/// Read one line from stdin after printing `prompt` to stderr.
pub fn read_secret(prompt: &str) -> Result<SecretString, AppError> {
    eprint!("{prompt}: ");
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|e| AppError::BadRequest(format!("could not read {prompt}: {e}")))?;
    let secret = line.trim_end_matches(['\r', '\n']).to_string();
    if secret.is_empty() {
        return Err(AppError::BadRequest(format!("{prompt} is required")));
    }
    Ok(SecretString::from(secret))
}
