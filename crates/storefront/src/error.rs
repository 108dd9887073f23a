//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type for front-end actions. Unexpected
//! failures are captured to Sentry by [`AppError::report`]; every variant has
//! a message suitable for showing to the shopper.

use thiserror::Error;

use crate::api::ApiError;
use crate::config::ConfigError;
use crate::services::{AccountError, BookingError, CheckoutError};
use crate::session::SessionError;
use crate::storage::StorageError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Local storage operation failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Pet shop API call failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Checkout was refused.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// An account form was refused before sending.
    #[error("Account error: {0}")]
    Account(#[from] AccountError),

    /// A grooming booking was refused before sending.
    #[error("Booking error: {0}")]
    Booking(#[from] BookingError),

    /// Session could not be changed.
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The action needs a signed-in shopper.
    #[error("Sign-in required")]
    SignInRequired,

    /// Bad input from the shopper.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// The bearer token was rejected and the session should be dropped.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        match self {
            Self::Api(ApiError::Unauthorized) => true,
            Self::Checkout(err) => err.is_unauthorized(),
            _ => false,
        }
    }

    /// Message for the shopper.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(err) => match err {
                ApiError::Unauthorized => {
                    "Your session has expired, please sign in again".to_string()
                }
                ApiError::NotFound(what) => format!("Could not find {what}"),
                ApiError::Api {
                    message: Some(message),
                    ..
                } => message.clone(),
                ApiError::Http(_) => "Could not reach the shop, please try again".to_string(),
                _ => "Something went wrong, please try again".to_string(),
            },
            Self::Checkout(err) => err.to_string(),
            Self::Account(err) => err.to_string(),
            Self::Booking(err) => err.to_string(),
            Self::Storage(_) | Self::Session(_) => {
                "Could not save your data on this device".to_string()
            }
            Self::Config(err) => err.to_string(),
            Self::SignInRequired => "Please sign in first".to_string(),
            Self::BadRequest(message) => message.clone(),
        }
    }

    /// Log the error, capturing unexpected failures to Sentry.
    pub fn report(&self) {
        let unexpected = match self {
            Self::Storage(_) | Self::Session(_) => true,
            Self::Api(err) => matches!(err, ApiError::Parse(_) | ApiError::Url(_))
                || matches!(err, ApiError::Api { status, .. } if *status >= 500),
            _ => false,
        };

        if unexpected {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Action failed"
            );
        } else {
            tracing::warn!(error = %self, "Action failed");
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context for the signed-in shopper.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(email: &impl ToString, username: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            email: Some(email.to_string()),
            username: username.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for shopper actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added product", Some(&[("product_id", "123")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
