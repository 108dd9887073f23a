//! Email address type.
//!
//! The backend keys accounts and order history by email, so it travels as a
//! checked newtype instead of a bare string.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Why a string is not an [`Email`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    #[error("email cannot be empty")]
    Empty,
    /// Anything other than exactly one `@` between a non-empty account and a
    /// dotted host, or embedded whitespace.
    #[error("'{0}' is not an email address")]
    Malformed(String),
}

/// An email address, trimmed the way the login form trims its input.
///
/// ```
/// use pawshop_core::Email;
///
/// assert_eq!(Email::parse(" an@example.com ").unwrap().as_str(), "an@example.com");
/// assert!(Email::parse("an@localhost").is_err());
/// assert!(Email::parse("an@@example.com").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Parse an address after trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`EmailError::Empty`] for blank input and
    /// [`EmailError::Malformed`] otherwise.
    pub fn parse(s: &str) -> Result<Self, EmailError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(EmailError::Empty);
        }

        let well_formed = !s.contains(char::is_whitespace)
            && s.split_once('@').is_some_and(|(account, host)| {
                !account.is_empty()
                    && !host.contains('@')
                    && host
                        .split_once('.')
                        .is_some_and(|(name, tld)| !name.is_empty() && !tld.is_empty())
            });

        if well_formed {
            Ok(Self(s.to_owned()))
        } else {
            Err(EmailError::Malformed(s.to_owned()))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Email {
    type Error = EmailError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_shop_accounts() {
        for input in ["an@example.com", "an+pets@example.com", "mai.tran@shop.com.vn"] {
            assert_eq!(Email::parse(input).unwrap().as_str(), input);
        }
    }

    #[test]
    fn test_trims_login_input() {
        assert_eq!(
            Email::parse("\tan@example.com  ").unwrap().as_str(),
            "an@example.com"
        );
        assert_eq!(Email::parse("   "), Err(EmailError::Empty));
    }

    #[test]
    fn test_rejects_malformed() {
        for input in ["no-at", "@example.com", "an@", "an@localhost", "a n@example.com", "an@x@y.com"] {
            assert!(
                matches!(Email::parse(input), Err(EmailError::Malformed(_))),
                "{input} should be rejected"
            );
        }
    }

    #[test]
    fn test_deserialize_validates() {
        let email: Email = serde_json::from_str("\"an@example.com\"").unwrap();
        assert_eq!(email.as_str(), "an@example.com");
        assert!(serde_json::from_str::<Email>("\"nope\"").is_err());
    }
}
