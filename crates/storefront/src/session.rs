//! Signed-in identity and bearer token.
//!
//! The session is persisted next to the cart (`token` and `user` keys) and
//! announces its changes on a typed broadcast channel, so interested parts of
//! the front end subscribe instead of polling storage.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tokio::sync::broadcast;

use crate::models::Identity;
use crate::storage::{KeyValueStore, StorageError, TOKEN_KEY, USER_KEY};

/// Buffered events per subscriber before the oldest are dropped.
const EVENT_CAPACITY: usize = 16;

/// Errors that can occur when changing the session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("could not encode user profile: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Sign-in state changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn(Identity),
    /// The signed-in shopper saved profile edits.
    ProfileUpdated(Identity),
    SignedOut,
}

/// The current shopper's identity.
pub struct Session {
    storage: Arc<dyn KeyValueStore>,
    identity: Option<Identity>,
    token: Option<SecretString>,
    events: broadcast::Sender<SessionEvent>,
}

impl Session {
    /// A signed-out session bound to `storage`.
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            storage,
            identity: None,
            token: None,
            events,
        }
    }

    /// Restore a session from storage.
    ///
    /// A malformed profile record is erased and the session starts signed out.
    #[must_use]
    pub fn restore(storage: Arc<dyn KeyValueStore>) -> Self {
        let mut session = Self::new(storage);
        session.token = session
            .read(TOKEN_KEY)
            .filter(|t| !t.trim().is_empty())
            .map(SecretString::from);
        session.identity = session.read(USER_KEY).and_then(|raw| {
            serde_json::from_str::<Identity>(&raw)
                .inspect_err(|e| {
                    tracing::warn!(error = %e, "discarding malformed stored user profile");
                    if let Err(e) = session.storage.remove(USER_KEY) {
                        tracing::warn!(error = %e, "could not erase stored user profile");
                    }
                })
                .ok()
        });
        session
    }

    fn read(&self, key: &str) -> Option<String> {
        self.storage
            .get(key)
            .inspect_err(|e| tracing::warn!(key, error = %e, "could not read session storage"))
            .ok()
            .flatten()
    }

    #[must_use]
    pub const fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    #[must_use]
    pub const fn token(&self) -> Option<&SecretString> {
        self.token.as_ref()
    }

    /// A token is held and the profile has an email.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.identity.is_some()
    }

    /// Persist `identity` and `token` and announce the sign-in.
    ///
    /// The profile is written before the token, and erased again if the token
    /// cannot be written, so storage never holds a token without its profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the profile cannot be encoded or storage fails.
    pub fn sign_in(&mut self, identity: Identity, token: SecretString) -> Result<(), SessionError> {
        let profile = serde_json::to_string(&identity)?;
        self.storage.set(USER_KEY, &profile)?;
        if let Err(e) = self.storage.set(TOKEN_KEY, token.expose_secret()) {
            if let Err(rollback) = self.storage.remove(USER_KEY) {
                tracing::warn!(error = %rollback, "could not roll back stored user profile");
            }
            return Err(e.into());
        }

        tracing::info!(email = %identity.email, "signed in");
        self.identity = Some(identity.clone());
        self.token = Some(token);
        // No subscribers is fine
        let _ = self.events.send(SessionEvent::SignedIn(identity));
        Ok(())
    }

    /// Replace the stored profile of the signed-in shopper, keeping the token.
    ///
    /// Does nothing when signed out.
    ///
    /// # Errors
    ///
    /// Returns an error if the profile cannot be encoded or storage fails; the
    /// in-memory identity is left unchanged then.
    pub fn update_identity(&mut self, identity: Identity) -> Result<(), SessionError> {
        if !self.is_authenticated() {
            return Ok(());
        }
        let profile = serde_json::to_string(&identity)?;
        self.storage.set(USER_KEY, &profile)?;

        tracing::debug!(email = %identity.email, "profile updated");
        self.identity = Some(identity.clone());
        let _ = self.events.send(SessionEvent::ProfileUpdated(identity));
        Ok(())
    }

    /// Forget the identity and token and announce the sign-out.
    ///
    /// In-memory state is cleared even if erasing storage fails.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be updated.
    pub fn sign_out(&mut self) -> Result<(), SessionError> {
        let was_signed_in = self.identity.take().is_some() | self.token.take().is_some();
        let token_result = self.storage.remove(TOKEN_KEY);
        let user_result = self.storage.remove(USER_KEY);

        if was_signed_in {
            tracing::info!("signed out");
            let _ = self.events.send(SessionEvent::SignedOut);
        }
        token_result?;
        user_result?;
        Ok(())
    }

    /// Receive future sign-in/sign-out events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("identity", &self.identity)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish_non_exhaustive()
    }
}
