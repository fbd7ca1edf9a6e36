//! Session gate: decides whether the stored token matches what a page needs.
//!
//! DESIGN
//! ======
//! `evaluate` resolves the stored token to a [`SessionState`]; at most one
//! validation request is made, and none when no token is stored. The
//! caller states the login state it requires and
//! [`SessionState::is_mismatch`] says whether its mismatch action runs.
//!
//! The page guards compare against [`SessionState::logged_in`] instead: a
//! token the backend just rejected is treated exactly like no token.
//!
//! ERROR HANDLING
//! ==============
//! Transport failures during validation are logged and resolve to
//! `Indeterminate`: no mismatch, stored token untouched. Store failures are
//! local and propagate to the caller.

use std::sync::Arc;

use crate::api::{AuthApi, UserProfile, Verdict};
use crate::store::{SessionStore, StoreError};
use crate::ui::{Notice, Page};

pub const LOGIN_REQUIRED_MESSAGE: &str = "Please login to view this page";
pub const ALREADY_LOGGED_IN_MESSAGE: &str = "You are already logged in";

/// Resolved authentication state of the stored token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// The backend accepted the token.
    Authenticated(UserProfile),
    /// No usable token. `invalidated` is set when the backend rejected a
    /// stored token and it was just cleared.
    Anonymous { invalidated: bool },
    /// Validation did not complete; nothing is known or changed.
    Indeterminate,
}

impl SessionState {
    /// Whether a page requiring `desired_logged_in` must run its mismatch
    /// action.
    ///
    /// A token the backend just rejected counts as a mismatch for pages
    /// requiring anonymity, not for pages requiring login.
    #[must_use]
    pub fn is_mismatch(&self, desired_logged_in: bool) -> bool {
        match self {
            Self::Authenticated(_) | Self::Anonymous { invalidated: true } => !desired_logged_in,
            Self::Anonymous { invalidated: false } => desired_logged_in,
            Self::Indeterminate => false,
        }
    }

    /// Effective login state, `None` when validation did not complete.
    #[must_use]
    pub fn logged_in(&self) -> Option<bool> {
        match self {
            Self::Authenticated(_) => Some(true),
            Self::Anonymous { .. } => Some(false),
            Self::Indeterminate => None,
        }
    }

    #[must_use]
    pub fn profile(&self) -> Option<&UserProfile> {
        match self {
            Self::Authenticated(profile) => Some(profile),
            _ => None,
        }
    }
}

#[derive(Clone)]
pub struct SessionGate {
    api: Arc<dyn AuthApi>,
    store: Arc<dyn SessionStore>,
}

impl SessionGate {
    pub fn new(api: Arc<dyn AuthApi>, store: Arc<dyn SessionStore>) -> Self {
        Self { api, store }
    }

    /// Resolve the stored token against the backend.
    ///
    /// # Errors
    ///
    /// Returns an error only if the session store fails.
    pub async fn evaluate(&self) -> Result<SessionState, StoreError> {
        let Some(token) = self.store.get()? else {
            return Ok(SessionState::Anonymous { invalidated: false });
        };

        match self.api.validate(&token).await {
            Ok(Verdict::Accepted(profile)) => Ok(SessionState::Authenticated(profile)),
            Ok(Verdict::Rejected) => {
                tracing::info!("stored session token rejected; clearing");
                self.store.clear()?;
                Ok(SessionState::Anonymous { invalidated: true })
            }
            Err(e) => {
                tracing::warn!(error = %e, "session validation failed");
                Ok(SessionState::Indeterminate)
            }
        }
    }

    /// Resolve the session and run `on_mismatch` if it disagrees with
    /// `desired_logged_in`. Returns the resolved state either way.
    ///
    /// # Errors
    ///
    /// Returns an error only if the session store fails.
    pub async fn check_session<F>(&self, desired_logged_in: bool, on_mismatch: F) -> Result<SessionState, StoreError>
    where
        F: FnOnce(),
    {
        let state = self.evaluate().await?;
        if state.is_mismatch(desired_logged_in) {
            on_mismatch();
        }
        Ok(state)
    }

    /// Guard for pages that need a logged-in user.
    ///
    /// # Errors
    ///
    /// Returns an error only if the session store fails.
    pub async fn require_login(&self) -> Result<Option<Notice>, StoreError> {
        self.guard(true, LOGIN_REQUIRED_MESSAGE, Page::Index).await
    }

    /// Guard for pages that must not be shown to a logged-in user.
    ///
    /// # Errors
    ///
    /// Returns an error only if the session store fails.
    pub async fn require_anonymous(&self) -> Result<Option<Notice>, StoreError> {
        self.guard(false, ALREADY_LOGGED_IN_MESSAGE, Page::PrivateEntries)
            .await
    }

    async fn guard(&self, desired_logged_in: bool, message: &str, page: Page) -> Result<Option<Notice>, StoreError> {
        let state = self.evaluate().await?;
        match state.logged_in() {
            Some(actual) if actual != desired_logged_in => Ok(Some(Notice::redirect(message, page))),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
#[path = "gate_test.rs"]
mod tests;
