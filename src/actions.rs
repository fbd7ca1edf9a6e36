//! Login, registration, and logout.
//!
//! Each action validates locally, makes at most one request, and maps the
//! backend's `status` flag to a [`Notice`]. `Ok(None)` means the request
//! failed in transport: the failure is logged and nothing is shown.

use std::sync::Arc;

use crate::api::{AuthApi, Verdict};
use crate::forms::{LoginForm, RegistrationForm};
use crate::store::{SessionStore, StoreError};
use crate::ui::{Notice, Page};

pub const LOGIN_SUCCESS: &str = "Login successful.";
pub const LOGIN_FAILURE: &str = "Login failed. Please try again.";
pub const REGISTER_SUCCESS: &str = "User successfully registered!";
pub const REGISTER_FAILURE: &str = "User already exists!";
pub const LOGOUT_SUCCESS: &str = "Successfully logged out!";
pub const LOGOUT_FAILURE: &str = "Already logged out!";

#[derive(Clone)]
pub struct AuthActions {
    api: Arc<dyn AuthApi>,
    store: Arc<dyn SessionStore>,
}

impl AuthActions {
    pub fn new(api: Arc<dyn AuthApi>, store: Arc<dyn SessionStore>) -> Self {
        Self { api, store }
    }

    /// Authenticate and persist the returned token.
    ///
    /// # Errors
    ///
    /// Returns an error only if the token cannot be stored.
    pub async fn login(&self, form: &LoginForm) -> Result<Option<Notice>, StoreError> {
        let credentials = match form.validate() {
            Ok(credentials) => credentials,
            Err(e) => return Ok(Some(Notice::invalid(e.to_string()))),
        };

        match self.api.authenticate(&credentials).await {
            Ok(Verdict::Accepted(grant)) => {
                self.store.set(&grant.token)?;
                tracing::info!(username = %credentials.username, "logged in");
                Ok(Some(Notice::success(LOGIN_SUCCESS, Some(Page::UserHome))))
            }
            Ok(Verdict::Rejected) => Ok(Some(Notice::failure(LOGIN_FAILURE))),
            Err(e) => {
                tracing::warn!(error = %e, "login request failed");
                Ok(None)
            }
        }
    }

    /// Create an account. Registration does not log the user in.
    ///
    /// # Errors
    ///
    /// Never fails today; the signature matches the other actions.
    pub async fn register(&self, form: &RegistrationForm) -> Result<Option<Notice>, StoreError> {
        let registration = match form.validate() {
            Ok(registration) => registration,
            Err(e) => return Ok(Some(Notice::invalid(e.to_string()))),
        };

        match self.api.register(&registration).await {
            Ok(Verdict::Accepted(())) => {
                tracing::info!(username = %registration.username, "registered");
                Ok(Some(Notice::success(REGISTER_SUCCESS, None)))
            }
            Ok(Verdict::Rejected) => Ok(Some(Notice::failure(REGISTER_FAILURE))),
            Err(e) => {
                tracing::warn!(error = %e, "registration request failed");
                Ok(None)
            }
        }
    }

    /// Drop the local token, then expire it server-side.
    ///
    /// The local token is cleared before the request, so even a failed
    /// request leaves the client logged out.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or cleared.
    pub async fn logout(&self) -> Result<Option<Notice>, StoreError> {
        let Some(token) = self.store.get()? else {
            return Ok(Some(Notice::failure(LOGOUT_FAILURE)));
        };
        self.store.clear()?;

        match self.api.expire(&token).await {
            Ok(Verdict::Accepted(())) => Ok(Some(Notice::success(LOGOUT_SUCCESS, Some(Page::Index)))),
            Ok(Verdict::Rejected) => Ok(Some(Notice::failure(LOGOUT_FAILURE))),
            Err(e) => {
                tracing::warn!(error = %e, "logout request failed");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
#[path = "actions_test.rs"]
mod tests;
