//! Wire types for the user API and the errors its client produces.
//!
//! Every response is wrapped in an envelope `{status, result?}` where
//! `status == false` is a business-level rejection, not an error.

use std::fmt;

use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced while talking to the backend.
///
/// All variants are transport-class failures: callers never see a
/// `status == false` reply as an error.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// The request never produced a response (connect, timeout, I/O).
    #[error("request failed: {0}")]
    Request(String),

    /// The backend answered with a non-success HTTP status.
    #[error("unexpected HTTP status {status}")]
    Status { status: u16, body: String },

    /// The response body was not a valid envelope.
    #[error("response decode failed: {0}")]
    Decode(String),

    /// `status` was true but the payload the action needs was absent.
    #[error("response for {endpoint} is missing its result")]
    MissingResult { endpoint: &'static str },
}

// =============================================================================
// REQUESTS
// =============================================================================

/// `POST /users/authenticate` body.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// `POST /users/register` body. `age` goes over the wire as a JSON number.
#[derive(Clone, Serialize)]
pub struct Registration {
    pub username: String,
    pub password: String,
    pub fullname: String,
    pub age: u32,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("fullname", &self.fullname)
            .field("age", &self.age)
            .finish()
    }
}

/// Body shared by `POST /users` and `POST /users/expire`.
#[derive(Serialize)]
pub(crate) struct TokenBody<'a> {
    pub token: &'a str,
}

// =============================================================================
// RESPONSES
// =============================================================================

/// `result` of a successful authenticate call.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenGrant {
    pub token: String,
}

/// `result` of a successful token validation. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserProfile {
    pub username: String,
    #[serde(default)]
    pub fullname: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
}

/// Outcome of a call the backend understood.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict<T> {
    /// `status == true`, with the payload the call yields.
    Accepted(T),
    /// `status == false`.
    Rejected,
}

impl<T> Verdict<T> {
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub status: bool,
    pub result: Option<T>,
}

impl<T> Envelope<T> {
    /// Map the envelope to a verdict, requiring `result` when accepted.
    pub fn into_verdict(self, endpoint: &'static str) -> Result<Verdict<T>, ApiError> {
        if !self.status {
            return Ok(Verdict::Rejected);
        }
        self.result
            .map(Verdict::Accepted)
            .ok_or(ApiError::MissingResult { endpoint })
    }
}

impl Envelope<IgnoredAny> {
    /// Map a status-only envelope; any `result` is ignored.
    pub fn into_status(self) -> Verdict<()> {
        if self.status { Verdict::Accepted(()) } else { Verdict::Rejected }
    }
}

/// Decode an envelope from a raw response body.
pub(crate) fn parse_envelope<T: DeserializeOwned>(body: &str) -> Result<Envelope<T>, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
