//! User API: the four calls the client makes against the backend.
//!
//! DESIGN
//! ======
//! `AuthApi` is the seam between decision logic (gate, actions) and the
//! network. `HttpAuthApi` is the reqwest implementation; tests substitute
//! a recording mock.

pub mod http;
pub mod types;

pub use http::HttpAuthApi;
pub use types::{ApiError, Credentials, Registration, TokenGrant, UserProfile, Verdict};

/// Provider-neutral async trait for the user API. Enables mocking in tests.
#[async_trait::async_trait]
pub trait AuthApi: Send + Sync {
    /// `POST /users/authenticate`: exchange credentials for a session token.
    async fn authenticate(&self, credentials: &Credentials) -> Result<Verdict<TokenGrant>, ApiError>;

    /// `POST /users`: check a token and fetch the owner's profile.
    async fn validate(&self, token: &str) -> Result<Verdict<UserProfile>, ApiError>;

    /// `POST /users/expire`: invalidate a token server-side.
    async fn expire(&self, token: &str) -> Result<Verdict<()>, ApiError>;

    /// `POST /users/register`: create an account.
    async fn register(&self, registration: &Registration) -> Result<Verdict<()>, ApiError>;
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
pub mod test_helpers {
    use std::sync::Mutex;

    use super::*;

    /// How the mock backend answers every call.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Reply {
        Accept,
        Reject,
        Fail,
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Call {
        Authenticate { username: String },
        Validate(String),
        Expire(String),
        Register { username: String, age: u32 },
    }

    /// Recording `AuthApi` with a fixed reply.
    pub struct MockApi {
        reply: Reply,
        pub token: String,
        pub profile: UserProfile,
        calls: Mutex<Vec<Call>>,
    }

    impl MockApi {
        pub fn new(reply: Reply) -> Self {
            Self {
                reply,
                token: "xyz".into(),
                profile: UserProfile { username: "u".into(), fullname: None, age: None },
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn answer<T>(&self, call: Call, payload: T) -> Result<Verdict<T>, ApiError> {
            self.calls.lock().unwrap().push(call);
            match self.reply {
                Reply::Accept => Ok(Verdict::Accepted(payload)),
                Reply::Reject => Ok(Verdict::Rejected),
                Reply::Fail => Err(ApiError::Request("connection refused".into())),
            }
        }
    }

    #[async_trait::async_trait]
    impl AuthApi for MockApi {
        async fn authenticate(&self, credentials: &Credentials) -> Result<Verdict<TokenGrant>, ApiError> {
            let grant = TokenGrant { token: self.token.clone() };
            self.answer(Call::Authenticate { username: credentials.username.clone() }, grant)
        }

        async fn validate(&self, token: &str) -> Result<Verdict<UserProfile>, ApiError> {
            self.answer(Call::Validate(token.to_owned()), self.profile.clone())
        }

        async fn expire(&self, token: &str) -> Result<Verdict<()>, ApiError> {
            self.answer(Call::Expire(token.to_owned()), ())
        }

        async fn register(&self, registration: &Registration) -> Result<Verdict<()>, ApiError> {
            let call = Call::Register { username: registration.username.clone(), age: registration.age };
            self.answer(call, ())
        }
    }
}
