//! Client for a token-based users API: login, registration, logout, and a
//! session gate deciding whether a page may be shown.

pub mod actions;
pub mod api;
pub mod config;
pub mod forms;
pub mod gate;
pub mod store;
pub mod ui;

pub use actions::AuthActions;
pub use api::{AuthApi, HttpAuthApi};
pub use config::ClientConfig;
pub use gate::{SessionGate, SessionState};
pub use store::{FileStore, MemoryStore, SessionStore};
pub use ui::{Notice, Page};

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
