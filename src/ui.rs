//! User-facing results: alert text plus an optional page to navigate to.

use std::fmt;

/// Navigation targets of the web front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    /// Login page.
    Index,
    /// Landing page after a successful login.
    UserHome,
    /// Where already-authenticated visitors of anonymous-only pages go.
    PrivateEntries,
}

impl Page {
    #[must_use]
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Index => "index.html",
            Self::UserHome => "userhome.html",
            Self::PrivateEntries => "private_entries.html",
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    /// The backend answered `status == false`.
    Failure,
    /// Local validation blocked the request.
    Invalid,
    /// A page guard fired.
    Redirect,
}

/// What the user sees after an action: an alert and maybe a redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    pub redirect: Option<Page>,
}

impl Notice {
    pub fn success(message: impl Into<String>, redirect: Option<Page>) -> Self {
        Self { kind: NoticeKind::Success, message: message.into(), redirect }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Failure, message: message.into(), redirect: None }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Invalid, message: message.into(), redirect: None }
    }

    pub fn redirect(message: impl Into<String>, page: Page) -> Self {
        Self { kind: NoticeKind::Redirect, message: message.into(), redirect: Some(page) }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.kind == NoticeKind::Success
    }
}
