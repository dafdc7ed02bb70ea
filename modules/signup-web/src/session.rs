use crate::page::ViewMode;

/// Browser-session state of one page: public until an admin login succeeds,
/// then admin until the page is reloaded. There is no logout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    admin: bool,
    token: Option<String>,
}

impl Session {
    pub fn public() -> Self {
        Self::default()
    }

    /// An already-authenticated session. `token` is what the login call
    /// returned, if anything.
    pub fn admin(token: Option<String>) -> Self {
        Self { admin: true, token }
    }

    pub fn is_admin(&self) -> bool {
        self.admin
    }

    /// Bearer token for admin calls.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// The list view that matches this session.
    pub fn view_mode(&self) -> ViewMode {
        if self.admin {
            ViewMode::Admin
        } else {
            ViewMode::Public
        }
    }

    pub(crate) fn promote(&mut self, token: Option<String>) {
        self.admin = true;
        self.token = token;
    }
}
