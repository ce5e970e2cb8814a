use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The authenticated identity as returned by the auth endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
}

/// An active auth session. Exists only while the backend considers the
/// tokens valid; losing it empties the stores and returns to sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub user: AuthUser,
}

/// Lifecycle of the session at the UI level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Restoring a stored session at startup.
    Loading,
    SignedOut,
    SignedIn(Session),
}

impl SessionState {
    pub fn session(&self) -> Option<&Session> {
        match self {
            Self::SignedIn(session) => Some(session),
            _ => None,
        }
    }

    pub fn user(&self) -> Option<&AuthUser> {
        self.session().map(|s| &s.user)
    }
}
