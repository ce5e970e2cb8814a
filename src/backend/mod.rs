pub mod auth;
pub mod changes;
pub mod client;
pub mod keyring;

pub use auth::AuthClient;
pub use changes::{diff_rows, Keyed};
pub use client::BackendClient;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("{0}")]
    Auth(String),

    #[error("backend returned an empty result")]
    Empty,

    #[error("keyring error: {0}")]
    Keyring(String),
}

impl BackendError {
    /// Drain a failed response into an Api error with its body text.
    pub(crate) async fn from_response(resp: reqwest::Response) -> Self {
        let status = resp.status().as_u16();
        let message = resp.text().await.unwrap_or_default();
        Self::Api { status, message }
    }
}
