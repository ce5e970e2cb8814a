use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::json;

use super::BackendError;
use crate::core::session::{AuthUser, Session};

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    user: AuthUser,
}

/// Sign-up may or may not open a session, depending on whether the backend
/// requires email confirmation.
#[derive(Deserialize)]
struct SignUpResponse {
    access_token: Option<String>,
    refresh_token: Option<String>,
    user: Option<AuthUser>,
}

/// Client for the auth endpoints. Unlike [`BackendClient`] it carries no
/// access token; it is what produces one.
///
/// [`BackendClient`]: super::BackendClient
#[derive(Clone)]
pub struct AuthClient {
    base_url: String,
    http: Client,
}

impl AuthClient {
    pub fn new(base_url: &str, anon_key: &str) -> Result<Self, BackendError> {
        let mut headers = HeaderMap::new();
        if let Ok(key) = HeaderValue::from_str(anon_key) {
            headers.insert("apikey", key);
        }
        let http = Client::builder().default_headers(headers).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, BackendError> {
        let resp = self
            .http
            .post(format!(
                "{}/auth/v1/token?grant_type=password",
                self.base_url
            ))
            .header(CONTENT_TYPE, "application/json")
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        let token: TokenResponse = check_auth(resp).await?.json().await?;
        Ok(session_from(token))
    }

    /// Returns the session when the backend auto-confirms; None means a
    /// confirmation email was sent first.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<Session>, BackendError> {
        let resp = self
            .http
            .post(format!("{}/auth/v1/signup", self.base_url))
            .header(CONTENT_TYPE, "application/json")
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        let body: SignUpResponse = check_auth(resp).await?.json().await?;
        match (body.access_token, body.refresh_token, body.user) {
            (Some(access_token), Some(refresh_token), Some(user)) => Ok(Some(Session {
                access_token,
                refresh_token,
                user,
            })),
            _ => Ok(None),
        }
    }

    /// Exchange a stored refresh token for a fresh session at startup.
    pub async fn refresh(&self, refresh_token: &str) -> Result<Session, BackendError> {
        let resp = self
            .http
            .post(format!(
                "{}/auth/v1/token?grant_type=refresh_token",
                self.base_url
            ))
            .header(CONTENT_TYPE, "application/json")
            .json(&json!({ "refresh_token": refresh_token }))
            .send()
            .await?;
        let token: TokenResponse = check_auth(resp).await?.json().await?;
        Ok(session_from(token))
    }

    /// Revoke the session server-side. Local state is cleared regardless of
    /// whether this succeeds.
    pub async fn sign_out(&self, access_token: &str) -> Result<(), BackendError> {
        let resp = self
            .http
            .post(format!("{}/auth/v1/logout", self.base_url))
            .header(AUTHORIZATION, format!("Bearer {access_token}"))
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(BackendError::from_response(resp).await);
        }
        Ok(())
    }
}

fn session_from(token: TokenResponse) -> Session {
    Session {
        access_token: token.access_token,
        refresh_token: token.refresh_token,
        user: token.user,
    }
}

/// Turn a failed auth response into a message fit for the sign-in form. The
/// endpoint reports errors as JSON under varying keys.
async fn check_auth(resp: Response) -> Result<Response, BackendError> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status().as_u16();
    let text = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&text)
        .ok()
        .and_then(|v| {
            ["error_description", "msg", "message"]
                .iter()
                .find_map(|k| v.get(k).and_then(|m| m.as_str()).map(String::from))
        })
        .unwrap_or_else(|| format!("authentication failed (status {status})"));
    Err(BackendError::Auth(message))
}
