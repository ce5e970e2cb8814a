use std::collections::HashMap;

use super::BackendError;

pub(crate) const SERVICE_NAME: &str = "waypoint-session";

fn keyring_err(e: impl std::fmt::Display) -> BackendError {
    BackendError::Keyring(e.to_string())
}

/// Store the refresh token in the system keyring via Secret Service, keyed
/// by account email.
pub async fn store_session(email: &str, refresh_token: &str) -> Result<(), BackendError> {
    let keyring = oo7::Keyring::new().await.map_err(keyring_err)?;

    let mut attrs = HashMap::new();
    attrs.insert("service", SERVICE_NAME);

    let secret = format!("{}:{}", email, refresh_token);

    keyring
        .create_item(
            &format!("Waypoint session ({})", email),
            &attrs,
            secret.as_bytes(),
            true, // replace existing
        )
        .await
        .map_err(keyring_err)?;

    Ok(())
}

/// Load the stored session, if any. Returns (email, refresh_token).
pub async fn load_session() -> Result<Option<(String, String)>, BackendError> {
    let keyring = oo7::Keyring::new().await.map_err(keyring_err)?;

    let mut attrs = HashMap::new();
    attrs.insert("service", SERVICE_NAME);

    let items = keyring.search_items(&attrs).await.map_err(keyring_err)?;

    if let Some(item) = items.first() {
        let secret_bytes = item.secret().await.map_err(keyring_err)?;
        let secret = String::from_utf8(secret_bytes.to_vec()).map_err(keyring_err)?;
        if let Some((email, refresh_token)) = secret.split_once(':') {
            return Ok(Some((email.to_string(), refresh_token.to_string())));
        }
    }

    Ok(None)
}

/// Forget the stored session on sign-out.
pub async fn delete_session() -> Result<(), BackendError> {
    let keyring = oo7::Keyring::new().await.map_err(keyring_err)?;

    let mut attrs = HashMap::new();
    attrs.insert("service", SERVICE_NAME);

    let items = keyring.search_items(&attrs).await.map_err(keyring_err)?;

    for item in items {
        item.delete().await.map_err(keyring_err)?;
    }

    Ok(())
}
