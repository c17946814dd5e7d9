use anyhow::Context;
use inkpost_core::authorization::UserId;
use tracing::info;

use crate::services::credentials::hash_password_blocking;
use crate::settings::config::Settings;
use crate::store::{accounts::NewUser, Store};

/// Create the configured staff account unless it already exists.
///
/// Returns the id of the account, or `None` when no admin is configured.
pub async fn ensure_admin(store: &Store, settings: &Settings) -> anyhow::Result<Option<UserId>> {
    let Some((username, password)) = settings.bootstrap.admin_credentials() else {
        info!("No bootstrap admin configured");
        return Ok(None);
    };

    if let Some(existing) = store.read().await.user_by_username(username) {
        info!("Bootstrap admin '{}' already exists", username);
        return Ok(Some(existing.id));
    }

    let credential = hash_password_blocking(
        password.expose_secret().to_string(),
        settings.api.password_hash_cost,
    )
    .await
    .context("Failed to hash the bootstrap admin password")?;

    let admin = store
        .write()
        .await
        .insert_user(NewUser {
            username: username.to_string(),
            first_name: String::new(),
            last_name: String::new(),
            email: settings.bootstrap.admin_email.clone().unwrap_or_default(),
            credential,
            is_staff: true,
        })
        .map_err(|e| anyhow::anyhow!("Failed to create bootstrap admin '{}': {}", username, e))?;

    info!("Created bootstrap admin '{}' with id {}", admin.username, admin.id);
    Ok(Some(admin.id))
}
