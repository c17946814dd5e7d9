//! Password hashing and API tokens

use inkpost_core::models::Credential;
use rand::{distributions::Alphanumeric, Rng};
use subtle::ConstantTimeEq;
use thiserror::Error;
use tracing::warn;

pub const TOKEN_LENGTH: usize = 40;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("Failed to hash password: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("Password hashing task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub fn hash_password(password: &str, cost: u32) -> Result<Credential, CredentialError> {
    let hashed = bcrypt::hash(password, cost)?;
    Ok(Credential::Hashed(hashed))
}

/// bcrypt is slow on purpose, keep it off the async workers.
pub async fn hash_password_blocking(
    password: String,
    cost: u32,
) -> Result<Credential, CredentialError> {
    tokio::task::spawn_blocking(move || hash_password(&password, cost)).await?
}

pub fn verify_password(password: &str, credential: &Credential) -> bool {
    match credential {
        Credential::Hashed(hashed) => match bcrypt::verify(password, hashed) {
            Ok(valid) => valid,
            Err(e) => {
                warn!("Stored password hash could not be verified: {}", e);
                false
            }
        },
        Credential::Unusable => false,
    }
}

pub async fn verify_password_blocking(password: String, credential: Credential) -> bool {
    tokio::task::spawn_blocking(move || verify_password(&password, &credential))
        .await
        .unwrap_or(false)
}

pub fn generate_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect::<String>()
        .to_lowercase()
}

/// Constant time comparison against a configured token
pub fn tokens_match(presented: &str, configured: &str) -> bool {
    presented.as_bytes().ct_eq(configured.as_bytes()).into()
}
