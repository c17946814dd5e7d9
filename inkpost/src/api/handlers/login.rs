use axum::{debug_handler, extract::State, response::IntoResponse, Json};
use chrono::Utc;
use inkpost_core::models::LoginRequest;
use inkpost_core::validation::{FieldErrors, WriteMode};
use serde::Serialize;
use tracing::{info, warn};

use crate::api::error::{AppError, NON_FIELD_ERRORS};
use crate::api::payload::{accept, Payload};
use crate::app_state::SharedAppState;
use crate::services::credentials::{generate_token, verify_password_blocking};

pub const BAD_CREDENTIALS: &str = "Unable to log in with provided credentials.";

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct TokenResponse {
    pub token: String,
}

#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
    (status = 200, description = "Token for the account", body = TokenResponse),
    (status = 400, description = "Missing fields or wrong credentials"),
    )
)]
#[debug_handler]
pub async fn login_handler(
    State(state): State<SharedAppState>,
    payload: Payload<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let request = accept(payload)?;

    let mut errors = FieldErrors::new();
    errors.require_text("username", &request.username, WriteMode::Create);
    errors.require_text("password", &request.password, WriteMode::Create);
    errors.into_result()?;
    let (Some(username), Some(password)) = (request.username, request.password) else {
        return Err(AppError::invalid_field(NON_FIELD_ERRORS, BAD_CREDENTIALS));
    };

    let account = state
        .store
        .read()
        .await
        .user_by_username(&username)
        .filter(|user| user.is_active())
        .map(|user| (user.id, user.credential.clone()));

    let verified = match account {
        Some((id, credential)) => verify_password_blocking(password, credential)
            .await
            .then_some(id),
        None => None,
    };
    let Some(user_id) = verified else {
        warn!("Failed login for '{}'", username);
        return Err(AppError::invalid_field(NON_FIELD_ERRORS, BAD_CREDENTIALS));
    };

    let mut tables = state.store.write().await;
    tables.record_login(user_id, Utc::now());
    let token = match tables.token_of(user_id) {
        Some(token) => token.to_string(),
        None => {
            let token = generate_token();
            tables.issue_token(user_id, token.clone());
            token
        }
    };
    info!("User '{}' logged in", username);

    Ok(Json(TokenResponse { token }))
}
