use axum::{
    extract::{Request, State},
    http,
    middleware::Next,
    response::Response,
};
use inkpost_core::authorization::Principal;
use tracing::{debug, warn};

use crate::api::error::AppError;
use crate::app_state::SharedAppState;
use crate::services::credentials::tokens_match;

const TOKEN_SCHEMES: [&str; 2] = ["bearer", "token"];

/// Token carried by an `Authorization` header.
///
/// `Ok(None)` for headers of other schemes, which leave the caller anonymous.
fn parse_authorization(header: &str) -> Result<Option<&str>, AppError> {
    let mut parts = header.split_whitespace();
    let scheme = match parts.next() {
        Some(scheme) => scheme,
        None => return Ok(None),
    };
    if !TOKEN_SCHEMES.contains(&scheme.to_lowercase().as_str()) {
        return Ok(None);
    }
    match (parts.next(), parts.next()) {
        (Some(token), None) => Ok(Some(token)),
        (None, _) => Err(AppError::InvalidToken(
            "Invalid token header. No credentials provided.".to_string(),
        )),
        (Some(_), Some(_)) => Err(AppError::InvalidToken(
            "Invalid token header. Token string should not contain spaces.".to_string(),
        )),
    }
}

async fn authenticate(state: &SharedAppState, token: &str) -> Result<Principal, AppError> {
    let tables = state.store.read().await;

    let configured_admin = state
        .settings
        .bootstrap
        .admin_token
        .as_ref()
        .filter(|configured| {
            !configured.is_empty() && tokens_match(token, configured.expose_secret())
        })
        .and_then(|_| state.settings.bootstrap.admin_username.as_deref())
        .and_then(|username| tables.user_by_username(username));

    let user = match configured_admin.or_else(|| tables.user_for_token(token)) {
        Some(user) => user,
        None => {
            warn!(
                "Token authentication failed (token starts with: {}...)",
                token.chars().take(6).collect::<String>()
            );
            return Err(AppError::InvalidToken("Invalid token.".to_string()));
        }
    };

    if !user.is_active() {
        warn!("Rejected token of deactivated account '{}'", user.username);
        return Err(AppError::InvalidToken(
            "User inactive or deleted.".to_string(),
        ));
    }

    Ok(user.principal())
}

/// Resolve the caller of every request into a [`Principal`] extension.
///
/// A request without credentials continues as [`Principal::Anonymous`], the
/// access control evaluator decides what that caller may do. Credentials that
/// do not check out end the request with 401.
pub async fn resolve_principal(
    State(state): State<SharedAppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok());

    let token = auth_header
        .map(parse_authorization)
        .transpose()?
        .flatten()
        .map(str::to_owned);
    let principal = match token {
        Some(token) => authenticate(&state, &token).await?,
        None => Principal::Anonymous,
    };

    debug!(
        "{} {} as {}",
        req.method(),
        req.uri().path(),
        principal.display_name()
    );
    req.extensions_mut().insert(principal);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_authorization_schemes() {
        assert_eq!(parse_authorization("Bearer abc").unwrap(), Some("abc"));
        assert_eq!(parse_authorization("Token abc").unwrap(), Some("abc"));
        assert_eq!(parse_authorization("token abc").unwrap(), Some("abc"));
        assert_eq!(parse_authorization("Basic dXNlcjpwdw==").unwrap(), None);
        assert_eq!(parse_authorization("").unwrap(), None);
        assert!(parse_authorization("Bearer").is_err());
        assert!(parse_authorization("Bearer a b").is_err());
    }
}
