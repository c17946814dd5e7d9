use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::{
    response::{IntoResponse, Response},
    Json,
};
use inkpost_core::authorization::AccessDenied;
use inkpost_core::moderation::DenylistViolation;
use inkpost_core::pagination::InvalidPage;
use inkpost_core::validation::FieldErrors;
use thiserror::Error;

use crate::services::credentials::CredentialError;
use crate::store::StoreError;

pub const NON_FIELD_ERRORS: &str = "non_field_errors";

#[derive(Clone, Error, Debug, utoipa::ToResponse, utoipa::ToSchema)]
pub enum AppError {
    #[error("Authentication credentials were not provided.")]
    Unauthenticated,

    #[error("{0}")]
    InvalidToken(String),

    #[error("You do not have permission to perform this action.")]
    Forbidden,

    #[error("Invalid input.")]
    ValidationFailed(FieldErrors),

    #[error("Not found.")]
    NotFound,

    #[error("Invalid page.")]
    InvalidPage,

    #[error("Internal server error: {0}")]
    InternalServerError(String),
}

impl AppError {
    fn get_error_msg(&self) -> (StatusCode, String) {
        let status = match self {
            AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppError::InvalidToken(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::ValidationFailed(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::InvalidPage => StatusCode::NOT_FOUND,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, self.to_string())
    }

    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        AppError::ValidationFailed(FieldErrors::single(field, message))
    }
}

impl From<anyhow::Error> for AppError {
    fn from(e: anyhow::Error) -> Self {
        if let Some(app_error) = e.downcast_ref::<AppError>() {
            return app_error.clone();
        }
        AppError::InternalServerError(e.to_string())
    }
}

impl From<AccessDenied> for AppError {
    fn from(reason: AccessDenied) -> Self {
        match reason {
            AccessDenied::Unauthenticated => AppError::Unauthenticated,
            AccessDenied::Forbidden => AppError::Forbidden,
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound => AppError::NotFound,
            StoreError::Invalid(errors) => AppError::ValidationFailed(errors),
        }
    }
}

impl From<FieldErrors> for AppError {
    fn from(errors: FieldErrors) -> Self {
        AppError::ValidationFailed(errors)
    }
}

impl From<InvalidPage> for AppError {
    fn from(_: InvalidPage) -> Self {
        AppError::InvalidPage
    }
}

impl From<DenylistViolation> for AppError {
    fn from(violation: DenylistViolation) -> Self {
        AppError::invalid_field("text", violation.to_string())
    }
}

impl From<CredentialError> for AppError {
    fn from(e: CredentialError) -> Self {
        AppError::InternalServerError(e.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::invalid_field(
            NON_FIELD_ERRORS,
            format!("JSON parse error - {}", rejection.body_text()),
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.get_error_msg();
        let body = match &self {
            AppError::ValidationFailed(fields) => {
                serde_json::json!({ "error": true, "message": message, "fields": fields })
            }
            _ => serde_json::json!({ "error": true, "message": message }),
        };
        if status.is_server_error() {
            tracing::error!("{}", message);
        }
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_of(error: AppError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_access_denied_keeps_reasons_apart() {
        let (status, body) = body_of(AccessDenied::Unauthenticated.into()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Authentication credentials were not provided.");

        let (status, body) = body_of(AccessDenied::Forbidden.into()).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], true);
    }

    #[tokio::test]
    async fn test_validation_errors_carry_fields() {
        let error = AppError::invalid_field("title", "This field is required.");
        let (status, body) = body_of(error).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["fields"]["title"][0], "This field is required.");
    }

    #[tokio::test]
    async fn test_store_errors_map_to_status() {
        let (status, _) = body_of(StoreError::NotFound.into()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, body) = body_of(InvalidPage.into()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Invalid page.");
    }
}
