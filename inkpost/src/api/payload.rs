//! Request bodies are parsed after access control ran, so a caller who may
//! not perform an action learns nothing about the shape of its payload.

use axum::extract::rejection::JsonRejection;
use axum::Json;
use inkpost_core::validation::FieldErrors;
use validator::Validate;

use crate::api::error::AppError;

pub type Payload<T> = Result<Json<T>, JsonRejection>;

pub fn accept<T>(payload: Payload<T>) -> Result<T, AppError> {
    let Json(request) = payload?;
    Ok(request)
}

/// Field rules declared on the request type, as field errors
pub fn declared_errors<T: Validate>(request: &T) -> FieldErrors {
    match request.validate() {
        Ok(()) => FieldErrors::new(),
        Err(errors) => errors.into(),
    }
}

/// Parse a path id. Ids that are not numbers cannot exist.
pub fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.parse().map_err(|_| AppError::NotFound)
}
