use axum::{
    debug_handler,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use inkpost_core::authorization::{Action, Principal, ResourceKind};
use inkpost_core::models::UserWriteRequest;
use inkpost_core::representation::{Operation, Scope};
use inkpost_core::validation::WriteMode;
use tracing::info;

use crate::api::access::authorize;
use crate::api::error::AppError;
use crate::api::payload::{accept, declared_errors, parse_id, Payload};
use crate::api::views::{render_user, UserView};
use crate::app_state::SharedAppState;
use crate::services::credentials::hash_password_blocking;
use crate::store::accounts::{NewUser, UserChanges};
use super::field_set;

const KIND: ResourceKind = ResourceKind::User;

fn validate(request: &UserWriteRequest, mode: WriteMode) -> Result<(), AppError> {
    let mut errors = declared_errors(request);
    errors.require_text("username", &request.username, mode);
    // Only a new account must come with a password
    let password_mode = match mode {
        WriteMode::Create => WriteMode::Create,
        _ => WriteMode::Partial,
    };
    errors.require_text("password", &request.password, password_mode);
    errors.into_result()?;
    Ok(())
}

#[utoipa::path(
    get,
    path = "/api/v1/users/",
    responses(
    (status = 200, description = "Every account", body = [UserView]),
    (status = 401, description = "Access token is missing or invalid"),
    (status = 403, description = "Only staff may list accounts"),
    ),
    security(("bearerAuth" = []))
)]
#[debug_handler]
pub async fn list_users_handler(
    State(state): State<SharedAppState>,
    Extension(principal): Extension<Principal>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&principal, Action::List, KIND, None)?;

    let set = field_set(KIND, Operation::List, &principal, Scope::AllResources);
    let tables = state.store.read().await;
    let users = tables
        .users()
        .map(|user| render_user(&tables, user, set, None))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(users))
}

#[utoipa::path(
    post,
    path = "/api/v1/users/",
    request_body = UserWriteRequest,
    responses(
    (status = 201, description = "Account created", body = UserView),
    (status = 400, description = "Invalid payload"),
    (status = 401, description = "Access token is missing or invalid"),
    (status = 403, description = "Only staff may create accounts"),
    ),
    security(("bearerAuth" = []))
)]
#[debug_handler]
pub async fn create_user_handler(
    State(state): State<SharedAppState>,
    Extension(principal): Extension<Principal>,
    payload: Payload<UserWriteRequest>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&principal, Action::Create, KIND, None)?;
    let request = accept(payload)?;
    validate(&request, WriteMode::Create)?;

    let password = request.password.clone().unwrap_or_default();
    let credential =
        hash_password_blocking(password.clone(), state.settings.api.password_hash_cost).await?;

    let mut tables = state.store.write().await;
    let user = tables.insert_user(NewUser {
        username: request.username.unwrap_or_default(),
        first_name: request.first_name.unwrap_or_default(),
        last_name: request.last_name.unwrap_or_default(),
        email: request.email.unwrap_or_default(),
        credential,
        is_staff: false,
    })?;
    info!("{} created account '{}'", principal.display_name(), user.username);

    let set = field_set(KIND, Operation::Create, &principal, Scope::AllResources);
    let view = render_user(&tables, &user, set, Some(&password))?;
    Ok((StatusCode::CREATED, Json(view)))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/",
    params(("id" = i64, Path, description = "Account id")),
    responses(
    (status = 200, description = "The account", body = UserView),
    (status = 401, description = "Access token is missing or invalid"),
    (status = 403, description = "Not your account"),
    (status = 404, description = "No such account"),
    ),
    security(("bearerAuth" = []))
)]
#[debug_handler]
pub async fn retrieve_user_handler(
    State(state): State<SharedAppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&principal, Action::Read, KIND, None)?;
    let id = parse_id(&id)?;

    let tables = state.store.read().await;
    let user = tables.user(id).ok_or(AppError::NotFound)?;
    authorize(&principal, Action::Read, KIND, Some(&user.target()))?;

    let set = field_set(KIND, Operation::Retrieve, &principal, Scope::AllResources);
    Ok(Json(render_user(&tables, user, set, None)?))
}

async fn update_user(
    state: SharedAppState,
    principal: Principal,
    id: String,
    payload: Payload<UserWriteRequest>,
    mode: WriteMode,
) -> Result<Json<UserView>, AppError> {
    authorize(&principal, Action::Update, KIND, None)?;
    let id = parse_id(&id)?;
    {
        let tables = state.store.read().await;
        let user = tables.user(id).ok_or(AppError::NotFound)?;
        authorize(&principal, Action::Update, KIND, Some(&user.target()))?;
    }

    let request = accept(payload)?;
    validate(&request, mode)?;

    let credential = match &request.password {
        Some(password) => Some(
            hash_password_blocking(password.clone(), state.settings.api.password_hash_cost).await?,
        ),
        None => None,
    };

    let mut tables = state.store.write().await;
    let user = tables.update_user(
        id,
        UserChanges {
            username: request.username,
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            credential,
        },
    )?;
    info!("{} updated account '{}'", principal.display_name(), user.username);

    let set = field_set(KIND, Operation::Update, &principal, Scope::AllResources);
    Ok(Json(render_user(&tables, &user, set, request.password.as_deref())?))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/{id}/",
    params(("id" = i64, Path, description = "Account id")),
    request_body = UserWriteRequest,
    responses(
    (status = 200, description = "Account updated", body = UserView),
    (status = 400, description = "Invalid payload"),
    (status = 401, description = "Access token is missing or invalid"),
    (status = 403, description = "Not your account"),
    (status = 404, description = "No such account"),
    ),
    security(("bearerAuth" = []))
)]
#[debug_handler]
pub async fn update_user_handler(
    State(state): State<SharedAppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
    payload: Payload<UserWriteRequest>,
) -> Result<impl IntoResponse, AppError> {
    update_user(state, principal, id, payload, WriteMode::Replace).await
}

#[utoipa::path(
    patch,
    path = "/api/v1/users/{id}/",
    params(("id" = i64, Path, description = "Account id")),
    request_body = UserWriteRequest,
    responses(
    (status = 200, description = "Account updated", body = UserView),
    (status = 400, description = "Invalid payload"),
    (status = 401, description = "Access token is missing or invalid"),
    (status = 403, description = "Not your account"),
    (status = 404, description = "No such account"),
    ),
    security(("bearerAuth" = []))
)]
#[debug_handler]
pub async fn partial_update_user_handler(
    State(state): State<SharedAppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
    payload: Payload<UserWriteRequest>,
) -> Result<impl IntoResponse, AppError> {
    update_user(state, principal, id, payload, WriteMode::Partial).await
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}/",
    params(("id" = i64, Path, description = "Account id")),
    responses(
    (status = 204, description = "Account deactivated"),
    (status = 401, description = "Access token is missing or invalid"),
    (status = 403, description = "Only staff may delete accounts"),
    (status = 404, description = "No such account"),
    ),
    security(("bearerAuth" = []))
)]
#[debug_handler]
pub async fn destroy_user_handler(
    State(state): State<SharedAppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&principal, Action::Delete, KIND, None)?;
    let id = parse_id(&id)?;

    let mut tables = state.store.write().await;
    let target = tables.user(id).ok_or(AppError::NotFound)?.target();
    authorize(&principal, Action::Delete, KIND, Some(&target))?;
    tables.deactivate_user(id)?;
    info!("{} deactivated account {}", principal.display_name(), id);

    Ok(StatusCode::NO_CONTENT)
}
