use axum::{
    debug_handler,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use inkpost_core::authorization::{Action, Authored, Principal, ResourceKind};
use inkpost_core::models::LikeWriteRequest;
use inkpost_core::representation::{Operation, Scope};
use inkpost_core::validation::{FieldErrors, WriteMode};
use tracing::info;

use crate::api::access::authorize;
use crate::api::error::AppError;
use crate::api::payload::{accept, parse_id, Payload};
use crate::api::views::{feedback::LikeView, render_all, Render};
use crate::app_state::SharedAppState;
use super::field_set;

const KIND: ResourceKind = ResourceKind::Like;

fn validate(request: &LikeWriteRequest, mode: WriteMode) -> Result<(), AppError> {
    let mut errors = FieldErrors::new();
    errors.require("blog", &request.blog, mode);
    errors.into_result()?;
    Ok(())
}

/// Serves both `/like/` and `/like/author/`
#[utoipa::path(
    get,
    path = "/api/v1/like/",
    responses(
    (status = 200, description = "Every like", body = [LikeView]),
    (status = 401, description = "Access token is missing or invalid"),
    ),
    security(("bearerAuth" = []))
)]
#[debug_handler]
pub async fn list_likes_handler(
    State(state): State<SharedAppState>,
    Extension(principal): Extension<Principal>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&principal, Action::List, KIND, None)?;

    let set = field_set(KIND, Operation::List, &principal, Scope::AllResources);
    let tables = state.store.read().await;
    Ok(Json(render_all(tables.likes(), &tables, set)?))
}

#[utoipa::path(
    post,
    path = "/api/v1/like/",
    request_body = LikeWriteRequest,
    responses(
    (status = 201, description = "Like created", body = LikeView),
    (status = 400, description = "Invalid payload"),
    (status = 401, description = "Access token is missing or invalid"),
    ),
    security(("bearerAuth" = []))
)]
#[debug_handler]
pub async fn create_like_handler(
    State(state): State<SharedAppState>,
    Extension(principal): Extension<Principal>,
    payload: Payload<LikeWriteRequest>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&principal, Action::Create, KIND, None)?;
    let author = principal.id().ok_or(AppError::Unauthenticated)?;
    let request = accept(payload)?;
    validate(&request, WriteMode::Create)?;

    let mut tables = state.store.write().await;
    let like = tables.insert_like(author, request.blog.unwrap_or_default())?;
    info!("{} liked blog {}", principal.display_name(), like.blog);

    let set = field_set(KIND, Operation::Create, &principal, Scope::AllResources);
    Ok((StatusCode::CREATED, Json(like.render(&tables, set)?)))
}

#[utoipa::path(
    get,
    path = "/api/v1/like/{id}/",
    params(("id" = i64, Path, description = "Like id")),
    responses(
    (status = 200, description = "The like", body = LikeView),
    (status = 401, description = "Access token is missing or invalid"),
    (status = 404, description = "No such like"),
    ),
    security(("bearerAuth" = []))
)]
#[debug_handler]
pub async fn retrieve_like_handler(
    State(state): State<SharedAppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&principal, Action::Read, KIND, None)?;
    let id = parse_id(&id)?;

    let tables = state.store.read().await;
    let like = tables.like(id).ok_or(AppError::NotFound)?;
    authorize(&principal, Action::Read, KIND, Some(&like.target()))?;

    let set = field_set(KIND, Operation::Retrieve, &principal, Scope::AllResources);
    Ok(Json(like.render(&tables, set)?))
}

async fn update_like(
    state: SharedAppState,
    principal: Principal,
    id: String,
    payload: Payload<LikeWriteRequest>,
    mode: WriteMode,
) -> Result<Json<LikeView>, AppError> {
    authorize(&principal, Action::Update, KIND, None)?;
    let id = parse_id(&id)?;

    let mut tables = state.store.write().await;
    let target = tables.like(id).ok_or(AppError::NotFound)?.target();
    authorize(&principal, Action::Update, KIND, Some(&target))?;
    let request = accept(payload)?;
    validate(&request, mode)?;

    let like = tables.update_like(id, request.blog)?;
    info!("{} updated like {}", principal.display_name(), id);

    let set = field_set(KIND, Operation::Update, &principal, Scope::AllResources);
    Ok(Json(like.render(&tables, set)?))
}

#[utoipa::path(
    put,
    path = "/api/v1/like/{id}/",
    params(("id" = i64, Path, description = "Like id")),
    request_body = LikeWriteRequest,
    responses(
    (status = 200, description = "Like updated", body = LikeView),
    (status = 400, description = "Invalid payload"),
    (status = 401, description = "Access token is missing or invalid"),
    (status = 403, description = "Not your like"),
    (status = 404, description = "No such like"),
    ),
    security(("bearerAuth" = []))
)]
#[debug_handler]
pub async fn update_like_handler(
    State(state): State<SharedAppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
    payload: Payload<LikeWriteRequest>,
) -> Result<impl IntoResponse, AppError> {
    update_like(state, principal, id, payload, WriteMode::Replace).await
}

#[utoipa::path(
    patch,
    path = "/api/v1/like/{id}/",
    params(("id" = i64, Path, description = "Like id")),
    request_body = LikeWriteRequest,
    responses(
    (status = 200, description = "Like updated", body = LikeView),
    (status = 400, description = "Invalid payload"),
    (status = 401, description = "Access token is missing or invalid"),
    (status = 403, description = "Not your like"),
    (status = 404, description = "No such like"),
    ),
    security(("bearerAuth" = []))
)]
#[debug_handler]
pub async fn partial_update_like_handler(
    State(state): State<SharedAppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
    payload: Payload<LikeWriteRequest>,
) -> Result<impl IntoResponse, AppError> {
    update_like(state, principal, id, payload, WriteMode::Partial).await
}

#[utoipa::path(
    delete,
    path = "/api/v1/like/{id}/",
    params(("id" = i64, Path, description = "Like id")),
    responses(
    (status = 204, description = "Like deleted"),
    (status = 401, description = "Access token is missing or invalid"),
    (status = 403, description = "Not your like"),
    (status = 404, description = "No such like"),
    ),
    security(("bearerAuth" = []))
)]
#[debug_handler]
pub async fn destroy_like_handler(
    State(state): State<SharedAppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&principal, Action::Delete, KIND, None)?;
    let id = parse_id(&id)?;

    let mut tables = state.store.write().await;
    let target = tables.like(id).ok_or(AppError::NotFound)?.target();
    authorize(&principal, Action::Delete, KIND, Some(&target))?;
    tables.delete_like(id)?;
    info!("{} deleted like {}", principal.display_name(), id);

    Ok(StatusCode::NO_CONTENT)
}
