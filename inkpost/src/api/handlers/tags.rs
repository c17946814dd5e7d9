use axum::{
    debug_handler,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use inkpost_core::authorization::{Action, Principal, ResourceKind, Target};
use inkpost_core::models::TagWriteRequest;
use inkpost_core::representation::{Operation, Scope};
use inkpost_core::validation::WriteMode;
use tracing::info;

use crate::api::access::authorize;
use crate::api::error::AppError;
use crate::api::payload::{accept, declared_errors, parse_id, Payload};
use crate::api::views::{render_all, tags::TagView, Render};
use crate::app_state::SharedAppState;
use crate::store::tags::TagChanges;
use super::field_set;

const KIND: ResourceKind = ResourceKind::Tag;

fn validate(request: &TagWriteRequest, mode: WriteMode) -> Result<(), AppError> {
    let mut errors = declared_errors(request);
    errors.require_text("name", &request.name, mode);
    errors.require("blogs", &request.blogs, mode);
    errors.require("comments", &request.comments, mode);
    errors.into_result()?;
    Ok(())
}

#[utoipa::path(
    get,
    path = "/api/v1/tag/",
    responses(
    (status = 200, description = "Every tag", body = [TagView]),
    (status = 401, description = "Access token is missing or invalid"),
    (status = 403, description = "Only staff may manage tags"),
    ),
    security(("bearerAuth" = []))
)]
#[debug_handler]
pub async fn list_tags_handler(
    State(state): State<SharedAppState>,
    Extension(principal): Extension<Principal>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&principal, Action::List, KIND, None)?;

    let set = field_set(KIND, Operation::List, &principal, Scope::AllResources);
    let tables = state.store.read().await;
    Ok(Json(render_all(tables.tags(), &tables, set)?))
}

#[utoipa::path(
    post,
    path = "/api/v1/tag/",
    request_body = TagWriteRequest,
    responses(
    (status = 201, description = "Tag created", body = TagView),
    (status = 400, description = "Invalid payload"),
    (status = 401, description = "Access token is missing or invalid"),
    (status = 403, description = "Only staff may manage tags"),
    ),
    security(("bearerAuth" = []))
)]
#[debug_handler]
pub async fn create_tag_handler(
    State(state): State<SharedAppState>,
    Extension(principal): Extension<Principal>,
    payload: Payload<TagWriteRequest>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&principal, Action::Create, KIND, None)?;
    let request = accept(payload)?;
    validate(&request, WriteMode::Create)?;

    let mut tables = state.store.write().await;
    let tag = tables.insert_tag(
        request.name.unwrap_or_default(),
        request.blogs.unwrap_or_default(),
        request.comments.unwrap_or_default(),
    )?;
    info!("{} created tag '{}'", principal.display_name(), tag.name);

    let set = field_set(KIND, Operation::Create, &principal, Scope::AllResources);
    Ok((StatusCode::CREATED, Json(tag.render(&tables, set)?)))
}

#[utoipa::path(
    get,
    path = "/api/v1/tag/{id}/",
    params(("id" = i64, Path, description = "Tag id")),
    responses(
    (status = 200, description = "The tag", body = TagView),
    (status = 401, description = "Access token is missing or invalid"),
    (status = 403, description = "Only staff may manage tags"),
    (status = 404, description = "No such tag"),
    ),
    security(("bearerAuth" = []))
)]
#[debug_handler]
pub async fn retrieve_tag_handler(
    State(state): State<SharedAppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&principal, Action::Read, KIND, None)?;
    let id = parse_id(&id)?;

    let tables = state.store.read().await;
    let tag = tables.tag(id).ok_or(AppError::NotFound)?;
    authorize(&principal, Action::Read, KIND, Some(&Target::Unowned))?;

    let set = field_set(KIND, Operation::Retrieve, &principal, Scope::AllResources);
    Ok(Json(tag.render(&tables, set)?))
}

async fn update_tag(
    state: SharedAppState,
    principal: Principal,
    id: String,
    payload: Payload<TagWriteRequest>,
    mode: WriteMode,
) -> Result<Json<TagView>, AppError> {
    authorize(&principal, Action::Update, KIND, None)?;
    let id = parse_id(&id)?;

    let mut tables = state.store.write().await;
    if tables.tag(id).is_none() {
        return Err(AppError::NotFound);
    }
    authorize(&principal, Action::Update, KIND, Some(&Target::Unowned))?;
    let request = accept(payload)?;
    validate(&request, mode)?;

    let tag = tables.update_tag(
        id,
        TagChanges {
            name: request.name,
            blogs: request.blogs,
            comments: request.comments,
        },
    )?;
    info!("{} updated tag {}", principal.display_name(), id);

    let set = field_set(KIND, Operation::Update, &principal, Scope::AllResources);
    Ok(Json(tag.render(&tables, set)?))
}

#[utoipa::path(
    put,
    path = "/api/v1/tag/{id}/",
    params(("id" = i64, Path, description = "Tag id")),
    request_body = TagWriteRequest,
    responses(
    (status = 200, description = "Tag updated", body = TagView),
    (status = 400, description = "Invalid payload"),
    (status = 401, description = "Access token is missing or invalid"),
    (status = 403, description = "Only staff may manage tags"),
    (status = 404, description = "No such tag"),
    ),
    security(("bearerAuth" = []))
)]
#[debug_handler]
pub async fn update_tag_handler(
    State(state): State<SharedAppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
    payload: Payload<TagWriteRequest>,
) -> Result<impl IntoResponse, AppError> {
    update_tag(state, principal, id, payload, WriteMode::Replace).await
}

#[utoipa::path(
    patch,
    path = "/api/v1/tag/{id}/",
    params(("id" = i64, Path, description = "Tag id")),
    request_body = TagWriteRequest,
    responses(
    (status = 200, description = "Tag updated", body = TagView),
    (status = 400, description = "Invalid payload"),
    (status = 401, description = "Access token is missing or invalid"),
    (status = 403, description = "Only staff may manage tags"),
    (status = 404, description = "No such tag"),
    ),
    security(("bearerAuth" = []))
)]
#[debug_handler]
pub async fn partial_update_tag_handler(
    State(state): State<SharedAppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
    payload: Payload<TagWriteRequest>,
) -> Result<impl IntoResponse, AppError> {
    update_tag(state, principal, id, payload, WriteMode::Partial).await
}

#[utoipa::path(
    delete,
    path = "/api/v1/tag/{id}/",
    params(("id" = i64, Path, description = "Tag id")),
    responses(
    (status = 204, description = "Tag deleted"),
    (status = 401, description = "Access token is missing or invalid"),
    (status = 403, description = "Only staff may manage tags"),
    (status = 404, description = "No such tag"),
    ),
    security(("bearerAuth" = []))
)]
#[debug_handler]
pub async fn destroy_tag_handler(
    State(state): State<SharedAppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&principal, Action::Delete, KIND, None)?;
    let id = parse_id(&id)?;

    let mut tables = state.store.write().await;
    if tables.tag(id).is_none() {
        return Err(AppError::NotFound);
    }
    authorize(&principal, Action::Delete, KIND, Some(&Target::Unowned))?;
    tables.delete_tag(id)?;
    info!("{} deleted tag {}", principal.display_name(), id);

    Ok(StatusCode::NO_CONTENT)
}
