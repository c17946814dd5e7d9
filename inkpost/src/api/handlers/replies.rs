use axum::{
    debug_handler,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use inkpost_core::authorization::{Action, Authored, Principal, ResourceKind};
use inkpost_core::models::{Reply, ReplyWriteRequest};
use inkpost_core::moderation::Denylist;
use inkpost_core::representation::{Operation, Scope};
use inkpost_core::validation::{FieldErrors, WriteMode};
use tracing::info;

use crate::api::access::authorize;
use crate::api::error::AppError;
use crate::api::payload::{accept, parse_id, Payload};
use crate::api::views::{discussion::ReplyView, render_all, Render};
use crate::app_state::SharedAppState;
use super::field_set;

const KIND: ResourceKind = ResourceKind::Reply;

fn validate(
    request: &ReplyWriteRequest,
    mode: WriteMode,
    denylist: &Denylist,
) -> Result<(), AppError> {
    let mut errors = FieldErrors::new();
    errors.require("comment", &request.comment, mode);
    errors.require_text("text", &request.text, mode);
    errors.into_result()?;
    if let Some(text) = &request.text {
        denylist.check(text)?;
    }
    Ok(())
}

async fn list_replies(
    state: SharedAppState,
    principal: Principal,
    author: Option<String>,
) -> Result<Json<Vec<ReplyView>>, AppError> {
    authorize(&principal, Action::List, KIND, None)?;

    let scope = match author {
        Some(_) => Scope::ScopedToAuthor,
        None => Scope::AllResources,
    };
    let set = field_set(KIND, Operation::List, &principal, scope);

    let tables = state.store.read().await;
    let replies: Vec<&Reply> = match &author {
        Some(username) => {
            let author = tables.user_by_username(username).map(|user| user.id);
            tables
                .replies()
                .filter(|reply| Some(reply.author) == author)
                .collect()
        }
        None => tables.replies().collect(),
    };
    Ok(Json(render_all(replies, &tables, set)?))
}

#[utoipa::path(
    get,
    path = "/api/v1/reply/",
    responses(
    (status = 200, description = "Every reply", body = [ReplyView]),
    (status = 401, description = "Access token is missing or invalid"),
    ),
    security(("bearerAuth" = []))
)]
#[debug_handler]
pub async fn list_replies_handler(
    State(state): State<SharedAppState>,
    Extension(principal): Extension<Principal>,
) -> Result<impl IntoResponse, AppError> {
    list_replies(state, principal, None).await
}

#[utoipa::path(
    get,
    path = "/api/v1/reply/author/{username}/",
    params(("username" = String, Path, description = "Author username")),
    responses(
    (status = 200, description = "Replies of one author", body = [ReplyView]),
    (status = 401, description = "Access token is missing or invalid"),
    ),
    security(("bearerAuth" = []))
)]
#[debug_handler]
pub async fn list_author_replies_handler(
    State(state): State<SharedAppState>,
    Extension(principal): Extension<Principal>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    list_replies(state, principal, Some(username)).await
}

#[utoipa::path(
    post,
    path = "/api/v1/reply/",
    request_body = ReplyWriteRequest,
    responses(
    (status = 201, description = "Reply created", body = ReplyView),
    (status = 400, description = "Invalid payload or inappropriate language"),
    (status = 401, description = "Access token is missing or invalid"),
    ),
    security(("bearerAuth" = []))
)]
#[debug_handler]
pub async fn create_reply_handler(
    State(state): State<SharedAppState>,
    Extension(principal): Extension<Principal>,
    payload: Payload<ReplyWriteRequest>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&principal, Action::Create, KIND, None)?;
    let author = principal.id().ok_or(AppError::Unauthenticated)?;
    let request = accept(payload)?;
    validate(&request, WriteMode::Create, &state.denylist)?;

    let mut tables = state.store.write().await;
    let reply = tables.insert_reply(
        author,
        request.comment.unwrap_or_default(),
        request.text.unwrap_or_default(),
    )?;
    info!("{} replied to comment {}", principal.display_name(), reply.comment);

    let set = field_set(KIND, Operation::Create, &principal, Scope::AllResources);
    Ok((StatusCode::CREATED, Json(reply.render(&tables, set)?)))
}

#[utoipa::path(
    get,
    path = "/api/v1/reply/{id}/",
    params(("id" = i64, Path, description = "Reply id")),
    responses(
    (status = 200, description = "The reply", body = ReplyView),
    (status = 401, description = "Access token is missing or invalid"),
    (status = 404, description = "No such reply"),
    ),
    security(("bearerAuth" = []))
)]
#[debug_handler]
pub async fn retrieve_reply_handler(
    State(state): State<SharedAppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&principal, Action::Read, KIND, None)?;
    let id = parse_id(&id)?;

    let tables = state.store.read().await;
    let reply = tables.reply(id).ok_or(AppError::NotFound)?;
    authorize(&principal, Action::Read, KIND, Some(&reply.target()))?;

    let set = field_set(KIND, Operation::Retrieve, &principal, Scope::AllResources);
    Ok(Json(reply.render(&tables, set)?))
}

async fn update_reply(
    state: SharedAppState,
    principal: Principal,
    id: String,
    payload: Payload<ReplyWriteRequest>,
    mode: WriteMode,
) -> Result<Json<ReplyView>, AppError> {
    authorize(&principal, Action::Update, KIND, None)?;
    let id = parse_id(&id)?;

    let mut tables = state.store.write().await;
    let target = tables.reply(id).ok_or(AppError::NotFound)?.target();
    authorize(&principal, Action::Update, KIND, Some(&target))?;
    let request = accept(payload)?;
    validate(&request, mode, &state.denylist)?;

    let reply = tables.update_reply(id, request.comment, request.text)?;
    info!("{} updated reply {}", principal.display_name(), id);

    let set = field_set(KIND, Operation::Update, &principal, Scope::AllResources);
    Ok(Json(reply.render(&tables, set)?))
}

#[utoipa::path(
    put,
    path = "/api/v1/reply/{id}/",
    params(("id" = i64, Path, description = "Reply id")),
    request_body = ReplyWriteRequest,
    responses(
    (status = 200, description = "Reply updated", body = ReplyView),
    (status = 400, description = "Invalid payload or inappropriate language"),
    (status = 401, description = "Access token is missing or invalid"),
    (status = 403, description = "Not your reply"),
    (status = 404, description = "No such reply"),
    ),
    security(("bearerAuth" = []))
)]
#[debug_handler]
pub async fn update_reply_handler(
    State(state): State<SharedAppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
    payload: Payload<ReplyWriteRequest>,
) -> Result<impl IntoResponse, AppError> {
    update_reply(state, principal, id, payload, WriteMode::Replace).await
}

#[utoipa::path(
    patch,
    path = "/api/v1/reply/{id}/",
    params(("id" = i64, Path, description = "Reply id")),
    request_body = ReplyWriteRequest,
    responses(
    (status = 200, description = "Reply updated", body = ReplyView),
    (status = 400, description = "Invalid payload or inappropriate language"),
    (status = 401, description = "Access token is missing or invalid"),
    (status = 403, description = "Not your reply"),
    (status = 404, description = "No such reply"),
    ),
    security(("bearerAuth" = []))
)]
#[debug_handler]
pub async fn partial_update_reply_handler(
    State(state): State<SharedAppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
    payload: Payload<ReplyWriteRequest>,
) -> Result<impl IntoResponse, AppError> {
    update_reply(state, principal, id, payload, WriteMode::Partial).await
}

#[utoipa::path(
    delete,
    path = "/api/v1/reply/{id}/",
    params(("id" = i64, Path, description = "Reply id")),
    responses(
    (status = 204, description = "Reply deleted"),
    (status = 401, description = "Access token is missing or invalid"),
    (status = 403, description = "Not your reply"),
    (status = 404, description = "No such reply"),
    ),
    security(("bearerAuth" = []))
)]
#[debug_handler]
pub async fn destroy_reply_handler(
    State(state): State<SharedAppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&principal, Action::Delete, KIND, None)?;
    let id = parse_id(&id)?;

    let mut tables = state.store.write().await;
    let target = tables.reply(id).ok_or(AppError::NotFound)?.target();
    authorize(&principal, Action::Delete, KIND, Some(&target))?;
    tables.delete_reply(id)?;
    info!("{} deleted reply {}", principal.display_name(), id);

    Ok(StatusCode::NO_CONTENT)
}
