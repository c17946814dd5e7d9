use axum::{
    debug_handler,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use inkpost_core::authorization::{Action, Authored, Principal, ResourceKind};
use inkpost_core::models::{Comment, CommentWriteRequest};
use inkpost_core::moderation::Denylist;
use inkpost_core::representation::{Operation, Scope};
use inkpost_core::validation::{FieldErrors, WriteMode};
use tracing::info;

use crate::api::access::authorize;
use crate::api::error::AppError;
use crate::api::payload::{accept, parse_id, Payload};
use crate::api::views::{discussion::CommentView, render_all, Render};
use crate::app_state::SharedAppState;
use super::field_set;

const KIND: ResourceKind = ResourceKind::Comment;

fn validate(
    request: &CommentWriteRequest,
    mode: WriteMode,
    denylist: &Denylist,
) -> Result<(), AppError> {
    let mut errors = FieldErrors::new();
    errors.require("blog", &request.blog, mode);
    errors.require_text("text", &request.text, mode);
    errors.into_result()?;
    if let Some(text) = &request.text {
        denylist.check(text)?;
    }
    Ok(())
}

async fn list_comments(
    state: SharedAppState,
    principal: Principal,
    author: Option<String>,
) -> Result<Json<Vec<CommentView>>, AppError> {
    authorize(&principal, Action::List, KIND, None)?;

    let scope = match author {
        Some(_) => Scope::ScopedToAuthor,
        None => Scope::AllResources,
    };
    let set = field_set(KIND, Operation::List, &principal, scope);

    let tables = state.store.read().await;
    let comments: Vec<&Comment> = match &author {
        Some(username) => {
            let author = tables.user_by_username(username).map(|user| user.id);
            tables
                .comments()
                .filter(|comment| Some(comment.author) == author)
                .collect()
        }
        None => tables.comments().collect(),
    };
    Ok(Json(render_all(comments, &tables, set)?))
}

#[utoipa::path(
    get,
    path = "/api/v1/comment/",
    responses(
    (status = 200, description = "Every comment", body = [CommentView]),
    (status = 401, description = "Access token is missing or invalid"),
    ),
    security(("bearerAuth" = []))
)]
#[debug_handler]
pub async fn list_comments_handler(
    State(state): State<SharedAppState>,
    Extension(principal): Extension<Principal>,
) -> Result<impl IntoResponse, AppError> {
    list_comments(state, principal, None).await
}

#[utoipa::path(
    get,
    path = "/api/v1/comment/author/{username}/",
    params(("username" = String, Path, description = "Author username")),
    responses(
    (status = 200, description = "Comments of one author with blog, reactions and replies",
        body = [CommentView]),
    (status = 401, description = "Access token is missing or invalid"),
    ),
    security(("bearerAuth" = []))
)]
#[debug_handler]
pub async fn list_author_comments_handler(
    State(state): State<SharedAppState>,
    Extension(principal): Extension<Principal>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    list_comments(state, principal, Some(username)).await
}

#[utoipa::path(
    post,
    path = "/api/v1/comment/",
    request_body = CommentWriteRequest,
    responses(
    (status = 201, description = "Comment created", body = CommentView),
    (status = 400, description = "Invalid payload or inappropriate language"),
    (status = 401, description = "Access token is missing or invalid"),
    ),
    security(("bearerAuth" = []))
)]
#[debug_handler]
pub async fn create_comment_handler(
    State(state): State<SharedAppState>,
    Extension(principal): Extension<Principal>,
    payload: Payload<CommentWriteRequest>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&principal, Action::Create, KIND, None)?;
    let author = principal.id().ok_or(AppError::Unauthenticated)?;
    let request = accept(payload)?;
    validate(&request, WriteMode::Create, &state.denylist)?;

    let mut tables = state.store.write().await;
    let comment = tables.insert_comment(
        author,
        request.blog.unwrap_or_default(),
        request.text.unwrap_or_default(),
    )?;
    info!("{} commented on blog {}", principal.display_name(), comment.blog);

    let set = field_set(KIND, Operation::Create, &principal, Scope::AllResources);
    Ok((StatusCode::CREATED, Json(comment.render(&tables, set)?)))
}

#[utoipa::path(
    get,
    path = "/api/v1/comment/{id}/",
    params(("id" = i64, Path, description = "Comment id")),
    responses(
    (status = 200, description = "The comment", body = CommentView),
    (status = 401, description = "Access token is missing or invalid"),
    (status = 404, description = "No such comment"),
    ),
    security(("bearerAuth" = []))
)]
#[debug_handler]
pub async fn retrieve_comment_handler(
    State(state): State<SharedAppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&principal, Action::Read, KIND, None)?;
    let id = parse_id(&id)?;

    let tables = state.store.read().await;
    let comment = tables.comment(id).ok_or(AppError::NotFound)?;
    authorize(&principal, Action::Read, KIND, Some(&comment.target()))?;

    let set = field_set(KIND, Operation::Retrieve, &principal, Scope::AllResources);
    Ok(Json(comment.render(&tables, set)?))
}

async fn update_comment(
    state: SharedAppState,
    principal: Principal,
    id: String,
    payload: Payload<CommentWriteRequest>,
    mode: WriteMode,
) -> Result<Json<CommentView>, AppError> {
    authorize(&principal, Action::Update, KIND, None)?;
    let id = parse_id(&id)?;

    let mut tables = state.store.write().await;
    let target = tables.comment(id).ok_or(AppError::NotFound)?.target();
    authorize(&principal, Action::Update, KIND, Some(&target))?;
    let request = accept(payload)?;
    validate(&request, mode, &state.denylist)?;

    let comment = tables.update_comment(id, request.blog, request.text)?;
    info!("{} updated comment {}", principal.display_name(), id);

    let set = field_set(KIND, Operation::Update, &principal, Scope::AllResources);
    Ok(Json(comment.render(&tables, set)?))
}

#[utoipa::path(
    put,
    path = "/api/v1/comment/{id}/",
    params(("id" = i64, Path, description = "Comment id")),
    request_body = CommentWriteRequest,
    responses(
    (status = 200, description = "Comment updated", body = CommentView),
    (status = 400, description = "Invalid payload or inappropriate language"),
    (status = 401, description = "Access token is missing or invalid"),
    (status = 403, description = "Not your comment"),
    (status = 404, description = "No such comment"),
    ),
    security(("bearerAuth" = []))
)]
#[debug_handler]
pub async fn update_comment_handler(
    State(state): State<SharedAppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
    payload: Payload<CommentWriteRequest>,
) -> Result<impl IntoResponse, AppError> {
    update_comment(state, principal, id, payload, WriteMode::Replace).await
}

#[utoipa::path(
    patch,
    path = "/api/v1/comment/{id}/",
    params(("id" = i64, Path, description = "Comment id")),
    request_body = CommentWriteRequest,
    responses(
    (status = 200, description = "Comment updated", body = CommentView),
    (status = 400, description = "Invalid payload or inappropriate language"),
    (status = 401, description = "Access token is missing or invalid"),
    (status = 403, description = "Not your comment"),
    (status = 404, description = "No such comment"),
    ),
    security(("bearerAuth" = []))
)]
#[debug_handler]
pub async fn partial_update_comment_handler(
    State(state): State<SharedAppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
    payload: Payload<CommentWriteRequest>,
) -> Result<impl IntoResponse, AppError> {
    update_comment(state, principal, id, payload, WriteMode::Partial).await
}

#[utoipa::path(
    delete,
    path = "/api/v1/comment/{id}/",
    params(("id" = i64, Path, description = "Comment id")),
    responses(
    (status = 204, description = "Comment deleted with its replies"),
    (status = 401, description = "Access token is missing or invalid"),
    (status = 403, description = "Not your comment"),
    (status = 404, description = "No such comment"),
    ),
    security(("bearerAuth" = []))
)]
#[debug_handler]
pub async fn destroy_comment_handler(
    State(state): State<SharedAppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&principal, Action::Delete, KIND, None)?;
    let id = parse_id(&id)?;

    let mut tables = state.store.write().await;
    let target = tables.comment(id).ok_or(AppError::NotFound)?.target();
    authorize(&principal, Action::Delete, KIND, Some(&target))?;
    tables.delete_comment(id)?;
    info!("{} deleted comment {}", principal.display_name(), id);

    Ok(StatusCode::NO_CONTENT)
}
