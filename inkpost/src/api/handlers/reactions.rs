use axum::{
    debug_handler,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use inkpost_core::authorization::{Action, Authored, Principal, ResourceKind};
use inkpost_core::models::{BlogId, CommentId, Reaction, ReactionType, ReactionWriteRequest};
use inkpost_core::representation::{Operation, Scope};
use inkpost_core::validation::{invalid_choice_message, FieldErrors, WriteMode, REQUIRED};
use serde::Deserialize;
use tracing::info;
use utoipa::IntoParams;

use crate::api::access::authorize;
use crate::api::error::AppError;
use crate::api::payload::{accept, parse_id, Payload};
use crate::api::views::{feedback::ReactionView, render_all, Render};
use crate::app_state::SharedAppState;
use crate::store::feedback::ReactionChanges;
use super::field_set;

const KIND: ResourceKind = ResourceKind::Reaction;

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ReactionQuery {
    /// Only reactions of this author, rendered with the nested blog
    pub username: Option<String>,
}

/// Checks the payload and parses the reaction type
fn validate(
    request: &ReactionWriteRequest,
    mode: WriteMode,
) -> Result<Option<ReactionType>, AppError> {
    let mut errors = FieldErrors::new();
    errors.require("blog", &request.blog, mode);
    errors.require("comment", &request.comment, mode);
    errors.require("reaction_type", &request.reaction_type, mode);

    let reaction_type = match request.reaction_type.as_deref() {
        Some(raw) => {
            let parsed = ReactionType::parse(raw);
            if parsed.is_none() {
                errors.add("reaction_type", invalid_choice_message(raw));
            }
            parsed
        }
        None => None,
    };
    errors.into_result()?;
    Ok(reaction_type)
}

struct NewReaction {
    blog: BlogId,
    comment: CommentId,
    reaction_type: ReactionType,
}

fn validate_new(request: &ReactionWriteRequest) -> Result<NewReaction, AppError> {
    let reaction_type = validate(request, WriteMode::Create)?;
    match (request.blog, request.comment, reaction_type) {
        (Some(blog), Some(comment), Some(reaction_type)) => Ok(NewReaction {
            blog,
            comment,
            reaction_type,
        }),
        (_, _, None) => Err(FieldErrors::single("reaction_type", REQUIRED).into()),
        (None, _, _) => Err(FieldErrors::single("blog", REQUIRED).into()),
        (_, None, _) => Err(FieldErrors::single("comment", REQUIRED).into()),
    }
}

/// Serves both `/reaction/` and `/reaction/author/`
#[utoipa::path(
    get,
    path = "/api/v1/reaction/",
    params(ReactionQuery),
    responses(
    (status = 200, description = "Reactions, nested when filtered by author",
        body = [ReactionView]),
    (status = 401, description = "Access token is missing or invalid"),
    ),
    security(("bearerAuth" = []))
)]
#[debug_handler]
pub async fn list_reactions_handler(
    State(state): State<SharedAppState>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<ReactionQuery>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&principal, Action::List, KIND, None)?;

    let username = query.username.filter(|username| !username.is_empty());
    let scope = match username {
        Some(_) => Scope::ScopedToAuthor,
        None => Scope::AllResources,
    };
    let set = field_set(KIND, Operation::List, &principal, scope);

    let tables = state.store.read().await;
    let reactions: Vec<&Reaction> = match &username {
        Some(username) => {
            let author = tables.user_by_username(username).map(|user| user.id);
            tables
                .reactions()
                .filter(|reaction| Some(reaction.author) == author)
                .collect()
        }
        None => tables.reactions().collect(),
    };
    Ok(Json(render_all(reactions, &tables, set)?))
}

#[utoipa::path(
    post,
    path = "/api/v1/reaction/",
    request_body = ReactionWriteRequest,
    responses(
    (status = 201, description = "Reaction created", body = ReactionView),
    (status = 400, description = "Invalid payload"),
    (status = 401, description = "Access token is missing or invalid"),
    ),
    security(("bearerAuth" = []))
)]
#[debug_handler]
pub async fn create_reaction_handler(
    State(state): State<SharedAppState>,
    Extension(principal): Extension<Principal>,
    payload: Payload<ReactionWriteRequest>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&principal, Action::Create, KIND, None)?;
    let author = principal.id().ok_or(AppError::Unauthenticated)?;
    let request = accept(payload)?;
    let new = validate_new(&request)?;

    let mut tables = state.store.write().await;
    let reaction = tables.insert_reaction(author, new.blog, new.comment, new.reaction_type)?;
    info!(
        "{} reacted with {} to comment {:?}",
        principal.display_name(),
        reaction.reaction_type.as_str(),
        reaction.comment
    );

    let set = field_set(KIND, Operation::Create, &principal, Scope::AllResources);
    Ok((StatusCode::CREATED, Json(reaction.render(&tables, set)?)))
}

#[utoipa::path(
    get,
    path = "/api/v1/reaction/{id}/",
    params(("id" = i64, Path, description = "Reaction id")),
    responses(
    (status = 200, description = "The reaction", body = ReactionView),
    (status = 401, description = "Access token is missing or invalid"),
    (status = 404, description = "No such reaction"),
    ),
    security(("bearerAuth" = []))
)]
#[debug_handler]
pub async fn retrieve_reaction_handler(
    State(state): State<SharedAppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&principal, Action::Read, KIND, None)?;
    let id = parse_id(&id)?;

    let tables = state.store.read().await;
    let reaction = tables.reaction(id).ok_or(AppError::NotFound)?;
    authorize(&principal, Action::Read, KIND, Some(&reaction.target()))?;

    let set = field_set(KIND, Operation::Retrieve, &principal, Scope::AllResources);
    Ok(Json(reaction.render(&tables, set)?))
}

async fn update_reaction(
    state: SharedAppState,
    principal: Principal,
    id: String,
    payload: Payload<ReactionWriteRequest>,
    mode: WriteMode,
) -> Result<Json<ReactionView>, AppError> {
    authorize(&principal, Action::Update, KIND, None)?;
    let id = parse_id(&id)?;

    let mut tables = state.store.write().await;
    let target = tables.reaction(id).ok_or(AppError::NotFound)?.target();
    authorize(&principal, Action::Update, KIND, Some(&target))?;
    let request = accept(payload)?;
    let reaction_type = validate(&request, mode)?;

    let reaction = tables.update_reaction(
        id,
        ReactionChanges {
            blog: request.blog,
            comment: request.comment,
            reaction_type,
        },
    )?;
    info!("{} updated reaction {}", principal.display_name(), id);

    let set = field_set(KIND, Operation::Update, &principal, Scope::AllResources);
    Ok(Json(reaction.render(&tables, set)?))
}

#[utoipa::path(
    put,
    path = "/api/v1/reaction/{id}/",
    params(("id" = i64, Path, description = "Reaction id")),
    request_body = ReactionWriteRequest,
    responses(
    (status = 200, description = "Reaction updated", body = ReactionView),
    (status = 400, description = "Invalid payload"),
    (status = 401, description = "Access token is missing or invalid"),
    (status = 403, description = "Not your reaction"),
    (status = 404, description = "No such reaction"),
    ),
    security(("bearerAuth" = []))
)]
#[debug_handler]
pub async fn update_reaction_handler(
    State(state): State<SharedAppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
    payload: Payload<ReactionWriteRequest>,
) -> Result<impl IntoResponse, AppError> {
    update_reaction(state, principal, id, payload, WriteMode::Replace).await
}

#[utoipa::path(
    patch,
    path = "/api/v1/reaction/{id}/",
    params(("id" = i64, Path, description = "Reaction id")),
    request_body = ReactionWriteRequest,
    responses(
    (status = 200, description = "Reaction updated", body = ReactionView),
    (status = 400, description = "Invalid payload"),
    (status = 401, description = "Access token is missing or invalid"),
    (status = 403, description = "Not your reaction"),
    (status = 404, description = "No such reaction"),
    ),
    security(("bearerAuth" = []))
)]
#[debug_handler]
pub async fn partial_update_reaction_handler(
    State(state): State<SharedAppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
    payload: Payload<ReactionWriteRequest>,
) -> Result<impl IntoResponse, AppError> {
    update_reaction(state, principal, id, payload, WriteMode::Partial).await
}

#[utoipa::path(
    delete,
    path = "/api/v1/reaction/{id}/",
    params(("id" = i64, Path, description = "Reaction id")),
    responses(
    (status = 204, description = "Reaction deleted"),
    (status = 401, description = "Access token is missing or invalid"),
    (status = 403, description = "Not your reaction"),
    (status = 404, description = "No such reaction"),
    ),
    security(("bearerAuth" = []))
)]
#[debug_handler]
pub async fn destroy_reaction_handler(
    State(state): State<SharedAppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&principal, Action::Delete, KIND, None)?;
    let id = parse_id(&id)?;

    let mut tables = state.store.write().await;
    let target = tables.reaction(id).ok_or(AppError::NotFound)?.target();
    authorize(&principal, Action::Delete, KIND, Some(&target))?;
    tables.delete_reaction(id)?;
    info!("{} deleted reaction {}", principal.display_name(), id);

    Ok(StatusCode::NO_CONTENT)
}
