use axum::{
    debug_handler,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use inkpost_core::authorization::{Action, Authored, Principal, ResourceKind};
use inkpost_core::models::{Blog, BlogWriteRequest};
use inkpost_core::pagination::{paginate, PageRequest};
use inkpost_core::representation::{Operation, Scope};
use inkpost_core::validation::WriteMode;
use serde::Deserialize;
use tracing::info;
use utoipa::IntoParams;

use crate::api::access::authorize;
use crate::api::error::AppError;
use crate::api::payload::{accept, declared_errors, parse_id, Payload};
use crate::api::views::{blogs::BlogView, render_all, Render};
use crate::app_state::SharedAppState;
use crate::store::blogs::{BlogChanges, BlogDraft};
use super::field_set;

const KIND: ResourceKind = ResourceKind::Blog;

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct PageQuery {
    /// Page number, 1-based, or `last`
    pub page: Option<String>,
}

fn validate(request: &BlogWriteRequest, mode: WriteMode) -> Result<(), AppError> {
    let mut errors = declared_errors(request);
    errors.require_text("title", &request.title, mode);
    errors.require("category", &request.category, mode);
    errors.into_result()?;
    Ok(())
}

async fn list_blogs(
    state: SharedAppState,
    principal: Principal,
    author: Option<String>,
    query: PageQuery,
) -> Result<impl IntoResponse, AppError> {
    authorize(&principal, Action::List, KIND, None)?;

    let (scope, path) = match &author {
        Some(username) => (Scope::ScopedToAuthor, format!("/api/v1/blog/author/{username}/")),
        None => (Scope::AllResources, "/api/v1/blog/".to_string()),
    };
    let set = field_set(KIND, Operation::List, &principal, scope);

    let tables = state.store.read().await;
    let blogs: Vec<&Blog> = match &author {
        Some(username) => match tables.user_by_username(username) {
            Some(user) => tables.blogs_of(user.id).collect(),
            None => Vec::new(),
        },
        None => tables.blogs().collect(),
    };

    let page = paginate(
        blogs,
        state.settings.pagination.blog_page_size,
        &PageRequest::new(path, query.page),
    )?;
    let page = page.try_map(|blogs| render_all(blogs, &tables, set))?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/api/v1/blog/",
    params(PageQuery),
    responses(
    (status = 200, description = "One page of blogs", body = [BlogView]),
    (status = 401, description = "Access token is missing or invalid"),
    (status = 404, description = "Invalid page"),
    ),
    security(("bearerAuth" = []))
)]
#[debug_handler]
pub async fn list_blogs_handler(
    State(state): State<SharedAppState>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    list_blogs(state, principal, None, query).await
}

#[utoipa::path(
    get,
    path = "/api/v1/blog/author/{username}/",
    params(("username" = String, Path, description = "Author username"), PageQuery),
    responses(
    (status = 200, description = "One page of the author's blogs", body = [BlogView]),
    (status = 401, description = "Access token is missing or invalid"),
    (status = 404, description = "Invalid page"),
    ),
    security(("bearerAuth" = []))
)]
#[debug_handler]
pub async fn list_author_blogs_handler(
    State(state): State<SharedAppState>,
    Extension(principal): Extension<Principal>,
    Path(username): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    list_blogs(state, principal, Some(username), query).await
}

#[utoipa::path(
    post,
    path = "/api/v1/blog/",
    request_body = BlogWriteRequest,
    responses(
    (status = 201, description = "Blog created", body = BlogView),
    (status = 400, description = "Invalid payload"),
    (status = 401, description = "Access token is missing or invalid"),
    ),
    security(("bearerAuth" = []))
)]
#[debug_handler]
pub async fn create_blog_handler(
    State(state): State<SharedAppState>,
    Extension(principal): Extension<Principal>,
    payload: Payload<BlogWriteRequest>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&principal, Action::Create, KIND, None)?;
    let author = principal.id().ok_or(AppError::Unauthenticated)?;
    let request = accept(payload)?;
    validate(&request, WriteMode::Create)?;

    let mut tables = state.store.write().await;
    let blog = tables.insert_blog(
        author,
        BlogDraft {
            title: request.title.unwrap_or_default(),
            description: request.description.unwrap_or_default(),
            category: request.category.unwrap_or_default(),
            is_public: request.is_public.unwrap_or(true),
        },
    )?;
    info!("{} created blog {} ('{}')", principal.display_name(), blog.id, blog.title);

    let set = field_set(KIND, Operation::Create, &principal, Scope::AllResources);
    Ok((StatusCode::CREATED, Json(blog.render(&tables, set)?)))
}

#[utoipa::path(
    get,
    path = "/api/v1/blog/{id}/",
    params(("id" = i64, Path, description = "Blog id")),
    responses(
    (status = 200, description = "The blog", body = BlogView),
    (status = 401, description = "Access token is missing or invalid"),
    (status = 404, description = "No such blog"),
    ),
    security(("bearerAuth" = []))
)]
#[debug_handler]
pub async fn retrieve_blog_handler(
    State(state): State<SharedAppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&principal, Action::Read, KIND, None)?;
    let id = parse_id(&id)?;

    let tables = state.store.read().await;
    let blog = tables.blog(id).ok_or(AppError::NotFound)?;
    authorize(&principal, Action::Read, KIND, Some(&blog.target()))?;

    let set = field_set(KIND, Operation::Retrieve, &principal, Scope::AllResources);
    Ok(Json(blog.render(&tables, set)?))
}

async fn update_blog(
    state: SharedAppState,
    principal: Principal,
    id: String,
    payload: Payload<BlogWriteRequest>,
    mode: WriteMode,
) -> Result<Json<BlogView>, AppError> {
    authorize(&principal, Action::Update, KIND, None)?;
    let id = parse_id(&id)?;

    let mut tables = state.store.write().await;
    let target = tables.blog(id).ok_or(AppError::NotFound)?.target();
    authorize(&principal, Action::Update, KIND, Some(&target))?;
    let request = accept(payload)?;
    validate(&request, mode)?;

    let blog = tables.update_blog(
        id,
        BlogChanges {
            title: request.title,
            description: request.description,
            category: request.category,
            is_public: request.is_public,
        },
    )?;
    info!("{} updated blog {}", principal.display_name(), id);

    let set = field_set(KIND, Operation::Update, &principal, Scope::AllResources);
    Ok(Json(blog.render(&tables, set)?))
}

#[utoipa::path(
    put,
    path = "/api/v1/blog/{id}/",
    params(("id" = i64, Path, description = "Blog id")),
    request_body = BlogWriteRequest,
    responses(
    (status = 200, description = "Blog updated", body = BlogView),
    (status = 400, description = "Invalid payload"),
    (status = 401, description = "Access token is missing or invalid"),
    (status = 403, description = "Not your blog"),
    (status = 404, description = "No such blog"),
    ),
    security(("bearerAuth" = []))
)]
#[debug_handler]
pub async fn update_blog_handler(
    State(state): State<SharedAppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
    payload: Payload<BlogWriteRequest>,
) -> Result<impl IntoResponse, AppError> {
    update_blog(state, principal, id, payload, WriteMode::Replace).await
}

#[utoipa::path(
    patch,
    path = "/api/v1/blog/{id}/",
    params(("id" = i64, Path, description = "Blog id")),
    request_body = BlogWriteRequest,
    responses(
    (status = 200, description = "Blog updated", body = BlogView),
    (status = 400, description = "Invalid payload"),
    (status = 401, description = "Access token is missing or invalid"),
    (status = 403, description = "Not your blog"),
    (status = 404, description = "No such blog"),
    ),
    security(("bearerAuth" = []))
)]
#[debug_handler]
pub async fn partial_update_blog_handler(
    State(state): State<SharedAppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
    payload: Payload<BlogWriteRequest>,
) -> Result<impl IntoResponse, AppError> {
    update_blog(state, principal, id, payload, WriteMode::Partial).await
}

#[utoipa::path(
    delete,
    path = "/api/v1/blog/{id}/",
    params(("id" = i64, Path, description = "Blog id")),
    responses(
    (status = 204, description = "Blog deleted with its comments and likes"),
    (status = 401, description = "Access token is missing or invalid"),
    (status = 403, description = "Not your blog"),
    (status = 404, description = "No such blog"),
    ),
    security(("bearerAuth" = []))
)]
#[debug_handler]
pub async fn destroy_blog_handler(
    State(state): State<SharedAppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&principal, Action::Delete, KIND, None)?;
    let id = parse_id(&id)?;

    let mut tables = state.store.write().await;
    let target = tables.blog(id).ok_or(AppError::NotFound)?.target();
    authorize(&principal, Action::Delete, KIND, Some(&target))?;
    tables.delete_blog(id)?;
    info!("{} deleted blog {}", principal.display_name(), id);

    Ok(StatusCode::NO_CONTENT)
}
