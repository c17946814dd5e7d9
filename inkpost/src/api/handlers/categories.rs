use axum::{
    debug_handler,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use inkpost_core::authorization::{Action, Principal, ResourceKind, Target};
use inkpost_core::models::{Category, CategoryWriteRequest};
use inkpost_core::pagination::{paginate, PageRequest};
use inkpost_core::representation::{Operation, Scope};
use inkpost_core::validation::WriteMode;
use serde::Deserialize;
use tracing::info;
use utoipa::IntoParams;

use crate::api::access::authorize;
use crate::api::error::AppError;
use crate::api::payload::{accept, declared_errors, parse_id, Payload};
use crate::api::views::{blogs::CategoryView, render_all, Render};
use crate::app_state::SharedAppState;
use super::field_set;

const KIND: ResourceKind = ResourceKind::Category;
const COLLECTION_PATH: &str = "/api/v1/category/";

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct CategoryQuery {
    /// Page number, 1-based, or `last`
    pub page: Option<String>,
    /// Case-insensitive substring of the name
    pub search: Option<String>,
    /// Exact name
    pub name: Option<String>,
    /// One of `id`, `-id`, `name`, `-name`
    pub ordering: Option<String>,
}

impl CategoryQuery {
    fn matches(&self, category: &Category) -> bool {
        let by_name = self.name.as_ref().is_none_or(|name| &category.name == name);
        let by_search = self.search.as_ref().is_none_or(|term| {
            category
                .name
                .to_lowercase()
                .contains(&term.trim().to_lowercase())
        });
        by_name && by_search
    }

    /// Unknown ordering fields are ignored
    fn sort(&self, categories: &mut [&Category]) {
        match self.ordering.as_deref().map(str::trim) {
            Some("name") => categories.sort_by(|a, b| a.name.cmp(&b.name)),
            Some("-name") => categories.sort_by(|a, b| b.name.cmp(&a.name)),
            Some("-id") => categories.sort_by(|a, b| b.id.cmp(&a.id)),
            _ => categories.sort_by_key(|category| category.id),
        }
    }

    fn page_request(&self) -> PageRequest {
        PageRequest::new(COLLECTION_PATH, self.page.clone())
            .with_query("name", self.name.as_deref())
            .with_query("ordering", self.ordering.as_deref())
            .with_query("search", self.search.as_deref())
    }
}

fn validate(request: &CategoryWriteRequest, mode: WriteMode) -> Result<(), AppError> {
    let mut errors = declared_errors(request);
    errors.require_text("name", &request.name, mode);
    errors.into_result()?;
    Ok(())
}

#[utoipa::path(
    get,
    path = "/api/v1/category/",
    params(CategoryQuery),
    responses(
    (status = 200, description = "One page of categories with their blogs", body = [CategoryView]),
    (status = 401, description = "Access token is missing or invalid"),
    (status = 404, description = "Invalid page"),
    ),
    security(("bearerAuth" = []))
)]
#[debug_handler]
pub async fn list_categories_handler(
    State(state): State<SharedAppState>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<CategoryQuery>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&principal, Action::List, KIND, None)?;

    let set = field_set(KIND, Operation::List, &principal, Scope::AllResources);
    let tables = state.store.read().await;
    let mut categories: Vec<&Category> = tables
        .categories()
        .filter(|category| query.matches(category))
        .collect();
    query.sort(&mut categories);

    let page = paginate(
        categories,
        state.settings.pagination.category_page_size,
        &query.page_request(),
    )?;
    let page = page.try_map(|categories| render_all(categories, &tables, set))?;
    Ok(Json(page))
}

#[utoipa::path(
    post,
    path = "/api/v1/category/",
    request_body = CategoryWriteRequest,
    responses(
    (status = 201, description = "Category created", body = CategoryView),
    (status = 400, description = "Invalid payload"),
    (status = 401, description = "Access token is missing or invalid"),
    (status = 403, description = "Only staff may manage categories"),
    ),
    security(("bearerAuth" = []))
)]
#[debug_handler]
pub async fn create_category_handler(
    State(state): State<SharedAppState>,
    Extension(principal): Extension<Principal>,
    payload: Payload<CategoryWriteRequest>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&principal, Action::Create, KIND, None)?;
    let request = accept(payload)?;
    validate(&request, WriteMode::Create)?;

    let mut tables = state.store.write().await;
    let category = tables.insert_category(request.name.unwrap_or_default())?;
    info!("{} created category '{}'", principal.display_name(), category.name);

    let set = field_set(KIND, Operation::Create, &principal, Scope::AllResources);
    Ok((StatusCode::CREATED, Json(category.render(&tables, set)?)))
}

#[utoipa::path(
    get,
    path = "/api/v1/category/{id}/",
    params(("id" = i64, Path, description = "Category id")),
    responses(
    (status = 200, description = "The category with its blogs", body = CategoryView),
    (status = 401, description = "Access token is missing or invalid"),
    (status = 404, description = "No such category"),
    ),
    security(("bearerAuth" = []))
)]
#[debug_handler]
pub async fn retrieve_category_handler(
    State(state): State<SharedAppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&principal, Action::Read, KIND, None)?;
    let id = parse_id(&id)?;

    let tables = state.store.read().await;
    let category = tables.category(id).ok_or(AppError::NotFound)?;
    authorize(&principal, Action::Read, KIND, Some(&Target::Unowned))?;

    let set = field_set(KIND, Operation::Retrieve, &principal, Scope::AllResources);
    Ok(Json(category.render(&tables, set)?))
}

async fn update_category(
    state: SharedAppState,
    principal: Principal,
    id: String,
    payload: Payload<CategoryWriteRequest>,
    mode: WriteMode,
) -> Result<Json<CategoryView>, AppError> {
    authorize(&principal, Action::Update, KIND, None)?;
    let id = parse_id(&id)?;

    let mut tables = state.store.write().await;
    if tables.category(id).is_none() {
        return Err(AppError::NotFound);
    }
    authorize(&principal, Action::Update, KIND, Some(&Target::Unowned))?;
    let request = accept(payload)?;
    validate(&request, mode)?;

    let category = tables.update_category(id, request.name)?;
    info!("{} updated category {}", principal.display_name(), id);

    let set = field_set(KIND, Operation::Update, &principal, Scope::AllResources);
    Ok(Json(category.render(&tables, set)?))
}

#[utoipa::path(
    put,
    path = "/api/v1/category/{id}/",
    params(("id" = i64, Path, description = "Category id")),
    request_body = CategoryWriteRequest,
    responses(
    (status = 200, description = "Category updated", body = CategoryView),
    (status = 400, description = "Invalid payload"),
    (status = 401, description = "Access token is missing or invalid"),
    (status = 403, description = "Only staff may manage categories"),
    (status = 404, description = "No such category"),
    ),
    security(("bearerAuth" = []))
)]
#[debug_handler]
pub async fn update_category_handler(
    State(state): State<SharedAppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
    payload: Payload<CategoryWriteRequest>,
) -> Result<impl IntoResponse, AppError> {
    update_category(state, principal, id, payload, WriteMode::Replace).await
}

#[utoipa::path(
    patch,
    path = "/api/v1/category/{id}/",
    params(("id" = i64, Path, description = "Category id")),
    request_body = CategoryWriteRequest,
    responses(
    (status = 200, description = "Category updated", body = CategoryView),
    (status = 400, description = "Invalid payload"),
    (status = 401, description = "Access token is missing or invalid"),
    (status = 403, description = "Only staff may manage categories"),
    (status = 404, description = "No such category"),
    ),
    security(("bearerAuth" = []))
)]
#[debug_handler]
pub async fn partial_update_category_handler(
    State(state): State<SharedAppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
    payload: Payload<CategoryWriteRequest>,
) -> Result<impl IntoResponse, AppError> {
    update_category(state, principal, id, payload, WriteMode::Partial).await
}

#[utoipa::path(
    delete,
    path = "/api/v1/category/{id}/",
    params(("id" = i64, Path, description = "Category id")),
    responses(
    (status = 204, description = "Category deleted, its blogs are kept"),
    (status = 401, description = "Access token is missing or invalid"),
    (status = 403, description = "Only staff may manage categories"),
    (status = 404, description = "No such category"),
    ),
    security(("bearerAuth" = []))
)]
#[debug_handler]
pub async fn destroy_category_handler(
    State(state): State<SharedAppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&principal, Action::Delete, KIND, None)?;
    let id = parse_id(&id)?;

    let mut tables = state.store.write().await;
    if tables.category(id).is_none() {
        return Err(AppError::NotFound);
    }
    authorize(&principal, Action::Delete, KIND, Some(&Target::Unowned))?;
    tables.delete_category(id)?;
    info!("{} deleted category {}", principal.display_name(), id);

    Ok(StatusCode::NO_CONTENT)
}
