//! Response bodies, one struct per field set
//!
//! Which struct a response uses is decided by
//! [`inkpost_core::representation::select_schema`]; the renderers here only
//! fill the chosen set from the tables.

use inkpost_core::authorization::ResourceKind;
use inkpost_core::representation::FieldSet;
use serde::Serialize;

use crate::api::error::AppError;
use crate::store::Tables;

pub mod accounts;
pub mod blogs;
pub mod discussion;
pub mod feedback;
pub mod tags;

pub use accounts::{render_user, UserView};

pub trait Render {
    type View: Serialize;

    fn render(&self, tables: &Tables, set: FieldSet) -> Result<Self::View, AppError>;
}

/// Render every item with the same field set
pub fn render_all<'a, T, I>(
    items: I,
    tables: &Tables,
    set: FieldSet,
) -> Result<Vec<T::View>, AppError>
where
    T: Render + 'a,
    I: IntoIterator<Item = &'a T>,
{
    items
        .into_iter()
        .map(|item| item.render(tables, set))
        .collect()
}

pub(crate) fn unsupported(kind: ResourceKind, set: FieldSet) -> AppError {
    AppError::InternalServerError(format!("field set {set:?} cannot render a {kind}"))
}

pub(crate) fn dangling(kind: ResourceKind, id: i64) -> AppError {
    AppError::InternalServerError(format!("dangling reference to {kind} {id}"))
}
