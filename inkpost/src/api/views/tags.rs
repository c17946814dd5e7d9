use inkpost_core::authorization::ResourceKind;
use inkpost_core::models::{BlogId, CommentId, Tag, TagId};
use inkpost_core::representation::FieldSet;
use serde::Serialize;
use utoipa::ToSchema;

use super::{unsupported, Render};
use crate::api::error::AppError;
use crate::store::Tables;

#[derive(Debug, Serialize, ToSchema)]
pub struct TagView {
    pub id: TagId,
    pub name: String,
    pub blogs: Vec<BlogId>,
    pub comments: Vec<CommentId>,
}

impl Render for Tag {
    type View = TagView;

    fn render(&self, _tables: &Tables, set: FieldSet) -> Result<TagView, AppError> {
        match set {
            FieldSet::TagReference => Ok(TagView {
                id: self.id,
                name: self.name.clone(),
                blogs: self.blogs.iter().copied().collect(),
                comments: self.comments.iter().copied().collect(),
            }),
            other => Err(unsupported(ResourceKind::Tag, other)),
        }
    }
}
