use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::blog::BlogId;
use super::discussion::CommentId;

pub type TagId = i64;

pub const TAG_NAME_MAX_LENGTH: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    pub blogs: BTreeSet<BlogId>,
    pub comments: BTreeSet<CommentId>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct TagWriteRequest {
    #[validate(length(max = 20, message = "Ensure this field has no more than 20 characters."))]
    pub name: Option<String>,
    pub blogs: Option<Vec<BlogId>>,
    pub comments: Option<Vec<CommentId>>,
}
