use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::blog::BlogId;
use crate::authorization::{Authored, UserId};

pub type CommentId = i64;
pub type ReplyId = i64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: CommentId,
    pub author: UserId,
    pub blog: BlogId,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Authored for Comment {
    fn author(&self) -> UserId {
        self.author
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub id: ReplyId,
    pub author: UserId,
    pub comment: CommentId,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Authored for Reply {
    fn author(&self) -> UserId {
        self.author
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct CommentWriteRequest {
    pub blog: Option<BlogId>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct ReplyWriteRequest {
    pub comment: Option<CommentId>,
    pub text: Option<String>,
}
