use inkpost_core::authorization::{ResourceKind, UserId};
use inkpost_core::models::{BlogId, Comment, CommentId, Reply, ReplyId};
use inkpost_core::representation::FieldSet;
use inkpost_core::utils::format::{format_timestamp, format_timestamp_with_zone};
use serde::Serialize;
use utoipa::ToSchema;

use super::blogs::{blog_card, BlogCardView};
use super::feedback::{reaction_profile, ReactionProfileView};
use super::{dangling, unsupported, Render};
use crate::api::error::AppError;
use crate::store::Tables;

#[derive(Debug, Serialize, ToSchema)]
pub struct CommentReferenceView {
    pub id: CommentId,
    pub author: UserId,
    pub blog: BlogId,
    pub text: String,
    pub created_at: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CommentProfileView {
    pub author_name: String,
    pub blog_title: String,
    pub blog: BlogCardView,
    pub text: String,
    pub created_at: String,
    pub updated_at: String,
    pub reactions: Vec<ReactionProfileView>,
    pub replies: Vec<ReplyReferenceView>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(untagged)]
pub enum CommentView {
    Reference(CommentReferenceView),
    Profile(CommentProfileView),
}

impl Render for Comment {
    type View = CommentView;

    fn render(&self, tables: &Tables, set: FieldSet) -> Result<CommentView, AppError> {
        match set {
            FieldSet::CommentReference => Ok(CommentView::Reference(CommentReferenceView {
                id: self.id,
                author: self.author,
                blog: self.blog,
                text: self.text.clone(),
                created_at: format_timestamp_with_zone(&self.created_at),
            })),
            FieldSet::CommentProfile => {
                let author = tables
                    .user(self.author)
                    .ok_or_else(|| dangling(ResourceKind::User, self.author))?;
                let blog = tables
                    .blog(self.blog)
                    .ok_or_else(|| dangling(ResourceKind::Blog, self.blog))?;
                Ok(CommentView::Profile(CommentProfileView {
                    author_name: author.username.clone(),
                    blog_title: blog.title.clone(),
                    blog: blog_card(tables, blog),
                    text: self.text.clone(),
                    created_at: format_timestamp_with_zone(&self.created_at),
                    updated_at: format_timestamp_with_zone(&self.updated_at),
                    reactions: tables
                        .reactions_to_comment(self.id)
                        .map(|reaction| reaction_profile(tables, reaction))
                        .collect(),
                    replies: tables.replies_to(self.id).map(reply_reference).collect(),
                }))
            }
            other => Err(unsupported(ResourceKind::Comment, other)),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReplyReferenceView {
    pub id: ReplyId,
    pub author: UserId,
    pub comment: CommentId,
    pub text: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReplyProfileView {
    pub author: UserId,
    pub comment: CommentId,
    pub text: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(untagged)]
pub enum ReplyView {
    Reference(ReplyReferenceView),
    Profile(ReplyProfileView),
}

fn reply_reference(reply: &Reply) -> ReplyReferenceView {
    ReplyReferenceView {
        id: reply.id,
        author: reply.author,
        comment: reply.comment,
        text: reply.text.clone(),
        created_at: format_timestamp(&reply.created_at),
        updated_at: format_timestamp(&reply.updated_at),
    }
}

impl Render for Reply {
    type View = ReplyView;

    fn render(&self, _tables: &Tables, set: FieldSet) -> Result<ReplyView, AppError> {
        match set {
            FieldSet::ReplyReference => Ok(ReplyView::Reference(reply_reference(self))),
            FieldSet::ReplyProfile => Ok(ReplyView::Profile(ReplyProfileView {
                author: self.author,
                comment: self.comment,
                text: self.text.clone(),
                created_at: format_timestamp(&self.created_at),
                updated_at: format_timestamp(&self.updated_at),
            })),
            other => Err(unsupported(ResourceKind::Reply, other)),
        }
    }
}
