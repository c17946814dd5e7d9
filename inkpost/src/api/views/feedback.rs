use inkpost_core::authorization::{ResourceKind, UserId};
use inkpost_core::models::{BlogId, CommentId, Like, LikeId, Reaction, ReactionId, ReactionType};
use inkpost_core::representation::FieldSet;
use inkpost_core::utils::format::{format_rfc3339, format_timestamp};
use serde::Serialize;
use utoipa::ToSchema;

use super::blogs::{blog_card, BlogCardView};
use super::{dangling, unsupported, Render};
use crate::api::error::AppError;
use crate::store::Tables;

#[derive(Debug, Serialize, ToSchema)]
pub struct LikeReferenceView {
    pub id: LikeId,
    pub author: UserId,
    pub blog: BlogId,
    pub created_at: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LikeProfileView {
    pub author: UserId,
    pub blog: BlogCardView,
    pub created_at: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(untagged)]
pub enum LikeView {
    Reference(LikeReferenceView),
    Profile(LikeProfileView),
}

impl Render for Like {
    type View = LikeView;

    fn render(&self, tables: &Tables, set: FieldSet) -> Result<LikeView, AppError> {
        match set {
            FieldSet::LikeReference => Ok(LikeView::Reference(LikeReferenceView {
                id: self.id,
                author: self.author,
                blog: self.blog,
                created_at: format_timestamp(&self.created_at),
            })),
            FieldSet::LikeProfile => {
                let blog = tables
                    .blog(self.blog)
                    .ok_or_else(|| dangling(ResourceKind::Blog, self.blog))?;
                Ok(LikeView::Profile(LikeProfileView {
                    author: self.author,
                    blog: blog_card(tables, blog),
                    created_at: format_timestamp(&self.created_at),
                }))
            }
            other => Err(unsupported(ResourceKind::Like, other)),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReactionReferenceView {
    pub id: ReactionId,
    pub author: UserId,
    pub blog: Option<BlogId>,
    pub comment: Option<CommentId>,
    pub reaction_type: ReactionType,
    pub given_at: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReactionProfileView {
    pub author: UserId,
    /// `null` once the blog was deleted
    pub blog: Option<BlogCardView>,
    pub comment: Option<CommentId>,
    pub reaction_type: ReactionType,
    pub given_at: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(untagged)]
pub enum ReactionView {
    Reference(ReactionReferenceView),
    Profile(ReactionProfileView),
}

pub fn reaction_profile(tables: &Tables, reaction: &Reaction) -> ReactionProfileView {
    ReactionProfileView {
        author: reaction.author,
        blog: reaction
            .blog
            .and_then(|id| tables.blog(id))
            .map(|blog| blog_card(tables, blog)),
        comment: reaction.comment,
        reaction_type: reaction.reaction_type,
        given_at: format_rfc3339(&reaction.given_at),
    }
}

impl Render for Reaction {
    type View = ReactionView;

    fn render(&self, tables: &Tables, set: FieldSet) -> Result<ReactionView, AppError> {
        match set {
            FieldSet::ReactionReference => Ok(ReactionView::Reference(ReactionReferenceView {
                id: self.id,
                author: self.author,
                blog: self.blog,
                comment: self.comment,
                reaction_type: self.reaction_type,
                given_at: format_rfc3339(&self.given_at),
            })),
            FieldSet::ReactionProfile => Ok(ReactionView::Profile(reaction_profile(tables, self))),
            other => Err(unsupported(ResourceKind::Reaction, other)),
        }
    }
}
