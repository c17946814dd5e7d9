use chrono::Utc;
use inkpost_core::authorization::UserId;
use inkpost_core::models::{BlogId, CommentId, Like, LikeId, Reaction, ReactionId, ReactionType};
use inkpost_core::validation::FieldErrors;

use super::{check_pks, StoreError, StoreResult, Tables};

/// Fields of a reaction that a write may change
#[derive(Debug, Clone, Default)]
pub struct ReactionChanges {
    pub blog: Option<BlogId>,
    pub comment: Option<CommentId>,
    pub reaction_type: Option<ReactionType>,
}

impl Tables {
    pub fn like(&self, id: LikeId) -> Option<&Like> {
        self.likes.get(&id)
    }

    pub fn likes(&self) -> impl Iterator<Item = &Like> {
        self.likes.values()
    }

    pub fn insert_like(&mut self, author: UserId, blog: BlogId) -> StoreResult<Like> {
        let mut errors = FieldErrors::new();
        check_pks(&mut errors, "blog", &[blog], &self.blogs);
        errors.into_result()?;

        let like = Like {
            id: self.like_ids.next_id(),
            author,
            blog,
            created_at: Utc::now(),
        };
        self.likes.insert(like.id, like.clone());
        Ok(like)
    }

    pub fn update_like(&mut self, id: LikeId, blog: Option<BlogId>) -> StoreResult<Like> {
        if !self.likes.contains_key(&id) {
            return Err(StoreError::NotFound);
        }
        if let Some(blog) = blog {
            let mut errors = FieldErrors::new();
            check_pks(&mut errors, "blog", &[blog], &self.blogs);
            errors.into_result()?;
        }
        let like = self.likes.get_mut(&id).ok_or(StoreError::NotFound)?;
        if let Some(blog) = blog {
            like.blog = blog;
        }
        Ok(like.clone())
    }

    pub fn delete_like(&mut self, id: LikeId) -> StoreResult<()> {
        self.likes.remove(&id).ok_or(StoreError::NotFound)?;
        Ok(())
    }

    pub fn reaction(&self, id: ReactionId) -> Option<&Reaction> {
        self.reactions.get(&id)
    }

    pub fn reactions(&self) -> impl Iterator<Item = &Reaction> {
        self.reactions.values()
    }

    pub fn reactions_to_comment(&self, comment: CommentId) -> impl Iterator<Item = &Reaction> {
        self.reactions
            .values()
            .filter(move |reaction| reaction.comment == Some(comment))
    }

    fn check_reaction_targets(
        &self,
        blog: Option<BlogId>,
        comment: Option<CommentId>,
    ) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if let Some(blog) = blog {
            check_pks(&mut errors, "blog", &[blog], &self.blogs);
        }
        if let Some(comment) = comment {
            check_pks(&mut errors, "comment", &[comment], &self.comments);
        }
        errors
    }

    pub fn insert_reaction(
        &mut self,
        author: UserId,
        blog: BlogId,
        comment: CommentId,
        reaction_type: ReactionType,
    ) -> StoreResult<Reaction> {
        self.check_reaction_targets(Some(blog), Some(comment))
            .into_result()?;

        let reaction = Reaction {
            id: self.reaction_ids.next_id(),
            author,
            blog: Some(blog),
            comment: Some(comment),
            reaction_type,
            given_at: Utc::now(),
        };
        self.reactions.insert(reaction.id, reaction.clone());
        Ok(reaction)
    }

    pub fn update_reaction(
        &mut self,
        id: ReactionId,
        changes: ReactionChanges,
    ) -> StoreResult<Reaction> {
        if !self.reactions.contains_key(&id) {
            return Err(StoreError::NotFound);
        }
        self.check_reaction_targets(changes.blog, changes.comment)
            .into_result()?;

        let reaction = self.reactions.get_mut(&id).ok_or(StoreError::NotFound)?;
        if let Some(blog) = changes.blog {
            reaction.blog = Some(blog);
        }
        if let Some(comment) = changes.comment {
            reaction.comment = Some(comment);
        }
        if let Some(reaction_type) = changes.reaction_type {
            reaction.reaction_type = reaction_type;
        }
        Ok(reaction.clone())
    }

    pub fn delete_reaction(&mut self, id: ReactionId) -> StoreResult<()> {
        self.reactions.remove(&id).ok_or(StoreError::NotFound)?;
        Ok(())
    }
}
