use chrono::Utc;
use inkpost_core::authorization::UserId;
use inkpost_core::models::{BlogId, Comment, CommentId, Reply, ReplyId};
use inkpost_core::validation::{unknown_pk_message, FieldErrors};

use super::{StoreError, StoreResult, Tables};

impl Tables {
    pub fn comment(&self, id: CommentId) -> Option<&Comment> {
        self.comments.get(&id)
    }

    pub fn comments(&self) -> impl Iterator<Item = &Comment> {
        self.comments.values()
    }

    fn check_blog_exists(&self, blog: BlogId) -> FieldErrors {
        if self.blogs.contains_key(&blog) {
            FieldErrors::new()
        } else {
            FieldErrors::single("blog", unknown_pk_message(blog))
        }
    }

    fn check_comment_exists(&self, field: &str, comment: CommentId) -> FieldErrors {
        if self.comments.contains_key(&comment) {
            FieldErrors::new()
        } else {
            FieldErrors::single(field, unknown_pk_message(comment))
        }
    }

    pub fn insert_comment(
        &mut self,
        author: UserId,
        blog: BlogId,
        text: String,
    ) -> StoreResult<Comment> {
        self.check_blog_exists(blog).into_result()?;
        let now = Utc::now();
        let comment = Comment {
            id: self.comment_ids.next_id(),
            author,
            blog,
            text,
            created_at: now,
            updated_at: now,
        };
        self.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    pub fn update_comment(
        &mut self,
        id: CommentId,
        blog: Option<BlogId>,
        text: Option<String>,
    ) -> StoreResult<Comment> {
        if !self.comments.contains_key(&id) {
            return Err(StoreError::NotFound);
        }
        if let Some(blog) = blog {
            self.check_blog_exists(blog).into_result()?;
        }
        let comment = self.comments.get_mut(&id).ok_or(StoreError::NotFound)?;
        if let Some(blog) = blog {
            comment.blog = blog;
        }
        if let Some(text) = text {
            comment.text = text;
        }
        comment.updated_at = Utc::now();
        Ok(comment.clone())
    }

    /// Removes the comment and its replies. Reactions lose their comment
    /// reference, tags forget the comment.
    pub fn delete_comment(&mut self, id: CommentId) -> StoreResult<()> {
        self.comments.remove(&id).ok_or(StoreError::NotFound)?;
        self.replies.retain(|_, reply| reply.comment != id);
        for reaction in self.reactions.values_mut() {
            if reaction.comment == Some(id) {
                reaction.comment = None;
            }
        }
        for tag in self.tags.values_mut() {
            tag.comments.remove(&id);
        }
        Ok(())
    }

    pub fn reply(&self, id: ReplyId) -> Option<&Reply> {
        self.replies.get(&id)
    }

    pub fn replies(&self) -> impl Iterator<Item = &Reply> {
        self.replies.values()
    }

    pub fn replies_to(&self, comment: CommentId) -> impl Iterator<Item = &Reply> {
        self.replies
            .values()
            .filter(move |reply| reply.comment == comment)
    }

    pub fn insert_reply(
        &mut self,
        author: UserId,
        comment: CommentId,
        text: String,
    ) -> StoreResult<Reply> {
        self.check_comment_exists("comment", comment).into_result()?;
        let now = Utc::now();
        let reply = Reply {
            id: self.reply_ids.next_id(),
            author,
            comment,
            text,
            created_at: now,
            updated_at: now,
        };
        self.replies.insert(reply.id, reply.clone());
        Ok(reply)
    }

    pub fn update_reply(
        &mut self,
        id: ReplyId,
        comment: Option<CommentId>,
        text: Option<String>,
    ) -> StoreResult<Reply> {
        if !self.replies.contains_key(&id) {
            return Err(StoreError::NotFound);
        }
        if let Some(comment) = comment {
            self.check_comment_exists("comment", comment).into_result()?;
        }
        let reply = self.replies.get_mut(&id).ok_or(StoreError::NotFound)?;
        if let Some(comment) = comment {
            reply.comment = comment;
        }
        if let Some(text) = text {
            reply.text = text;
        }
        reply.updated_at = Utc::now();
        Ok(reply.clone())
    }

    pub fn delete_reply(&mut self, id: ReplyId) -> StoreResult<()> {
        self.replies.remove(&id).ok_or(StoreError::NotFound)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::blogs::BlogDraft;
    use crate::store::fixtures;

    #[test]
    fn test_comment_needs_existing_blog() {
        let mut tables = Tables::default();
        let alice = fixtures::user(&mut tables, "alice");
        let err = tables
            .insert_comment(alice.id, 7, "hello".to_string())
            .unwrap_err();
        assert_eq!(
            err,
            StoreError::Invalid(FieldErrors::single(
                "blog",
                "Invalid pk \"7\" - object does not exist."
            ))
        );
    }

    #[test]
    fn test_deleting_comment_removes_only_its_replies() {
        let mut tables = Tables::default();
        let alice = fixtures::user(&mut tables, "alice");
        let category = tables.insert_category("News".to_string()).unwrap();
        let blog = tables
            .insert_blog(
                alice.id,
                BlogDraft {
                    title: "Post".to_string(),
                    description: String::new(),
                    category: category.id,
                    is_public: true,
                },
            )
            .unwrap();
        let first = tables
            .insert_comment(alice.id, blog.id, "first".to_string())
            .unwrap();
        let second = tables
            .insert_comment(alice.id, blog.id, "second".to_string())
            .unwrap();
        tables
            .insert_reply(alice.id, first.id, "re: first".to_string())
            .unwrap();
        let kept = tables
            .insert_reply(alice.id, second.id, "re: second".to_string())
            .unwrap();

        tables.delete_comment(first.id).unwrap();

        let remaining: Vec<_> = tables.replies().map(|reply| reply.id).collect();
        assert_eq!(remaining, vec![kept.id]);
        assert_eq!(tables.replies_to(second.id).count(), 1);
    }
}
