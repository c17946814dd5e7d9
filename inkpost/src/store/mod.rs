//! In-memory tables behind a single lock
//!
//! Every handler takes the lock once per request, so a write and the
//! representation rendered from it see the same state.

use std::collections::BTreeMap;
use std::sync::Arc;

use inkpost_core::authorization::UserId;
use inkpost_core::models::{
    Blog, BlogId, Category, CategoryId, Comment, CommentId, Like, LikeId, Reaction, ReactionId,
    Reply, ReplyId, Tag, TagId, User,
};
use inkpost_core::validation::FieldErrors;
use thiserror::Error;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

pub mod accounts;
pub mod blogs;
pub mod discussion;
pub mod feedback;
pub mod tags;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Not found.")]
    NotFound,

    #[error("Invalid data: {0}")]
    Invalid(FieldErrors),
}

impl From<FieldErrors> for StoreError {
    fn from(errors: FieldErrors) -> Self {
        StoreError::Invalid(errors)
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Monotonic id generator, ids are never reused
#[derive(Debug, Clone, Default)]
pub struct IdSequence(i64);

impl IdSequence {
    pub fn next_id(&mut self) -> i64 {
        self.0 += 1;
        self.0
    }
}

#[derive(Debug, Default)]
pub struct Tables {
    pub(crate) users: BTreeMap<UserId, User>,
    /// Issued API tokens and the account they authenticate
    pub(crate) tokens: BTreeMap<String, UserId>,
    pub(crate) categories: BTreeMap<CategoryId, Category>,
    pub(crate) blogs: BTreeMap<BlogId, Blog>,
    pub(crate) comments: BTreeMap<CommentId, Comment>,
    pub(crate) replies: BTreeMap<ReplyId, Reply>,
    pub(crate) likes: BTreeMap<LikeId, Like>,
    pub(crate) reactions: BTreeMap<ReactionId, Reaction>,
    pub(crate) tags: BTreeMap<TagId, Tag>,

    user_ids: IdSequence,
    category_ids: IdSequence,
    blog_ids: IdSequence,
    comment_ids: IdSequence,
    reply_ids: IdSequence,
    like_ids: IdSequence,
    reaction_ids: IdSequence,
    tag_ids: IdSequence,
}

#[derive(Debug, Clone, Default)]
pub struct Store {
    tables: Arc<RwLock<Tables>>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().await
    }

    pub async fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().await
    }
}

/// Collect the ids in `ids` that do not exist in `table`, as field errors.
pub(crate) fn check_pks<V>(
    errors: &mut FieldErrors,
    field: &str,
    ids: &[i64],
    table: &BTreeMap<i64, V>,
) {
    for id in ids {
        if !table.contains_key(id) {
            errors.add(field, inkpost_core::validation::unknown_pk_message(*id));
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequences_are_per_table() {
        let mut tables = Tables::default();
        assert_eq!(tables.user_ids.next_id(), 1);
        assert_eq!(tables.user_ids.next_id(), 2);
        assert_eq!(tables.blog_ids.next_id(), 1);
    }

    #[tokio::test]
    async fn test_write_is_visible_to_next_read() {
        let store = Store::new();
        {
            let mut tables = store.write().await;
            fixtures::user(&mut tables, "alice");
        }
        let tables = store.read().await;
        assert!(tables.user_by_username("alice").is_some());
    }
}
