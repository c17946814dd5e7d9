use inkpost_core::models::{BlogId, CommentId, Tag, TagId};
use inkpost_core::validation::{unique_message, FieldErrors};

use super::{check_pks, StoreError, StoreResult, Tables};

#[derive(Debug, Clone, Default)]
pub struct TagChanges {
    pub name: Option<String>,
    /// Replaces the whole set when present
    pub blogs: Option<Vec<BlogId>>,
    pub comments: Option<Vec<CommentId>>,
}

impl Tables {
    pub fn tag(&self, id: TagId) -> Option<&Tag> {
        self.tags.get(&id)
    }

    pub fn tags(&self) -> impl Iterator<Item = &Tag> {
        self.tags.values()
    }

    fn check_tag(
        &self,
        name: Option<&str>,
        blogs: &[BlogId],
        comments: &[CommentId],
        except: Option<TagId>,
    ) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if let Some(name) = name {
            let taken = self
                .tags
                .values()
                .any(|tag| tag.name == name && Some(tag.id) != except);
            if taken {
                errors.add("name", unique_message("Tag", "name"));
            }
        }
        check_pks(&mut errors, "blogs", blogs, &self.blogs);
        check_pks(&mut errors, "comments", comments, &self.comments);
        errors
    }

    pub fn insert_tag(
        &mut self,
        name: String,
        blogs: Vec<BlogId>,
        comments: Vec<CommentId>,
    ) -> StoreResult<Tag> {
        self.check_tag(Some(&name), &blogs, &comments, None)
            .into_result()?;
        let tag = Tag {
            id: self.tag_ids.next_id(),
            name,
            blogs: blogs.into_iter().collect(),
            comments: comments.into_iter().collect(),
        };
        self.tags.insert(tag.id, tag.clone());
        Ok(tag)
    }

    pub fn update_tag(&mut self, id: TagId, changes: TagChanges) -> StoreResult<Tag> {
        if !self.tags.contains_key(&id) {
            return Err(StoreError::NotFound);
        }
        self.check_tag(
            changes.name.as_deref(),
            changes.blogs.as_deref().unwrap_or_default(),
            changes.comments.as_deref().unwrap_or_default(),
            Some(id),
        )
        .into_result()?;

        let tag = self.tags.get_mut(&id).ok_or(StoreError::NotFound)?;
        if let Some(name) = changes.name {
            tag.name = name;
        }
        if let Some(blogs) = changes.blogs {
            tag.blogs = blogs.into_iter().collect();
        }
        if let Some(comments) = changes.comments {
            tag.comments = comments.into_iter().collect();
        }
        Ok(tag.clone())
    }

    pub fn delete_tag(&mut self, id: TagId) -> StoreResult<()> {
        self.tags.remove(&id).ok_or(StoreError::NotFound)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_references_must_exist() {
        let mut tables = Tables::default();
        let err = tables
            .insert_tag("rust".to_string(), vec![4], vec![5, 6])
            .unwrap_err();
        let StoreError::Invalid(errors) = err else {
            panic!("expected validation error");
        };
        assert_eq!(errors.get("blogs").unwrap().len(), 1);
        assert_eq!(errors.get("comments").unwrap().len(), 2);
    }

    #[test]
    fn test_tag_names_are_unique() {
        let mut tables = Tables::default();
        let tag = tables.insert_tag("rust".to_string(), vec![], vec![]).unwrap();
        tables.insert_tag("go".to_string(), vec![], vec![]).unwrap();

        let changes = TagChanges {
            name: Some("go".to_string()),
            ..Default::default()
        };
        let err = tables.update_tag(tag.id, changes).unwrap_err();
        assert_eq!(
            err,
            StoreError::Invalid(FieldErrors::single(
                "name",
                "Tag with this name already exists."
            ))
        );
    }
}
