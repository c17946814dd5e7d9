use chrono::Utc;
use inkpost_core::authorization::UserId;
use inkpost_core::models::{Blog, BlogId, Category, CategoryId};
use inkpost_core::utils::slugify::blog_slug;
use inkpost_core::validation::{unique_message, unknown_pk_message, FieldErrors};
use tracing::debug;

use super::{StoreError, StoreResult, Tables};

#[derive(Debug, Clone)]
pub struct BlogDraft {
    pub title: String,
    pub description: String,
    pub category: CategoryId,
    pub is_public: bool,
}

#[derive(Debug, Clone, Default)]
pub struct BlogChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<CategoryId>,
    pub is_public: Option<bool>,
}

impl Tables {
    pub fn category(&self, id: CategoryId) -> Option<&Category> {
        self.categories.get(&id)
    }

    pub fn categories(&self) -> impl Iterator<Item = &Category> {
        self.categories.values()
    }

    pub fn blogs_in_category(&self, id: CategoryId) -> impl Iterator<Item = &Blog> {
        self.blogs
            .values()
            .filter(move |blog| blog.category == Some(id))
    }

    fn check_category_name(&self, name: &str, except: Option<CategoryId>) -> FieldErrors {
        let taken = self
            .categories
            .values()
            .any(|category| category.name == name && Some(category.id) != except);
        if taken {
            FieldErrors::single("name", unique_message("Category", "name"))
        } else {
            FieldErrors::new()
        }
    }

    pub fn insert_category(&mut self, name: String) -> StoreResult<Category> {
        self.check_category_name(&name, None).into_result()?;
        let category = Category {
            id: self.category_ids.next_id(),
            name,
        };
        self.categories.insert(category.id, category.clone());
        Ok(category)
    }

    pub fn update_category(
        &mut self,
        id: CategoryId,
        name: Option<String>,
    ) -> StoreResult<Category> {
        if !self.categories.contains_key(&id) {
            return Err(StoreError::NotFound);
        }
        if let Some(name) = &name {
            self.check_category_name(name, Some(id)).into_result()?;
        }
        let category = self.categories.get_mut(&id).ok_or(StoreError::NotFound)?;
        if let Some(name) = name {
            category.name = name;
        }
        Ok(category.clone())
    }

    /// Blogs of the category stay, without a category
    pub fn delete_category(&mut self, id: CategoryId) -> StoreResult<()> {
        self.categories.remove(&id).ok_or(StoreError::NotFound)?;
        for blog in self.blogs.values_mut() {
            if blog.category == Some(id) {
                blog.category = None;
            }
        }
        Ok(())
    }

    pub fn blog(&self, id: BlogId) -> Option<&Blog> {
        self.blogs.get(&id)
    }

    pub fn blogs(&self) -> impl Iterator<Item = &Blog> {
        self.blogs.values()
    }

    pub fn blogs_of(&self, author: UserId) -> impl Iterator<Item = &Blog> {
        self.blogs.values().filter(move |blog| blog.author == author)
    }

    fn check_blog(
        &self,
        title: Option<&str>,
        category: Option<CategoryId>,
        except: Option<BlogId>,
    ) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if let Some(title) = title {
            let taken = self
                .blogs
                .values()
                .any(|blog| blog.title == title && Some(blog.id) != except);
            if taken {
                errors.add("title", unique_message("Blog", "title"));
            }
        }
        if let Some(category) = category {
            if !self.categories.contains_key(&category) {
                errors.add("category", unknown_pk_message(category));
            }
        }
        errors
    }

    pub fn insert_blog(&mut self, author: UserId, draft: BlogDraft) -> StoreResult<Blog> {
        self.check_blog(Some(&draft.title), Some(draft.category), None)
            .into_result()?;

        let username = self
            .users
            .get(&author)
            .map(|user| user.username.as_str())
            .ok_or(StoreError::NotFound)?;
        let category_name = self
            .categories
            .get(&draft.category)
            .map(|category| category.name.as_str());
        let slug = blog_slug(&draft.title, username, category_name);

        let blog = Blog {
            id: self.blog_ids.next_id(),
            author,
            title: draft.title,
            description: draft.description,
            category: Some(draft.category),
            posted_at: Utc::now(),
            is_public: draft.is_public,
            slug,
        };
        debug!("Created blog {} with slug {}", blog.id, blog.slug);
        self.blogs.insert(blog.id, blog.clone());
        Ok(blog)
    }

    /// Applies the changes and refreshes `posted_at`. The slug is kept.
    pub fn update_blog(&mut self, id: BlogId, changes: BlogChanges) -> StoreResult<Blog> {
        if !self.blogs.contains_key(&id) {
            return Err(StoreError::NotFound);
        }
        self.check_blog(changes.title.as_deref(), changes.category, Some(id))
            .into_result()?;

        let blog = self.blogs.get_mut(&id).ok_or(StoreError::NotFound)?;
        if let Some(title) = changes.title {
            blog.title = title;
        }
        if let Some(description) = changes.description {
            blog.description = description;
        }
        if let Some(category) = changes.category {
            blog.category = Some(category);
        }
        if let Some(is_public) = changes.is_public {
            blog.is_public = is_public;
        }
        blog.posted_at = Utc::now();
        Ok(blog.clone())
    }

    /// Removes the blog with its comments, their replies and its likes.
    /// Reactions lose their blog reference, tags forget the blog.
    pub fn delete_blog(&mut self, id: BlogId) -> StoreResult<()> {
        self.blogs.remove(&id).ok_or(StoreError::NotFound)?;

        let comments: Vec<_> = self
            .comments
            .values()
            .filter(|comment| comment.blog == id)
            .map(|comment| comment.id)
            .collect();
        for comment in comments {
            self.delete_comment(comment)?;
        }

        self.likes.retain(|_, like| like.blog != id);
        for reaction in self.reactions.values_mut() {
            if reaction.blog == Some(id) {
                reaction.blog = None;
            }
        }
        for tag in self.tags.values_mut() {
            tag.blogs.remove(&id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::fixtures;
    use inkpost_core::models::ReactionType;
    use inkpost_core::utils::slugify::SLUG_SUFFIX_LEN;

    fn draft(title: &str, category: CategoryId) -> BlogDraft {
        BlogDraft {
            title: title.to_string(),
            description: "Lorem ipsum".to_string(),
            category,
            is_public: true,
        }
    }

    #[test]
    fn test_slug_is_built_from_title_author_and_category() {
        let mut tables = Tables::default();
        let alice = fixtures::user(&mut tables, "alice");
        let category = tables.insert_category("Rust Tips".to_string()).unwrap();

        let blog = tables
            .insert_blog(alice.id, draft("Hello World", category.id))
            .unwrap();
        let prefix = "hello-world-alice-rust-tips";
        assert!(blog.slug.starts_with(prefix), "slug was {}", blog.slug);
        assert_eq!(blog.slug.len(), prefix.len() + SLUG_SUFFIX_LEN);

        let updated = tables
            .update_blog(
                blog.id,
                BlogChanges {
                    title: Some("Another title".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.slug, blog.slug);
        assert!(updated.posted_at >= blog.posted_at);
    }

    #[test]
    fn test_blog_title_unique_and_category_must_exist() {
        let mut tables = Tables::default();
        let alice = fixtures::user(&mut tables, "alice");
        let category = tables.insert_category("News".to_string()).unwrap();
        tables.insert_blog(alice.id, draft("Taken", category.id)).unwrap();

        let err = tables
            .insert_blog(alice.id, draft("Taken", category.id + 1))
            .unwrap_err();
        let StoreError::Invalid(errors) = err else {
            panic!("expected validation error");
        };
        assert_eq!(
            errors.get("title").unwrap(),
            ["Blog with this title already exists."]
        );
        assert_eq!(
            errors.get("category").unwrap(),
            ["Invalid pk \"2\" - object does not exist."]
        );
    }

    #[test]
    fn test_deleting_category_keeps_blogs() {
        let mut tables = Tables::default();
        let alice = fixtures::user(&mut tables, "alice");
        let category = tables.insert_category("News".to_string()).unwrap();
        let blog = tables.insert_blog(alice.id, draft("Post", category.id)).unwrap();

        tables.delete_category(category.id).unwrap();
        assert_eq!(tables.blog(blog.id).unwrap().category, None);
        assert_eq!(tables.delete_category(category.id), Err(StoreError::NotFound));
    }

    #[test]
    fn test_deleting_blog_cascades() {
        let mut tables = Tables::default();
        let alice = fixtures::user(&mut tables, "alice");
        let category = tables.insert_category("News".to_string()).unwrap();
        let blog = tables.insert_blog(alice.id, draft("Post", category.id)).unwrap();
        let comment = tables
            .insert_comment(alice.id, blog.id, "first".to_string())
            .unwrap();
        tables
            .insert_reply(alice.id, comment.id, "second".to_string())
            .unwrap();
        tables.insert_like(alice.id, blog.id).unwrap();
        let reaction = tables
            .insert_reaction(alice.id, blog.id, comment.id, ReactionType::Love)
            .unwrap();
        let tag = tables
            .insert_tag("rust".to_string(), vec![blog.id], vec![comment.id])
            .unwrap();

        tables.delete_blog(blog.id).unwrap();

        assert!(tables.comments().next().is_none());
        assert!(tables.replies().next().is_none());
        assert!(tables.likes().next().is_none());
        let reaction = tables.reaction(reaction.id).unwrap();
        assert_eq!(reaction.blog, None);
        assert_eq!(reaction.comment, None);
        let tag = tables.tag(tag.id).unwrap();
        assert!(tag.blogs.is_empty());
        assert!(tag.comments.is_empty());
    }
}
