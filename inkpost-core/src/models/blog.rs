use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::authorization::{Authored, UserId};

pub type CategoryId = i64;
pub type BlogId = i64;

pub const CATEGORY_NAME_MAX_LENGTH: usize = 30;
pub const BLOG_TITLE_MAX_LENGTH: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blog {
    pub id: BlogId,
    pub author: UserId,
    pub title: String,
    pub description: String,
    pub category: Option<CategoryId>,
    /// Refreshed on every save
    pub posted_at: DateTime<Utc>,
    pub is_public: bool,
    pub slug: String,
}

impl Authored for Blog {
    fn author(&self) -> UserId {
        self.author
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct CategoryWriteRequest {
    #[validate(length(max = 30, message = "Ensure this field has no more than 30 characters."))]
    pub name: Option<String>,
}

/// Body of blog writes. The author is always the caller, an `author` field in
/// the payload is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct BlogWriteRequest {
    #[validate(length(max = 50, message = "Ensure this field has no more than 50 characters."))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<CategoryId>,
    pub is_public: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_length_limit() {
        let request = BlogWriteRequest {
            title: Some("x".repeat(BLOG_TITLE_MAX_LENGTH + 1)),
            ..Default::default()
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("title"));

        let request = CategoryWriteRequest {
            name: Some("x".repeat(CATEGORY_NAME_MAX_LENGTH)),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_author_in_payload_is_ignored() {
        let request: BlogWriteRequest =
            serde_json::from_str(r#"{"title": "t", "author": 42, "category": 1}"#).unwrap();
        assert_eq!(request.title.as_deref(), Some("t"));
        assert_eq!(request.category, Some(1));
    }
}
