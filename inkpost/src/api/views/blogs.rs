use inkpost_core::authorization::{ResourceKind, UserId};
use inkpost_core::models::{Blog, BlogId, Category, CategoryId};
use inkpost_core::representation::FieldSet;
use inkpost_core::utils::format::{format_rfc3339, format_timestamp};
use serde::Serialize;
use utoipa::ToSchema;

use super::{dangling, unsupported, Render};
use crate::api::error::AppError;
use crate::store::Tables;

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryBlogView {
    pub id: BlogId,
    pub title: String,
    pub description: String,
    pub posted_at: String,
    /// Username of the author
    pub author: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryDetailView {
    pub id: CategoryId,
    pub name: String,
    pub blogs: Vec<CategoryBlogView>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryWriteView {
    pub id: CategoryId,
    pub name: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(untagged)]
pub enum CategoryView {
    Detail(CategoryDetailView),
    Write(CategoryWriteView),
}

impl Render for Category {
    type View = CategoryView;

    fn render(&self, tables: &Tables, set: FieldSet) -> Result<CategoryView, AppError> {
        match set {
            FieldSet::CategoryDetail => {
                let blogs = tables
                    .blogs_in_category(self.id)
                    .map(|blog| {
                        let author = tables
                            .user(blog.author)
                            .ok_or_else(|| dangling(ResourceKind::User, blog.author))?;
                        Ok(CategoryBlogView {
                            id: blog.id,
                            title: blog.title.clone(),
                            description: blog.description.clone(),
                            posted_at: format_rfc3339(&blog.posted_at),
                            author: author.username.clone(),
                        })
                    })
                    .collect::<Result<Vec<_>, AppError>>()?;
                Ok(CategoryView::Detail(CategoryDetailView {
                    id: self.id,
                    name: self.name.clone(),
                    blogs,
                }))
            }
            FieldSet::CategoryWrite => Ok(CategoryView::Write(CategoryWriteView {
                id: self.id,
                name: self.name.clone(),
            })),
            other => Err(unsupported(ResourceKind::Category, other)),
        }
    }
}

/// Blog as shown in listings and nested in other resources
#[derive(Debug, Serialize, ToSchema)]
pub struct BlogCardView {
    pub id: BlogId,
    pub category_name: Option<String>,
    pub title: String,
    pub description: String,
    pub is_public: bool,
    pub posted_at: String,
    pub len_blog_title: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BlogReferenceView {
    pub id: BlogId,
    pub title: String,
    pub description: String,
    pub author: UserId,
    pub category: Option<CategoryId>,
    pub is_public: bool,
    pub posted_at: String,
    pub slug: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(untagged)]
pub enum BlogView {
    Card(BlogCardView),
    Reference(BlogReferenceView),
}

pub fn blog_card(tables: &Tables, blog: &Blog) -> BlogCardView {
    BlogCardView {
        id: blog.id,
        category_name: blog
            .category
            .and_then(|id| tables.category(id))
            .map(|category| category.name.clone()),
        title: blog.title.clone(),
        description: blog.description.clone(),
        is_public: blog.is_public,
        posted_at: format_rfc3339(&blog.posted_at),
        len_blog_title: blog.title.chars().count(),
    }
}

impl Render for Blog {
    type View = BlogView;

    fn render(&self, tables: &Tables, set: FieldSet) -> Result<BlogView, AppError> {
        match set {
            FieldSet::BlogCard => Ok(BlogView::Card(blog_card(tables, self))),
            FieldSet::BlogReference => Ok(BlogView::Reference(BlogReferenceView {
                id: self.id,
                title: self.title.clone(),
                description: self.description.clone(),
                author: self.author,
                category: self.category,
                is_public: self.is_public,
                posted_at: format_timestamp(&self.posted_at),
                slug: self.slug.clone(),
            })),
            other => Err(unsupported(ResourceKind::Blog, other)),
        }
    }
}
