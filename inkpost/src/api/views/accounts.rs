use inkpost_core::authorization::{ResourceKind, UserId};
use inkpost_core::models::User;
use inkpost_core::representation::FieldSet;
use inkpost_core::utils::format::format_rfc3339;
use serde::Serialize;
use utoipa::ToSchema;

use super::unsupported;
use crate::api::error::AppError;
use crate::store::Tables;

/// Echo of an account write. The password is the plaintext the caller sent
/// and only appears when one was sent.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserWriteView {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserBlogView {
    pub title: String,
    pub description: String,
    pub posted_at: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserProfileView {
    pub id: UserId,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub last_login: Option<String>,
    pub deletable: bool,
    pub blogs_amount: usize,
    pub blogs: Vec<UserBlogView>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserAdminProfileView {
    #[serde(flatten)]
    pub profile: UserProfileView,
    pub is_active: bool,
    pub is_staff: bool,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(untagged)]
pub enum UserView {
    Write(UserWriteView),
    AdminProfile(UserAdminProfileView),
    Profile(UserProfileView),
}

fn profile(tables: &Tables, user: &User) -> UserProfileView {
    let blogs: Vec<UserBlogView> = tables
        .blogs_of(user.id)
        .map(|blog| UserBlogView {
            title: blog.title.clone(),
            description: blog.description.clone(),
            posted_at: format_rfc3339(&blog.posted_at),
        })
        .collect();

    UserProfileView {
        id: user.id,
        username: user.username.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        email: user.email.clone(),
        last_login: user.last_login.as_ref().map(format_rfc3339),
        deletable: user.deletable(),
        blogs_amount: blogs.len(),
        blogs,
    }
}

pub fn render_user(
    tables: &Tables,
    user: &User,
    set: FieldSet,
    password: Option<&str>,
) -> Result<UserView, AppError> {
    let view = match set {
        FieldSet::UserCreate | FieldSet::UserUpdate => UserView::Write(UserWriteView {
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            password: password.map(str::to_string),
        }),
        FieldSet::UserProfile => UserView::Profile(profile(tables, user)),
        FieldSet::UserAdminProfile => UserView::AdminProfile(UserAdminProfileView {
            profile: profile(tables, user),
            is_active: user.is_active(),
            is_staff: user.is_staff,
        }),
        other => return Err(unsupported(ResourceKind::User, other)),
    };
    Ok(view)
}
