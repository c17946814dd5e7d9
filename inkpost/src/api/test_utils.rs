//! Shared helpers for the HTTP level tests

use axum::http::{header, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::{json, Value};

use crate::app_state::{AppState, SharedAppState};
use crate::http::build_app;
use crate::services::credentials::hash_password;
use crate::settings::config::Settings;
use crate::store::accounts::NewUser;

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin-password";
pub const ADMIN_TOKEN: &str = "static-admin-token-0123456789";

/// Settings with a bootstrap admin and a cheap bcrypt cost
pub fn test_settings() -> Settings {
    serde_json::from_value(json!({
        "api": {
            "bind_address": "127.0.0.1:0",
            "body_limit": 65536,
            "password_hash_cost": 4,
        },
        "pagination": {
            "category_page_size": 5,
            "blog_page_size": 10,
        },
        "moderation": {
            "denylist": ["badword1", "badword2"],
        },
        "bootstrap": {
            "admin_username": ADMIN_USERNAME,
            "admin_password": ADMIN_PASSWORD,
            "admin_email": "admin@example.com",
            "admin_token": ADMIN_TOKEN,
        },
    }))
    .expect("test settings deserialize")
}

pub async fn create_test_app_state() -> SharedAppState {
    AppState::with_settings(test_settings())
        .await
        .expect("Failed to create app state for test")
}

pub struct TestApp {
    pub state: SharedAppState,
    pub server: TestServer,
}

impl TestApp {
    pub async fn new() -> Self {
        let state = create_test_app_state().await;
        let server = TestServer::new(build_app(state.clone(), false)).unwrap();
        TestApp { state, server }
    }

    /// Account with an issued token, no login round trip needed
    pub async fn user(&self, username: &str) -> TestUser {
        let credential = hash_password(&format!("{username}-password"), 4).unwrap();
        let mut tables = self.state.store.write().await;
        let user = tables
            .insert_user(NewUser {
                username: username.to_string(),
                first_name: String::new(),
                last_name: String::new(),
                email: format!("{username}@example.com"),
                credential,
                is_staff: false,
            })
            .unwrap();
        let token = format!("{username}-token");
        tables.issue_token(user.id, token.clone());
        TestUser {
            id: user.id,
            token,
        }
    }

    pub fn admin(&self) -> TestUser {
        TestUser {
            id: 1,
            token: ADMIN_TOKEN.to_string(),
        }
    }

    pub async fn category(&self, name: &str) -> i64 {
        let response = self
            .server
            .post("/api/v1/category/")
            .add_header(header::AUTHORIZATION, self.admin().bearer())
            .json(&json!({ "name": name }))
            .await;
        response.assert_status(StatusCode::CREATED);
        response.json::<Value>()["id"].as_i64().unwrap()
    }

    pub async fn blog(&self, owner: &TestUser, title: &str, category: i64) -> i64 {
        let response = self
            .server
            .post("/api/v1/blog/")
            .add_header(header::AUTHORIZATION, owner.bearer())
            .json(&json!({ "title": title, "description": "Lorem ipsum", "category": category }))
            .await;
        response.assert_status(StatusCode::CREATED);
        response.json::<Value>()["id"].as_i64().unwrap()
    }

    pub async fn comment(&self, owner: &TestUser, blog: i64, text: &str) -> i64 {
        let response = self
            .server
            .post("/api/v1/comment/")
            .add_header(header::AUTHORIZATION, owner.bearer())
            .json(&json!({ "blog": blog, "text": text }))
            .await;
        response.assert_status(StatusCode::CREATED);
        response.json::<Value>()["id"].as_i64().unwrap()
    }
}

pub struct TestUser {
    pub id: i64,
    pub token: String,
}

impl TestUser {
    pub fn bearer(&self) -> HeaderValue {
        HeaderValue::from_str(&format!("Bearer {}", self.token)).unwrap()
    }
}
