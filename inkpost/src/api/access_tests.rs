use axum::http::{header, HeaderValue, Method, StatusCode};
use serde_json::{json, Value};

use crate::api::test_utils::TestApp;

/// Every route with a method and a body that would be valid for an admin
fn every_action(blog: i64, comment: i64, category: i64) -> Vec<(Method, String, Option<Value>)> {
    vec![
        (Method::GET, "/api/v1/users/".into(), None),
        (Method::POST, "/api/v1/users/".into(), Some(json!({"username": "zoe", "password": "pw"}))),
        (Method::GET, "/api/v1/users/2/".into(), None),
        (Method::PATCH, "/api/v1/users/2/".into(), Some(json!({"first_name": "Al"}))),
        (Method::GET, "/api/v1/category/".into(), None),
        (Method::POST, "/api/v1/category/".into(), Some(json!({"name": "Fresh"}))),
        (Method::GET, format!("/api/v1/category/{category}/"), None),
        (Method::PUT, format!("/api/v1/category/{category}/"), Some(json!({"name": "Renamed"}))),
        (Method::GET, "/api/v1/blog/".into(), None),
        (Method::GET, "/api/v1/blog/author/alice/".into(), None),
        (Method::POST, "/api/v1/blog/".into(), Some(json!({"title": "New", "category": category}))),
        (Method::GET, format!("/api/v1/blog/{blog}/"), None),
        (Method::PATCH, format!("/api/v1/blog/{blog}/"), Some(json!({"title": "Edited"}))),
        (Method::GET, "/api/v1/comment/".into(), None),
        (Method::GET, "/api/v1/comment/author/alice/".into(), None),
        (Method::POST, "/api/v1/comment/".into(), Some(json!({"blog": blog, "text": "hi"}))),
        (Method::GET, format!("/api/v1/comment/{comment}/"), None),
        (Method::PATCH, format!("/api/v1/comment/{comment}/"), Some(json!({"text": "edited"}))),
        (Method::GET, "/api/v1/reply/".into(), None),
        (Method::GET, "/api/v1/reply/author/alice/".into(), None),
        (Method::POST, "/api/v1/reply/".into(), Some(json!({"comment": comment, "text": "re"}))),
        (Method::GET, "/api/v1/like/".into(), None),
        (Method::GET, "/api/v1/like/author/".into(), None),
        (Method::POST, "/api/v1/like/".into(), Some(json!({"blog": blog}))),
        (Method::GET, "/api/v1/reaction/".into(), None),
        (Method::GET, "/api/v1/reaction/author/?username=alice".into(), None),
        (
            Method::POST,
            "/api/v1/reaction/".into(),
            Some(json!({"blog": blog, "comment": comment, "reaction_type": "WOW"})),
        ),
        (Method::GET, "/api/v1/tag/".into(), None),
        (
            Method::POST,
            "/api/v1/tag/".into(),
            Some(json!({"name": "rust", "blogs": [blog], "comments": [comment]})),
        ),
        (Method::DELETE, format!("/api/v1/comment/{comment}/"), None),
        (Method::DELETE, format!("/api/v1/blog/{blog}/"), None),
        (Method::DELETE, format!("/api/v1/category/{category}/"), None),
        (Method::DELETE, "/api/v1/users/2/".into(), None),
    ]
}

async fn seeded() -> (TestApp, i64, i64, i64) {
    let app = TestApp::new().await;
    let alice = app.user("alice").await;
    let category = app.category("News").await;
    let blog = app.blog(&alice, "First post", category).await;
    let comment = app.comment(&alice, blog, "first!").await;
    (app, blog, comment, category)
}

#[tokio::test]
async fn test_anonymous_callers_get_401_everywhere() {
    let (app, blog, comment, category) = seeded().await;

    for (method, path, body) in every_action(blog, comment, category) {
        let mut request = app.server.method(method.clone(), &path);
        if let Some(body) = &body {
            request = request.json(body);
        }
        let response = request.await;
        assert_eq!(
            response.status_code(),
            StatusCode::UNAUTHORIZED,
            "{method} {path}"
        );
        assert_eq!(
            response.json::<Value>(),
            json!({"error": true, "message": "Authentication credentials were not provided."})
        );
    }
}

#[tokio::test]
async fn test_admin_succeeds_everywhere() {
    let (app, blog, comment, category) = seeded().await;
    let admin = app.admin();

    for (method, path, body) in every_action(blog, comment, category) {
        let mut request = app
            .server
            .method(method.clone(), &path)
            .add_header(header::AUTHORIZATION, admin.bearer());
        if let Some(body) = &body {
            request = request.json(body);
        }
        let response = request.await;
        assert!(
            response.status_code().is_success(),
            "{method} {path}: {} {}",
            response.status_code(),
            response.text()
        );
    }
}

#[tokio::test]
async fn test_unknown_token_is_rejected() {
    let app = TestApp::new().await;
    let response = app
        .server
        .get("/api/v1/blog/")
        .add_header(header::AUTHORIZATION, HeaderValue::from_static("Bearer nope"))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>()["message"], "Invalid token.");
}

#[tokio::test]
async fn test_token_scheme_is_accepted() {
    let app = TestApp::new().await;
    app.user("alice").await;
    let response = app
        .server
        .get("/api/v1/blog/")
        .add_header(header::AUTHORIZATION, HeaderValue::from_static("Token alice-token"))
        .await;
    response.assert_status_ok();
}

#[tokio::test]
async fn test_members_cannot_touch_foreign_content() {
    let (app, blog, comment, _) = seeded().await;
    let alice_token = "alice-token";
    let bob = app.user("bob").await;

    let reply = app
        .server
        .post("/api/v1/reply/")
        .add_header(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {alice_token}")).unwrap(),
        )
        .json(&json!({"comment": comment, "text": "thanks"}))
        .await
        .json::<Value>()["id"]
        .as_i64()
        .unwrap();

    let foreign = [
        (format!("/api/v1/blog/{blog}/"), json!({"title": "Hijacked"})),
        (format!("/api/v1/comment/{comment}/"), json!({"text": "hijacked"})),
        (format!("/api/v1/reply/{reply}/"), json!({"text": "hijacked"})),
    ];
    for (path, body) in &foreign {
        app.server
            .patch(path)
            .add_header(header::AUTHORIZATION, bob.bearer())
            .json(body)
            .await
            .assert_status(StatusCode::FORBIDDEN);
        app.server
            .delete(path)
            .add_header(header::AUTHORIZATION, bob.bearer())
            .await
            .assert_status(StatusCode::FORBIDDEN);
        // reading is fine
        app.server
            .get(path)
            .add_header(header::AUTHORIZATION, bob.bearer())
            .await
            .assert_status_ok();
    }

    // bob can create his own content on alice's blog
    let like = app
        .server
        .post("/api/v1/like/")
        .add_header(header::AUTHORIZATION, bob.bearer())
        .json(&json!({"blog": blog}))
        .await;
    like.assert_status(StatusCode::CREATED);
    assert_eq!(like.json::<Value>()["author"], bob.id);
}

#[tokio::test]
async fn test_ownership_is_checked_before_the_body_is_read() {
    let (app, blog, comment, category) = seeded().await;
    let bob = app.user("bob").await;
    let admin = app.admin();

    let patch = |path: String, token: HeaderValue| {
        app.server
            .patch(&path)
            .add_header(header::AUTHORIZATION, token)
            .content_type("application/json")
            .bytes("{not json".into())
    };

    for path in [
        format!("/api/v1/blog/{blog}/"),
        format!("/api/v1/comment/{comment}/"),
        format!("/api/v1/category/{category}/"),
    ] {
        patch(path.clone(), bob.bearer())
            .await
            .assert_status(StatusCode::FORBIDDEN);
        // the owner or an admin gets to the body
        patch(path, admin.bearer())
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    for path in [
        "/api/v1/blog/999/",
        "/api/v1/comment/999/",
        "/api/v1/reply/999/",
        "/api/v1/like/999/",
        "/api/v1/reaction/999/",
        "/api/v1/category/999/",
        "/api/v1/tag/999/",
    ] {
        patch(path.to_string(), admin.bearer())
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}

#[tokio::test]
async fn test_members_cannot_manage_categories_tags_or_accounts() {
    let (app, _, _, category) = seeded().await;
    let bob = app.user("bob").await;

    let denied = [
        (Method::POST, "/api/v1/category/".to_string()),
        (Method::DELETE, format!("/api/v1/category/{category}/")),
        (Method::GET, "/api/v1/tag/".to_string()),
        (Method::GET, "/api/v1/users/".to_string()),
        (Method::DELETE, format!("/api/v1/users/{}/", bob.id)),
        (Method::GET, "/api/v1/users/2/".to_string()),
    ];
    for (method, path) in denied {
        let response = app
            .server
            .method(method.clone(), &path)
            .add_header(header::AUTHORIZATION, bob.bearer())
            .json(&json!({"name": "x"}))
            .await;
        assert_eq!(response.status_code(), StatusCode::FORBIDDEN, "{method} {path}");
    }

    // categories are readable by everyone signed in
    app.server
        .get("/api/v1/category/")
        .add_header(header::AUTHORIZATION, bob.bearer())
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_only_the_author_edits_a_blog() {
    let app = TestApp::new().await;
    let alice = app.user("alice").await;
    let bob = app.user("bob").await;
    let category = app.category("News").await;
    let blog = app.blog(&alice, "Alice writes", category).await;
    let path = format!("/api/v1/blog/{blog}/");

    app.server
        .patch(&path)
        .add_header(header::AUTHORIZATION, bob.bearer())
        .json(&json!({"title": "Bob was here"}))
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let response = app
        .server
        .patch(&path)
        .add_header(header::AUTHORIZATION, alice.bearer())
        .json(&json!({"title": "Alice edits"}))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["title"], "Alice edits");

    let reread = app
        .server
        .get(&path)
        .add_header(header::AUTHORIZATION, bob.bearer())
        .await;
    assert_eq!(reread.json::<Value>()["title"], "Alice edits");
}

#[tokio::test]
async fn test_missing_objects_are_404_after_access_checks() {
    let app = TestApp::new().await;
    let bob = app.user("bob").await;

    for path in ["/api/v1/blog/999/", "/api/v1/comment/abc/", "/api/v1/like/0/"] {
        app.server
            .get(path)
            .add_header(header::AUTHORIZATION, bob.bearer())
            .await
            .assert_status(StatusCode::NOT_FOUND);
        app.server
            .get(path)
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }
    // tags are admin only, so members never learn whether one exists
    app.server
        .get("/api/v1/tag/999/")
        .add_header(header::AUTHORIZATION, bob.bearer())
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_health_and_login_are_public() {
    let app = TestApp::new().await;
    app.server.get("/api/v1/health").await.assert_status_ok();
    app.server
        .post("/api/v1/login")
        .json(&json!({"username": "admin", "password": "admin-password"}))
        .await
        .assert_status_ok();
}
