use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use inkpost_core::models::{
    BlogWriteRequest, CategoryWriteRequest, CommentWriteRequest, LikeWriteRequest, LoginRequest,
    ReactionWriteRequest, ReplyWriteRequest, TagWriteRequest, UserWriteRequest,
};
use inkpost_core::validation::FieldErrors;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;
use utoipa_redoc::{Redoc, Servable};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::auth::resolve_principal;
use crate::api::handlers::blogs::*;
use crate::api::handlers::categories::*;
use crate::api::handlers::comments::*;
use crate::api::handlers::health::*;
use crate::api::handlers::likes::*;
use crate::api::handlers::login::*;
use crate::api::handlers::reactions::*;
use crate::api::handlers::replies::*;
use crate::api::handlers::tags::*;
use crate::api::handlers::users::*;
use crate::api::views::accounts::{
    UserAdminProfileView, UserBlogView, UserProfileView, UserView, UserWriteView,
};
use crate::api::views::blogs::{
    BlogCardView, BlogReferenceView, BlogView, CategoryBlogView, CategoryDetailView, CategoryView,
    CategoryWriteView,
};
use crate::api::views::discussion::{
    CommentProfileView, CommentReferenceView, CommentView, ReplyProfileView, ReplyReferenceView,
    ReplyView,
};
use crate::api::views::feedback::{
    LikeProfileView, LikeReferenceView, LikeView, ReactionProfileView, ReactionReferenceView,
    ReactionView,
};
use crate::api::views::tags::TagView;
use crate::app_state::SharedAppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        health_checker_handler,
        login_handler,
        list_users_handler,
        create_user_handler,
        retrieve_user_handler,
        update_user_handler,
        partial_update_user_handler,
        destroy_user_handler,
        list_categories_handler,
        create_category_handler,
        retrieve_category_handler,
        update_category_handler,
        partial_update_category_handler,
        destroy_category_handler,
        list_blogs_handler,
        list_author_blogs_handler,
        create_blog_handler,
        retrieve_blog_handler,
        update_blog_handler,
        partial_update_blog_handler,
        destroy_blog_handler,
        list_comments_handler,
        list_author_comments_handler,
        create_comment_handler,
        retrieve_comment_handler,
        update_comment_handler,
        partial_update_comment_handler,
        destroy_comment_handler,
        list_replies_handler,
        list_author_replies_handler,
        create_reply_handler,
        retrieve_reply_handler,
        update_reply_handler,
        partial_update_reply_handler,
        destroy_reply_handler,
        list_likes_handler,
        create_like_handler,
        retrieve_like_handler,
        update_like_handler,
        partial_update_like_handler,
        destroy_like_handler,
        list_reactions_handler,
        create_reaction_handler,
        retrieve_reaction_handler,
        update_reaction_handler,
        partial_update_reaction_handler,
        destroy_reaction_handler,
        list_tags_handler,
        create_tag_handler,
        retrieve_tag_handler,
        update_tag_handler,
        partial_update_tag_handler,
        destroy_tag_handler,
    ),
    components(
        schemas(
            LoginRequest, TokenResponse, FieldErrors,
            UserWriteRequest, UserView, UserWriteView,
            UserProfileView, UserAdminProfileView, UserBlogView,
            CategoryWriteRequest, CategoryView, CategoryDetailView,
            CategoryWriteView, CategoryBlogView,
            BlogWriteRequest, BlogView, BlogCardView, BlogReferenceView,
            CommentWriteRequest, CommentView, CommentReferenceView, CommentProfileView,
            ReplyWriteRequest, ReplyView, ReplyReferenceView, ReplyProfileView,
            LikeWriteRequest, LikeView, LikeReferenceView, LikeProfileView,
            ReactionWriteRequest, ReactionView, ReactionReferenceView, ReactionProfileView,
            TagWriteRequest, TagView,
        )
    ),
    tags(
        (name = "inkpost", description = "inkpost blogging api")
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearerAuth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            )
        }
    }
}

pub struct ApiRoutes;

impl ApiRoutes {
    pub fn create(state: SharedAppState) -> Router {
        let api = ApiDoc::openapi();

        let authenticated_router = Router::new()
            .route("/api/v1/users/", get(list_users_handler).post(create_user_handler))
            .route(
                "/api/v1/users/{id}/",
                get(retrieve_user_handler)
                    .put(update_user_handler)
                    .patch(partial_update_user_handler)
                    .delete(destroy_user_handler),
            )
            .route(
                "/api/v1/category/",
                get(list_categories_handler).post(create_category_handler),
            )
            .route(
                "/api/v1/category/{id}/",
                get(retrieve_category_handler)
                    .put(update_category_handler)
                    .patch(partial_update_category_handler)
                    .delete(destroy_category_handler),
            )
            .route("/api/v1/blog/", get(list_blogs_handler).post(create_blog_handler))
            .route("/api/v1/blog/author/{username}/", get(list_author_blogs_handler))
            .route(
                "/api/v1/blog/{id}/",
                get(retrieve_blog_handler)
                    .put(update_blog_handler)
                    .patch(partial_update_blog_handler)
                    .delete(destroy_blog_handler),
            )
            .route(
                "/api/v1/comment/",
                get(list_comments_handler).post(create_comment_handler),
            )
            .route(
                "/api/v1/comment/author/{username}/",
                get(list_author_comments_handler),
            )
            .route(
                "/api/v1/comment/{id}/",
                get(retrieve_comment_handler)
                    .put(update_comment_handler)
                    .patch(partial_update_comment_handler)
                    .delete(destroy_comment_handler),
            )
            .route("/api/v1/reply/", get(list_replies_handler).post(create_reply_handler))
            .route("/api/v1/reply/author/{username}/", get(list_author_replies_handler))
            .route(
                "/api/v1/reply/{id}/",
                get(retrieve_reply_handler)
                    .put(update_reply_handler)
                    .patch(partial_update_reply_handler)
                    .delete(destroy_reply_handler),
            )
            .route("/api/v1/like/", get(list_likes_handler).post(create_like_handler))
            .route("/api/v1/like/author/", get(list_likes_handler))
            .route(
                "/api/v1/like/{id}/",
                get(retrieve_like_handler)
                    .put(update_like_handler)
                    .patch(partial_update_like_handler)
                    .delete(destroy_like_handler),
            )
            .route(
                "/api/v1/reaction/",
                get(list_reactions_handler).post(create_reaction_handler),
            )
            .route("/api/v1/reaction/author/", get(list_reactions_handler))
            .route(
                "/api/v1/reaction/{id}/",
                get(retrieve_reaction_handler)
                    .put(update_reaction_handler)
                    .patch(partial_update_reaction_handler)
                    .delete(destroy_reaction_handler),
            )
            .route("/api/v1/tag/", get(list_tags_handler).post(create_tag_handler))
            .route(
                "/api/v1/tag/{id}/",
                get(retrieve_tag_handler)
                    .put(update_tag_handler)
                    .patch(partial_update_tag_handler)
                    .delete(destroy_tag_handler),
            )
            .route_layer(middleware::from_fn_with_state(
                state.clone(),
                resolve_principal,
            ));

        let public_router = Router::new()
            .route("/api/v1/login", post(login_handler))
            .route("/api/v1/health", get(health_checker_handler))
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api.clone()))
            .merge(Redoc::with_url("/redoc", api.clone()))
            .merge(RapiDoc::new("/api-docs/openapi.json").path("/rapidoc"));

        Router::new()
            .merge(authenticated_router)
            .merge(public_router)
            .layer(DefaultBodyLimit::max(state.settings.api.body_limit))
            .with_state(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_documents_every_resource() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        for path in [
            "/api/v1/login",
            "/api/v1/users/{id}/",
            "/api/v1/category/",
            "/api/v1/blog/author/{username}/",
            "/api/v1/comment/author/{username}/",
            "/api/v1/reply/{id}/",
            "/api/v1/like/",
            "/api/v1/reaction/{id}/",
            "/api/v1/tag/",
        ] {
            assert!(paths.iter().any(|p| *p == path), "missing {path}");
        }
        let components = doc.components.unwrap();
        assert!(components.security_schemes.contains_key("bearerAuth"));
    }
}
