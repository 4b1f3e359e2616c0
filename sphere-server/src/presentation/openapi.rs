use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use sphere_core::{
    AuthResponse, Author, Comment, CreateComment, CreatePost, ErrorBody, Like, Login,
    MessageResponse, Post, Register, UpdateCommentContent, UpdateCommentEmoji, UpdatePost,
    UploadResponse,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::handlers::auth::register,
        crate::presentation::handlers::auth::login,
        crate::presentation::handlers::posts::list_posts,
        crate::presentation::handlers::posts::list_my_posts,
        crate::presentation::handlers::posts::get_post,
        crate::presentation::handlers::posts::create_post,
        crate::presentation::handlers::posts::update_post,
        crate::presentation::handlers::posts::delete_post,
        crate::presentation::handlers::posts::toggle_post_like,
        crate::presentation::handlers::comments::list_comments,
        crate::presentation::handlers::comments::create_comment,
        crate::presentation::handlers::comments::update_comment,
        crate::presentation::handlers::comments::update_comment_emoji,
        crate::presentation::handlers::comments::delete_comment,
        crate::presentation::handlers::comments::toggle_comment_like,
        crate::presentation::handlers::uploads::upload_image,
        crate::presentation::handlers::uploads::upload_video
    ),
    components(
        schemas(
            Register,
            Login,
            AuthResponse,
            Author,
            MessageResponse,
            Post,
            CreatePost,
            UpdatePost,
            Like,
            Comment,
            CreateComment,
            UpdateCommentContent,
            UpdateCommentEmoji,
            UploadResponse,
            ErrorBody
        )
    ),
    tags(
        (name = "auth", description = "Authentication endpoints"),
        (name = "posts", description = "Post endpoints"),
        (name = "comments", description = "Comment endpoints"),
        (name = "uploads", description = "Media upload endpoints")
    ),
    modifiers(&SecurityAddon)
)]
pub(crate) struct ApiDoc;

pub(crate) struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let mut components = openapi.components.take().unwrap_or_default();
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
        openapi.components = Some(components);
    }
}
