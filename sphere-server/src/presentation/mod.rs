use std::sync::Arc;

use crate::application::auth_service::AuthService;
use crate::application::comment_service::CommentService;
use crate::application::post_service::PostService;
use crate::data::repositories::postgres::comment_repository::PgCommentRepository;
use crate::data::repositories::postgres::post_repository::PgPostRepository;
use crate::data::repositories::postgres::user_repository::PgUserRepository;
use crate::infrastructure::jwt::JwtService;
use crate::infrastructure::settings::Settings;

pub(crate) mod app_error;
pub(crate) mod handlers;
pub(crate) mod middleware;
pub(crate) mod openapi;
pub(crate) mod routes;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) auth_service: Arc<AuthService<PgUserRepository>>,
    pub(crate) posts: Arc<PostService<PgPostRepository>>,
    pub(crate) comments: Arc<CommentService<PgCommentRepository>>,
    pub(crate) jwt: Arc<JwtService>,
    pub(crate) settings: Arc<Settings>,
}

impl AppState {
    pub(crate) fn new(
        auth_service: Arc<AuthService<PgUserRepository>>,
        posts: Arc<PostService<PgPostRepository>>,
        comments: Arc<CommentService<PgCommentRepository>>,
        jwt: Arc<JwtService>,
        settings: Arc<Settings>,
    ) -> Self {
        Self {
            auth_service,
            posts,
            comments,
            jwt,
            settings,
        }
    }
}
