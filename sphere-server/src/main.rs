use std::sync::Arc;

use anyhow::Result;

mod application;
mod data;
mod infrastructure;
mod presentation;
mod server;

use application::auth_service::AuthService;
use application::comment_service::CommentService;
use application::post_service::PostService;
use data::repositories::postgres::comment_repository::PgCommentRepository;
use data::repositories::postgres::post_repository::PgPostRepository;
use data::repositories::postgres::user_repository::PgUserRepository;
use infrastructure::database::{create_pool, run_migrations};
use infrastructure::jwt::JwtService;
use infrastructure::logging::init_logging;
use infrastructure::settings::Settings;
use presentation::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let settings = Settings::from_env()?;

    init_logging(&settings.log_level)?;

    let pool = create_pool(&settings.database_url).await?;
    run_migrations(&pool).await?;

    let jwt = Arc::new(JwtService::new(
        &settings.jwt_secret,
        settings.jwt_ttl_seconds,
    ));
    let auth_service = Arc::new(AuthService::new(
        PgUserRepository::new(pool.clone()),
        jwt.clone(),
    ));
    let posts = Arc::new(PostService::new(PgPostRepository::new(pool.clone())));
    let comments = Arc::new(CommentService::new(PgCommentRepository::new(pool)));

    let settings = Arc::new(settings);
    let state = AppState::new(auth_service, posts, comments, jwt, settings.clone());

    server::run_http(&settings, state).await
}
