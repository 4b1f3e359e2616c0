use axum::Router;
use axum::routing::get;
use tower_http::services::ServeDir;

use super::AppState;

pub(crate) mod auth;
pub(crate) mod comments;
pub(crate) mod posts;
pub(crate) mod uploads;

pub(crate) fn router(state: AppState) -> Router<AppState> {
    let uploads_dir = state.settings.uploads_dir.clone();

    Router::new()
        .nest("/api/auth", auth::router())
        .nest("/api/posts", posts::router(state.clone()))
        .nest("/api/comments", comments::router(state.clone()))
        .nest("/api/uploads", uploads::router(state))
        .nest_service("/uploads", ServeDir::new(uploads_dir))
        .route("/healthz", get(healthz))
}

async fn healthz() -> &'static str {
    "ok"
}
