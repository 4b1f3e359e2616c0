use axum::Router;
use axum::middleware;
use axum::routing::{get, post, put};

use crate::presentation::AppState;
use crate::presentation::handlers::comments::{
    create_comment, delete_comment, list_comments, toggle_comment_like, update_comment,
    update_comment_emoji,
};
use crate::presentation::middleware::auth::jwt_auth_middleware;

pub(crate) fn router(state: AppState) -> Router<AppState> {
    let public = Router::new().route("/", get(list_comments));

    let protected = Router::new()
        .route("/", post(create_comment))
        .route("/{id}", put(update_comment).delete(delete_comment))
        .route("/{id}/emoji", put(update_comment_emoji))
        .route("/{id}/like", post(toggle_comment_like))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_middleware,
        ));

    public.merge(protected)
}
