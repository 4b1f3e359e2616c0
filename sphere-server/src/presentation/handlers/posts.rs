use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use sphere_core::{CreatePost, MessageResponse, Post, UpdatePost};

use crate::presentation::AppState;
use crate::presentation::app_error::AppResult;
use crate::presentation::middleware::auth::AuthenticatedUser;

#[derive(Debug, Deserialize, IntoParams)]
pub(crate) struct ListPostsQuery {
    /// Restricts the listing to one author.
    pub(crate) author_id: Option<Uuid>,
}

#[utoipa::path(
    get,
    path = "/api/posts",
    tag = "posts",
    params(ListPostsQuery),
    responses(
        (status = 200, description = "Posts listed", body = [Post]),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<ListPostsQuery>,
) -> AppResult<Json<Vec<Post>>> {
    let posts = match query.author_id {
        Some(author_id) => state.posts.list_by_author(author_id).await?,
        None => state.posts.list().await?,
    };
    Ok(Json(posts))
}

#[utoipa::path(
    get,
    path = "/api/posts/mine",
    tag = "posts",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller's posts listed", body = [Post]),
        (status = 401, description = "Authentication required", body = sphere_core::ErrorBody),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn list_my_posts(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
) -> AppResult<Json<Vec<Post>>> {
    let posts = state.posts.list_by_author(auth.user_id).await?;
    Ok(Json(posts))
}

#[utoipa::path(
    get,
    path = "/api/posts/{id}",
    tag = "posts",
    params(("id" = Uuid, Path, description = "Post id")),
    responses(
        (status = 200, description = "Post found", body = Post),
        (status = 404, description = "Post not found", body = sphere_core::ErrorBody),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Post>> {
    let post = state.posts.get(id).await?;
    Ok(Json(post))
}

#[utoipa::path(
    post,
    path = "/api/posts",
    tag = "posts",
    security(("bearer_auth" = [])),
    request_body = CreatePost,
    responses(
        (status = 200, description = "Post created", body = Post),
        (status = 400, description = "Validation error", body = sphere_core::ErrorBody),
        (status = 401, description = "Authentication required", body = sphere_core::ErrorBody),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn create_post(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<CreatePost>,
) -> AppResult<Json<Post>> {
    let post = state.posts.create(auth.user_id, req).await?;
    Ok(Json(post))
}

#[utoipa::path(
    put,
    path = "/api/posts/{id}",
    tag = "posts",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Post id")),
    request_body = UpdatePost,
    responses(
        (status = 200, description = "Post updated", body = Post),
        (status = 400, description = "Validation error", body = sphere_core::ErrorBody),
        (status = 401, description = "Not the owner", body = sphere_core::ErrorBody),
        (status = 404, description = "Post not found", body = sphere_core::ErrorBody),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn update_post(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdatePost>,
) -> AppResult<Json<Post>> {
    let post = state.posts.update(auth.user_id, id, req).await?;
    Ok(Json(post))
}

#[utoipa::path(
    delete,
    path = "/api/posts/{id}",
    tag = "posts",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Post id")),
    responses(
        (status = 200, description = "Post removed", body = MessageResponse),
        (status = 401, description = "Not the owner", body = sphere_core::ErrorBody),
        (status = 404, description = "Post not found", body = sphere_core::ErrorBody),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn delete_post(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    state.posts.delete(auth.user_id, id).await?;
    Ok(Json(MessageResponse::new("Post removed")))
}

#[utoipa::path(
    post,
    path = "/api/posts/{id}/like",
    tag = "posts",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Post id")),
    responses(
        (status = 200, description = "Like toggled", body = Post),
        (status = 401, description = "Authentication required", body = sphere_core::ErrorBody),
        (status = 404, description = "Post not found", body = sphere_core::ErrorBody),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn toggle_post_like(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Post>> {
    let post = state.posts.toggle_like(auth.user_id, id).await?;
    Ok(Json(post))
}
