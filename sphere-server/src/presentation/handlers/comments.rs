use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use sphere_core::{
    Comment, CreateComment, MessageResponse, UpdateCommentContent, UpdateCommentEmoji,
};

use crate::presentation::AppState;
use crate::presentation::app_error::AppResult;
use crate::presentation::middleware::auth::AuthenticatedUser;

#[derive(Debug, Deserialize, IntoParams)]
pub(crate) struct ListCommentsQuery {
    pub(crate) post_id: Uuid,
    /// Exact emoji to keep, or `all` for no filtering.
    pub(crate) emoji: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/comments",
    tag = "comments",
    params(ListCommentsQuery),
    responses(
        (status = 200, description = "Comments listed", body = [Comment]),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn list_comments(
    State(state): State<AppState>,
    Query(query): Query<ListCommentsQuery>,
) -> AppResult<Json<Vec<Comment>>> {
    let comments = state.comments.list(query.post_id, query.emoji).await?;
    Ok(Json(comments))
}

#[utoipa::path(
    post,
    path = "/api/comments",
    tag = "comments",
    security(("bearer_auth" = [])),
    request_body = CreateComment,
    responses(
        (status = 200, description = "Comment created", body = Comment),
        (status = 400, description = "Validation error", body = sphere_core::ErrorBody),
        (status = 401, description = "Authentication required", body = sphere_core::ErrorBody),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn create_comment(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<CreateComment>,
) -> AppResult<Json<Comment>> {
    let comment = state.comments.create(auth.user_id, req).await?;
    Ok(Json(comment))
}

#[utoipa::path(
    put,
    path = "/api/comments/{id}",
    tag = "comments",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Comment id")),
    request_body = UpdateCommentContent,
    responses(
        (status = 200, description = "Comment updated", body = Comment),
        (status = 400, description = "Validation error", body = sphere_core::ErrorBody),
        (status = 401, description = "Not the owner", body = sphere_core::ErrorBody),
        (status = 404, description = "Comment not found", body = sphere_core::ErrorBody),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn update_comment(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateCommentContent>,
) -> AppResult<Json<Comment>> {
    let comment = state.comments.update_content(auth.user_id, id, req).await?;
    Ok(Json(comment))
}

#[utoipa::path(
    put,
    path = "/api/comments/{id}/emoji",
    tag = "comments",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Comment id")),
    request_body = UpdateCommentEmoji,
    responses(
        (status = 200, description = "Emoji updated", body = Comment),
        (status = 400, description = "Validation error", body = sphere_core::ErrorBody),
        (status = 401, description = "Not the owner", body = sphere_core::ErrorBody),
        (status = 404, description = "Comment not found", body = sphere_core::ErrorBody),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn update_comment_emoji(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateCommentEmoji>,
) -> AppResult<Json<Comment>> {
    let comment = state.comments.update_emoji(auth.user_id, id, req).await?;
    Ok(Json(comment))
}

#[utoipa::path(
    delete,
    path = "/api/comments/{id}",
    tag = "comments",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Comment id")),
    responses(
        (status = 200, description = "Comment removed", body = MessageResponse),
        (status = 401, description = "Not the owner", body = sphere_core::ErrorBody),
        (status = 404, description = "Comment not found", body = sphere_core::ErrorBody),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn delete_comment(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    state.comments.delete(auth.user_id, id).await?;
    Ok(Json(MessageResponse::new("Comment removed")))
}

#[utoipa::path(
    post,
    path = "/api/comments/{id}/like",
    tag = "comments",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Comment id")),
    responses(
        (status = 200, description = "Like toggled", body = Comment),
        (status = 401, description = "Authentication required", body = sphere_core::ErrorBody),
        (status = 404, description = "Comment not found", body = sphere_core::ErrorBody),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn toggle_comment_like(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Comment>> {
    let comment = state.comments.toggle_like(auth.user_id, id).await?;
    Ok(Json(comment))
}
