use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::post;

use sphere_core::upload::UploadKind;

use crate::presentation::AppState;
use crate::presentation::handlers::uploads::{upload_image, upload_video};
use crate::presentation::middleware::auth::jwt_auth_middleware;

pub(crate) fn router(state: AppState) -> Router<AppState> {
    // Multipart framing overhead on top of the largest allowed payload.
    let body_limit = UploadKind::Video.max_bytes() as usize + 1024 * 1024;

    Router::new()
        .route("/image", post(upload_image))
        .route("/video", post(upload_video))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(middleware::from_fn_with_state(state, jwt_auth_middleware))
}
