use axum::Router;
use axum::http::Request;
use tower_http::trace::TraceLayer;
use tracing::info_span;

/// Спан на каждый HTTP-запрос: метод и путь видны в сообщениях
/// обработчиков без повторного логирования вручную.
pub(crate) fn apply_trace(router: Router) -> Router {
    router.layer(
        TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
            info_span!(
                "http",
                method = %request.method(),
                path = %request.uri().path(),
            )
        }),
    )
}
