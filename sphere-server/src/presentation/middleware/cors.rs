use anyhow::{Context, Result};
use axum::Router;
use axum::http::{HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::infrastructure::settings::Settings;

const WILDCARD: &str = "*";

fn allowed_origins(origins: &[String]) -> Result<AllowOrigin> {
    if origins.iter().any(|origin| origin == WILDCARD) {
        return Ok(AllowOrigin::any());
    }

    let parsed = origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .with_context(|| format!("invalid CORS origin {origin:?}"))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(AllowOrigin::list(parsed))
}

pub(crate) fn apply_cors(router: Router, settings: &Settings) -> Result<Router> {
    // PATCH в API нет, частичные обновления идут через PUT;
    // раздача /uploads обходится обычными GET.
    let cors = CorsLayer::new()
        .allow_origin(allowed_origins(&settings.cors_origins)?)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT]);
    Ok(router.layer(cors))
}

#[cfg(test)]
mod tests {
    use super::allowed_origins;

    #[test]
    fn wildcard_short_circuits_origin_parsing() {
        let origins = vec!["*".to_string(), "not a header\nvalue".to_string()];
        assert!(allowed_origins(&origins).is_ok());
    }

    #[test]
    fn malformed_origin_is_a_startup_error() {
        let origins = vec![
            "http://localhost:8000".to_string(),
            "bad\norigin".to_string(),
        ];
        assert!(allowed_origins(&origins).is_err());
    }
}
