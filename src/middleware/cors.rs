//! CORS policy for browser clients.
//!
//! - Development: any origin, no credentials.
//! - Production: exact-match allowlist from `CORS_ALLOWED_ORIGINS`; an empty
//!   allowlist emits no CORS headers at all.
//!
//! Never combine a wildcard origin with `allow_credentials(true)`.

use std::time::Duration;

use axum::Router;
use axum::http::{HeaderName, HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::config::AppEnv;
use crate::middleware::http::REQUEST_ID_HEADER;

pub fn apply(router: Router, app_env: AppEnv, allowed_origins: &[String]) -> Router {
    router.layer(layer(app_env, allowed_origins))
}

fn layer(app_env: AppEnv, allowed_origins: &[String]) -> CorsLayer {
    let base = if app_env.is_production() {
        let allowed: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect();

        CorsLayer::new().allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _req| allowed.iter().any(|v| v == origin),
        ))
    } else {
        CorsLayer::new().allow_origin(Any)
    };

    base.allow_methods([
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ])
    .allow_headers([
        header::AUTHORIZATION,
        header::CONTENT_TYPE,
        header::ACCEPT,
        HeaderName::from_static(REQUEST_ID_HEADER),
    ])
    .expose_headers([HeaderName::from_static(REQUEST_ID_HEADER)])
    .max_age(Duration::from_secs(60 * 10))
}
