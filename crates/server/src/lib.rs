pub mod handler;
pub mod middleware;

use std::sync::Arc;

use axum::{Router, middleware as axum_mw};
use chattrace_core::config::{Config, CorsConfig};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::middleware::request_context::ContextPlugin;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub plugins: Arc<Vec<Box<dyn ContextPlugin>>>,
}

pub fn build_router(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config.cors);

    // Compose routes, then middleware layers (inner → outer): trusted host,
    // CORS, request logging, then the context middleware outermost so every
    // downstream log statement sees a populated context.
    Router::new()
        .route("/health", axum::routing::get(handler::health::health))
        .route("/chat/{chat_id}", axum::routing::get(handler::chat::chat))
        .layer(axum_mw::from_fn_with_state(
            state.clone(),
            middleware::trusted_host::trusted_host_middleware,
        ))
        .layer(cors)
        .layer(axum_mw::from_fn(
            middleware::request_logging::request_logging_middleware,
        ))
        .layer(axum_mw::from_fn_with_state(
            state.clone(),
            middleware::request_context::request_context_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Builds the CORS layer from the configured origin allow-list.
///
/// A wildcard `"*"` in the origins list allows any origin. Methods and
/// headers mirror the request: `tower-http` rejects `Any` combined with
/// `allow_credentials(true)`, and mirroring yields the same effective
/// allow-everything policy.
fn build_cors_layer(cors: &CorsConfig) -> CorsLayer {
    let allow_origin = if cors.allowed_origins.iter().any(|o| o == "*") {
        AllowOrigin::mirror_request()
    } else {
        let parsed: Vec<_> = cors
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        AllowOrigin::list(parsed)
    };

    let layer = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request());

    if cors.allow_credentials {
        layer.allow_credentials(true)
    } else {
        layer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_cors_layer_with_default_origins() {
        let _cors = build_cors_layer(&CorsConfig::default());
    }

    #[test]
    fn test_build_cors_layer_wildcard() {
        let cors = CorsConfig {
            allowed_origins: vec!["*".to_string()],
            allow_credentials: true,
        };
        let _cors = build_cors_layer(&cors);
    }

    #[test]
    fn test_build_cors_layer_without_credentials() {
        let cors = CorsConfig {
            allowed_origins: vec!["https://example.com".to_string()],
            allow_credentials: false,
        };
        let _cors = build_cors_layer(&cors);
    }
}
