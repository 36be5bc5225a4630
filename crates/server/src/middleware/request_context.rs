//! Context-populating middleware and its extractor plugins.
//!
//! Plugins form a plain ordered list; each may contribute one value to the
//! request context. The middleware runs them before the rest of the pipeline
//! and wraps `next.run` in a context scope, so the context exists for every
//! downstream log statement and is released on all exit paths.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use chattrace_core::context::{self, CHAT_ID_KEY, REQUEST_ID_KEY, RequestContext};

use crate::AppState;

/// One unit of context extraction: may produce a value for its fixed key.
/// Extraction failure is silent degradation, never an error.
#[async_trait::async_trait]
pub trait ContextPlugin: Send + Sync {
    fn key(&self) -> &'static str;

    async fn process_request(&self, request: &Request) -> Option<String>;
}

/// Extracts the chat identifier from the final path segment. An empty path
/// or empty final segment yields no identifier.
pub struct ChatIdPlugin;

#[async_trait::async_trait]
impl ContextPlugin for ChatIdPlugin {
    fn key(&self) -> &'static str {
        CHAT_ID_KEY
    }

    async fn process_request(&self, request: &Request) -> Option<String> {
        last_path_segment(request.uri().path())
    }
}

/// Stamps every request with a UUID v4 correlation id.
pub struct RequestIdPlugin;

#[async_trait::async_trait]
impl ContextPlugin for RequestIdPlugin {
    fn key(&self) -> &'static str {
        REQUEST_ID_KEY
    }

    async fn process_request(&self, _request: &Request) -> Option<String> {
        Some(uuid::Uuid::new_v4().to_string())
    }
}

/// The default plugin list, in extraction order.
pub fn default_plugins() -> Vec<Box<dyn ContextPlugin>> {
    vec![Box::new(ChatIdPlugin), Box::new(RequestIdPlugin)]
}

/// Middleware that populates a fresh `RequestContext` from the plugin list
/// and runs the rest of the pipeline inside its scope.
pub async fn request_context_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let ctx = RequestContext::new();
    for plugin in state.plugins.iter() {
        if let Some(value) = plugin.process_request(&request).await {
            ctx.insert(plugin.key(), value);
        }
    }
    context::scope(ctx, next.run(request)).await
}

fn last_path_segment(path: &str) -> Option<String> {
    path.rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn test_last_path_segment() {
        assert_eq!(last_path_segment("/chat/42").as_deref(), Some("42"));
        assert_eq!(last_path_segment("/chat/abc-def").as_deref(), Some("abc-def"));
        assert_eq!(last_path_segment("/health").as_deref(), Some("health"));
        // Absence, not an empty string
        assert_eq!(last_path_segment(""), None);
        assert_eq!(last_path_segment("/"), None);
        assert_eq!(last_path_segment("/chat/"), None);
    }

    #[tokio::test]
    async fn test_chat_id_plugin_extracts_final_segment() {
        let request = Request::builder()
            .uri("/chat/42")
            .body(Body::empty())
            .unwrap();
        assert_eq!(
            ChatIdPlugin.process_request(&request).await.as_deref(),
            Some("42")
        );
    }

    #[tokio::test]
    async fn test_chat_id_plugin_ignores_query() {
        let request = Request::builder()
            .uri("/chat/42?verbose=1")
            .body(Body::empty())
            .unwrap();
        assert_eq!(
            ChatIdPlugin.process_request(&request).await.as_deref(),
            Some("42")
        );
    }

    #[tokio::test]
    async fn test_request_id_plugin_generates_unique_ids() {
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let first = RequestIdPlugin.process_request(&request).await.unwrap();
        let second = RequestIdPlugin.process_request(&request).await.unwrap();
        assert_ne!(first, second);
    }
}
