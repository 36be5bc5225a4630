use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;
use chattrace_core::error::ServiceError;

use crate::AppState;

/// Middleware that validates the Host header against the configured
/// allow-list. A `"*"` entry accepts any host (the default).
pub async fn trusted_host_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ServiceError> {
    let allowed = &state.config.allowed_hosts;

    if allowed.iter().any(|pattern| pattern == "*") {
        return Ok(next.run(request).await);
    }

    let host = request
        .headers()
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .map(|h| h.split(':').next().unwrap_or(h));

    match host {
        Some(h) if allowed.iter().any(|pattern| host_matches(pattern, h)) => {
            Ok(next.run(request).await)
        }
        _ => Err(ServiceError::InvalidHost(
            host.unwrap_or("<missing>").to_string(),
        )),
    }
}

/// Exact match, or `*.domain` suffix wildcard covering subdomains.
fn host_matches(pattern: &str, host: &str) -> bool {
    if let Some(domain) = pattern.strip_prefix("*.") {
        host.ends_with(domain)
            && host.len() > domain.len()
            && host.as_bytes()[host.len() - domain.len() - 1] == b'.'
    } else {
        pattern.eq_ignore_ascii_case(host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_matches_exact() {
        assert!(host_matches("example.com", "example.com"));
        assert!(host_matches("example.com", "EXAMPLE.com"));
        assert!(!host_matches("example.com", "evil.com"));
    }

    #[test]
    fn test_host_matches_wildcard_subdomain() {
        assert!(host_matches("*.example.com", "api.example.com"));
        assert!(host_matches("*.example.com", "a.b.example.com"));
        assert!(!host_matches("*.example.com", "example.com"));
        assert!(!host_matches("*.example.com", "evilexample.com"));
    }
}
