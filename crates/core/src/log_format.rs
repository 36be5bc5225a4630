//! Log line formatting with the ambient chat identifier.
//!
//! Output contract: `LEVEL:chat_id:target:message` when an identifier
//! resolves, `LEVEL:target:message` otherwise. Downstream log consumers parse
//! this shape, so it is bit-exact for lines without extra structured fields;
//! any additional event fields are appended afterwards as ` key=value` pairs.

use std::fmt;

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

use crate::context;

/// Event formatter that tags each line with the request's chat identifier.
///
/// The identifier is resolved from the request context first, then from a
/// `chat_id` field recorded on the event itself (for logging outside any
/// request scope). Empty strings count as absent.
#[derive(Debug, Clone, Default)]
pub struct ChatTagFormat;

impl<S, N> FormatEvent<S, N> for ChatTagFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut fields = EventFields::default();
        event.record(&mut fields);

        let meta = event.metadata();
        let ident = resolve_chat_id(fields.chat_id.as_deref());
        let line = format_line(*meta.level(), ident.as_deref(), meta.target(), &fields.message);
        writer.write_str(&line)?;

        for (name, value) in &fields.extra {
            write!(writer, " {name}={value}")?;
        }
        writeln!(writer)
    }
}

/// Resolve the identifier for a log line: request context first, then the
/// event-attached fallback. Empty strings are treated as absent.
pub fn resolve_chat_id(event_fallback: Option<&str>) -> Option<String> {
    context::get(context::CHAT_ID_KEY)
        .filter(|id| !id.is_empty())
        .or_else(|| {
            event_fallback
                .filter(|id| !id.is_empty())
                .map(str::to_string)
        })
}

/// Pure rendering of one log line. Does not touch logger or event state, so
/// formatting the same inputs twice yields the same string.
pub fn format_line(level: Level, ident: Option<&str>, target: &str, message: &str) -> String {
    match ident {
        Some(id) => format!("{level}:{id}:{target}:{message}"),
        None => format!("{level}:{target}:{message}"),
    }
}

#[derive(Default)]
struct EventFields {
    message: String,
    chat_id: Option<String>,
    extra: Vec<(&'static str, String)>,
}

impl Visit for EventFields {
    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "message" => self.message = value.to_string(),
            "chat_id" => self.chat_id = Some(value.to_string()),
            name => self.extra.push((name, value.to_string())),
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        match field.name() {
            "message" => self.message = format!("{value:?}"),
            "chat_id" => self.chat_id = Some(format!("{value:?}")),
            name => self.extra.push((name, format!("{value:?}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{CHAT_ID_KEY, RequestContext};

    #[test]
    fn test_format_line_with_identifier() {
        let line = format_line(Level::INFO, Some("abc"), "app", "hello");
        assert_eq!(line, "INFO:abc:app:hello");
    }

    #[test]
    fn test_format_line_without_identifier() {
        let line = format_line(Level::INFO, None, "app", "hello");
        assert_eq!(line, "INFO:app:hello");
    }

    #[test]
    fn test_format_line_is_idempotent() {
        let first = format_line(Level::WARN, Some("abc"), "app", "hello");
        let second = format_line(Level::WARN, Some("abc"), "app", "hello");
        assert_eq!(first, second);
        assert_eq!(first, "WARN:abc:app:hello");
    }

    #[test]
    fn test_resolve_outside_scope_uses_event_fallback() {
        assert_eq!(resolve_chat_id(Some("rec")).as_deref(), Some("rec"));
        assert_eq!(resolve_chat_id(None), None);
        // Empty strings never count as an identifier
        assert_eq!(resolve_chat_id(Some("")), None);
    }

    #[tokio::test]
    async fn test_resolve_prefers_request_context() {
        let ctx = RequestContext::new();
        ctx.insert(CHAT_ID_KEY, "from-context");

        context::scope(ctx, async {
            assert_eq!(
                resolve_chat_id(Some("from-event")).as_deref(),
                Some("from-context")
            );
        })
        .await;
    }

    #[tokio::test]
    async fn test_resolve_falls_back_when_context_has_no_value() {
        context::scope(RequestContext::new(), async {
            assert_eq!(resolve_chat_id(Some("from-event")).as_deref(), Some("from-event"));
            assert_eq!(resolve_chat_id(None), None);
        })
        .await;
    }
}
