//! Request-scoped key-value context.
//!
//! A fresh [`RequestContext`] is installed by the server's context middleware
//! for the duration of one request future via [`scope`]. Readers anywhere in
//! the crate graph (the log formatter in particular) use the module-level
//! [`get`]/[`set`]/[`exists`] accessors, which degrade to absence outside a
//! request scope rather than erroring.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;

/// Context key under which the chat identifier is stored.
pub const CHAT_ID_KEY: &str = "chat_id";

/// Context key under which the per-request correlation id is stored.
pub const REQUEST_ID_KEY: &str = "request_id";

/// Per-request metadata store. Created at pipeline entry, released when the
/// request future completes or is cancelled.
#[derive(Debug, Default)]
pub struct RequestContext {
    values: Mutex<HashMap<String, String>>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, key: impl Into<String>, value: impl Into<String>) {
        if let Ok(mut values) = self.values.lock() {
            values.insert(key.into(), value.into());
        }
    }

    pub fn value(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .ok()
            .and_then(|values| values.get(key).cloned())
    }
}

tokio::task_local! {
    static CURRENT: RequestContext;
}

/// Run `fut` with `ctx` installed as the ambient request context.
///
/// Each request future gets its own scope, so concurrent requests never
/// observe each other's values — including sequential requests multiplexed
/// onto the same connection task.
pub async fn scope<F: Future>(ctx: RequestContext, fut: F) -> F::Output {
    CURRENT.scope(ctx, fut).await
}

/// True when called from within a request scope.
pub fn exists() -> bool {
    CURRENT.try_with(|_| ()).is_ok()
}

/// Read a value from the current request context. `None` outside a scope or
/// when the key was never set.
pub fn get(key: &str) -> Option<String> {
    CURRENT.try_with(|ctx| ctx.value(key)).ok().flatten()
}

/// Write a value into the current request context. Returns `false` when
/// called outside a request scope; the write is dropped in that case.
pub fn set(key: impl Into<String>, value: impl Into<String>) -> bool {
    CURRENT.try_with(|ctx| ctx.insert(key, value)).is_ok()
}
