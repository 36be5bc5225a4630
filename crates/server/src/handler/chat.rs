use axum::Json;
use axum::extract::Path;
use axum::response::IntoResponse;

/// Example endpoint that uses the chat id from the URL path. The id reaches
/// the log line through the context middleware, not through this handler.
pub async fn chat(Path(chat_id): Path<String>) -> impl IntoResponse {
    tracing::info!("Received request");
    Json(serde_json::json!({
        "message": format!("Processing chat {chat_id}"),
    }))
}
