use super::state::AppState;
use crate::completion::{ChatTurn, CompletionResponse, ErrorResponse, Role};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::Value;
use tracing::{debug, error, warn};

/// Keep well-formed turns: known role, non-empty string content
pub fn valid_turns(messages: &[Value]) -> Vec<ChatTurn> {
    messages
        .iter()
        .filter_map(|msg| serde_json::from_value::<ChatTurn>(msg.clone()).ok())
        .filter(|turn| !turn.content.is_empty())
        .collect()
}

/// Flatten turns into a single prompt: system text, then the user's lines
pub fn build_prompt(turns: &[ChatTurn]) -> String {
    let system = turns
        .iter()
        .find(|turn| turn.role == Role::System)
        .map(|turn| turn.content.as_str())
        .unwrap_or_default();

    let user = turns
        .iter()
        .filter(|turn| turn.role == Role::User)
        .map(|turn| turn.content.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    if system.is_empty() {
        user
    } else {
        format!("{}\n\nUser: {}", system, user)
    }
}

fn bad_request(message: &str) -> axum::response::Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}

/// POST /api/chat
/// Generate the interviewer's next line from the conversation so far
pub async fn chat(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> impl IntoResponse {
    // An unreadable body is treated like a generation failure
    let body = match body {
        Ok(Json(body)) => body,
        Err(rejection) => {
            warn!("Unreadable chat request, using fallback response: {}", rejection);
            return fallback_reply(&state);
        }
    };

    let Some(messages) = body.get("messages").and_then(Value::as_array) else {
        error!("Invalid messages format: {}", body);
        return bad_request("Messages array is required");
    };

    let turns = valid_turns(messages);
    if turns.is_empty() {
        error!("No valid messages found in {} entries", messages.len());
        return bad_request("No valid messages provided");
    }

    let prompt = build_prompt(&turns);
    debug!("Generating reply for {} turns", turns.len());

    match state.generator.generate(&prompt).await {
        Ok(content) => (StatusCode::OK, Json(CompletionResponse { content })).into_response(),
        Err(e) => {
            warn!("Generation failed, using fallback response: {:#}", e);
            fallback_reply(&state)
        }
    }
}

fn fallback_reply(state: &AppState) -> axum::response::Response {
    let content = state.next_fallback().to_string();
    (StatusCode::OK, Json(CompletionResponse { content })).into_response()
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
