use crate::{
    AppState,
    api::handlers::sse_response,
    types::{AppError, LegacyChatRequest, Result, Role, StreamEvent},
};
use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use futures::StreamExt;
use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Debug, Deserialize, IntoParams)]
pub struct LegacyStreamQuery {
    /// Opaque client session, only used for logging
    pub session_id: Option<String>,
}

/// Single-provider streaming completion
///
/// Kept for older clients: no routing, no memory, events carry only
/// `content`. If the provider stream cannot be opened, one non-streamed
/// completion is attempted instead.
#[utoipa::path(
    post,
    path = "/llm/stream",
    params(LegacyStreamQuery),
    request_body = LegacyChatRequest,
    responses(
        (status = 200, description = "Event stream", content_type = "text/event-stream", body = StreamEvent),
        (status = 400, description = "No messages or no user message")
    ),
    tag = "legacy"
)]
pub async fn llm_stream(
    State(state): State<AppState>,
    Query(query): Query<LegacyStreamQuery>,
    Json(payload): Json<LegacyChatRequest>,
) -> Result<impl IntoResponse> {
    if payload.messages.is_empty() {
        return Err(AppError::InvalidInput("No messages provided".to_string()));
    }
    if !payload.messages.iter().any(|m| m.role == Role::User) {
        return Err(AppError::InvalidInput("No user message found".to_string()));
    }

    let mut messages = Vec::with_capacity(payload.messages.len() + 1);
    messages.push(("system".to_string(), state.config.legacy.system_prompt.clone()));
    messages.extend(
        payload
            .messages
            .into_iter()
            .map(|m| (m.role.as_str().to_string(), m.content)),
    );

    let llm = state.llm.clone();
    let session_id = query.session_id.unwrap_or_default();

    let events = async_stream::stream! {
        match llm.stream_with_history(&messages).await {
            Ok(mut stream) => {
                while let Some(item) = stream.next().await {
                    match item {
                        Ok(text) => yield StreamEvent::legacy(text),
                        Err(e) => {
                            tracing::error!(session_id = %session_id, error = %e, "Legacy stream failed");
                            yield StreamEvent::legacy_failure(&e);
                            break;
                        }
                    }
                }
            }
            Err(e) => {
                tracing::warn!(session_id = %session_id, error = %e, "Could not open provider stream, falling back to a single completion");
                match llm.generate_with_history(&messages).await {
                    Ok(text) => yield StreamEvent::legacy(text),
                    Err(e) => {
                        tracing::error!(session_id = %session_id, error = %e, "Legacy completion failed");
                        yield StreamEvent::legacy_failure(&e);
                    }
                }
            }
        }
    };

    Ok(sse_response(events))
}
