use crate::{
    AppState,
    api::handlers::sse_response,
    types::{AppError, MultiAgentRequest, Result, RouteResponse, StreamEvent},
};
use axum::{Json, extract::State, response::IntoResponse};
use serde_json::Value;

fn validate(request: &MultiAgentRequest) -> Result<()> {
    if request.user_id.trim().is_empty() {
        return Err(AppError::InvalidInput("user_id is required".to_string()));
    }
    if request.message.trim().is_empty() {
        return Err(AppError::InvalidInput("message is required".to_string()));
    }
    Ok(())
}

/// Route a request and stream the chosen agent's answer
///
/// Emits one SSE event per fragment. A failure ends the stream with a single
/// event carrying `error`.
#[utoipa::path(
    post,
    path = "/multi-agent/stream",
    request_body = MultiAgentRequest,
    responses(
        (status = 200, description = "Event stream", content_type = "text/event-stream", body = StreamEvent),
        (status = 400, description = "Invalid input")
    ),
    tag = "chat"
)]
pub async fn multi_agent_stream(
    State(state): State<AppState>,
    Json(payload): Json<MultiAgentRequest>,
) -> Result<impl IntoResponse> {
    validate(&payload)?;
    Ok(sse_response(state.orchestrator.stream(payload)))
}

/// Classify a request without generating an answer
#[utoipa::path(
    post,
    path = "/route",
    request_body = MultiAgentRequest,
    responses(
        (status = 200, description = "Routing decision", body = RouteResponse),
        (status = 400, description = "Invalid input"),
        (status = 502, description = "Classification failed")
    ),
    tag = "chat"
)]
pub async fn route_message(
    State(state): State<AppState>,
    Json(payload): Json<MultiAgentRequest>,
) -> Result<Json<RouteResponse>> {
    validate(&payload)?;
    let decision = state.orchestrator.route(&payload).await?;

    let classified_domain = decision
        .context
        .get("classified_domain")
        .and_then(Value::as_str)
        .unwrap_or(decision.domain.as_str())
        .to_string();

    Ok(Json(RouteResponse {
        status: "routed".to_string(),
        recommended_agent: decision.domain,
        classified_domain,
        rationale: decision.rationale,
        context: decision.context,
        session_id: payload.session_id,
    }))
}
