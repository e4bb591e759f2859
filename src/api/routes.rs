use crate::AppState;
use crate::api::{handlers, ApiDoc};
use axum::{
    Json, Router,
    routing::{get, post},
};
use utoipa::OpenApi;

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::agents::health))
        .route("/agents", get(handlers::agents::list_agents))
        .route("/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .route("/session", post(handlers::session::create_session))
        .route("/memories/{user_id}", get(handlers::session::recent_memories))
        .route("/route", post(handlers::chat::route_message))
        .route("/multi-agent/stream", post(handlers::chat::multi_agent_stream))
        .route("/llm/stream", post(handlers::legacy::llm_stream))
}
