//! HTTP API Handlers and Routes
//!
//! This module provides the HTTP layer for Maestro, built on the Axum web framework.
//!
//! # Module Structure
//!
//! - [`api::handlers`](crate::api::handlers) - Request handlers for each endpoint
//! - [`api::routes`](crate::api::routes) - Route definitions and router configuration
//!
//! # API Endpoints
//!
//! ## Service
//! - `GET /health` - Liveness and version
//! - `GET /agents` - Registered domains and their descriptors
//! - `GET /openapi.json` - OpenAPI document
//!
//! ## Multi-agent (`/multi-agent`)
//! - `POST /multi-agent/stream` - Route, generate and stream an answer (SSE)
//! - `POST /route` - Classify a request without generating
//!
//! ## Sessions and memory
//! - `POST /session` - Start a session, recording it in memory
//! - `GET /memories/{user_id}` - Recent memory records of a user
//!
//! ## Legacy
//! - `POST /llm/stream` - Single-provider stream without routing or memory (SSE)
//!
//! # Streaming
//!
//! Streaming endpoints emit `data: <json>` events and end by closing the
//! connection. There is no end-of-stream sentinel; an event carrying `error`
//! is always the last one.

/// Request handlers.
pub mod handlers;
/// Route definitions.
pub mod routes;

use crate::types::{
    AgentDescriptor, ConversationTurn, Domain, InteractionMode, LegacyChatRequest, MemoryRecord,
    MultiAgentRequest, Role, RouteResponse, SessionCreateRequest, SessionResponse, StreamEvent,
};
use utoipa::OpenApi;

/// OpenAPI document for the HTTP surface
#[derive(OpenApi)]
#[openapi(
    info(title = "Maestro", description = "Supervisor-routed multi-agent assistant"),
    paths(
        handlers::agents::health,
        handlers::agents::list_agents,
        handlers::chat::multi_agent_stream,
        handlers::chat::route_message,
        handlers::legacy::llm_stream,
        handlers::session::create_session,
        handlers::session::recent_memories,
    ),
    components(schemas(
        AgentDescriptor,
        ConversationTurn,
        Domain,
        InteractionMode,
        LegacyChatRequest,
        MemoryRecord,
        MultiAgentRequest,
        Role,
        RouteResponse,
        SessionCreateRequest,
        SessionResponse,
        StreamEvent,
        handlers::agents::AgentsResponse,
        handlers::agents::HealthResponse,
        handlers::agents::ModesInfo,
    )),
    tags(
        (name = "agents", description = "Discovery"),
        (name = "chat", description = "Routing and streaming"),
        (name = "session", description = "Sessions and memory"),
        (name = "legacy", description = "Single-provider completion")
    )
)]
pub struct ApiDoc;
