use crate::{
    AppState,
    types::{AgentDescriptor, Domain},
};
use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub mode: String,
}

/// Interaction modes the deployment offers
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ModesInfo {
    pub text_chat: bool,
    pub voice_agent: bool,
    pub video_avatar: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AgentsResponse {
    /// Registered domains, in registry order
    pub domains: Vec<Domain>,
    pub default_domain: Domain,
    pub agents: Vec<AgentDescriptor>,
    pub modes: ModesInfo,
}

/// Liveness check
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Server is up", body = HealthResponse)),
    tag = "agents"
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        mode: "multi-agent".to_string(),
    })
}

/// List the registered domain agents
///
/// Read-only: performs no routing and no generation.
#[utoipa::path(
    get,
    path = "/agents",
    responses((status = 200, description = "Registered agents", body = AgentsResponse)),
    tag = "agents"
)]
pub async fn list_agents(State(state): State<AppState>) -> Json<AgentsResponse> {
    let registry = state.orchestrator.registry();
    let modes = &state.config.modes;

    Json(AgentsResponse {
        domains: registry.domains().to_vec(),
        default_domain: state.orchestrator.router().default_domain(),
        agents: registry.descriptors(),
        modes: ModesInfo {
            text_chat: modes.text_chat,
            voice_agent: modes.voice_agent,
            video_avatar: modes.video_avatar,
        },
    })
}
