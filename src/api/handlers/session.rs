use crate::{
    AppState,
    types::{AppError, MemoryRecord, Metadata, Result, Scalar, SessionCreateRequest, SessionResponse},
};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use utoipa::IntoParams;

/// Largest page the memories endpoint serves
const MAX_MEMORY_PAGE: usize = 100;

/// Start a session for a user
///
/// When memory is enabled an initialisation record is appended. A memory
/// failure is logged and does not fail the request.
#[utoipa::path(
    post,
    path = "/session",
    request_body = SessionCreateRequest,
    responses(
        (status = 200, description = "Session created", body = SessionResponse),
        (status = 400, description = "Invalid input")
    ),
    tag = "session"
)]
pub async fn create_session(
    State(state): State<AppState>,
    Json(payload): Json<SessionCreateRequest>,
) -> Result<Json<SessionResponse>> {
    if payload.user_id.trim().is_empty() {
        return Err(AppError::InvalidInput("user_id is required".to_string()));
    }

    let session_id = format!("session-{}", payload.user_id);

    if let Some(memory) = &state.memory {
        let mut metadata = Metadata::new();
        metadata.insert("session_id".into(), Scalar::from(session_id.as_str()));
        metadata.insert("created_at".into(), Scalar::from(chrono::Utc::now().to_rfc3339()));

        let message = format!("User {} initialized.", payload.first_name);
        if let Err(e) = memory.append(&payload.user_id, &message, metadata).await {
            tracing::warn!(user_id = %payload.user_id, error = %e, "Could not record session start");
        }
    }

    tracing::info!(user_id = %payload.user_id, session_id = %session_id, "Session created");

    Ok(Json(SessionResponse {
        user_id: payload.user_id,
        session_id,
        memory_enabled: state.memory.is_some(),
    }))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct MemoriesQuery {
    /// Number of records, newest first
    pub limit: Option<usize>,
}

/// Recent memory records of a user, newest first
#[utoipa::path(
    get,
    path = "/memories/{user_id}",
    params(
        ("user_id" = String, Path, description = "Owner of the records"),
        MemoriesQuery
    ),
    responses(
        (status = 200, description = "Memory records", body = [MemoryRecord]),
        (status = 503, description = "Memory store unavailable")
    ),
    tag = "session"
)]
pub async fn recent_memories(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<MemoriesQuery>,
) -> Result<Json<Vec<MemoryRecord>>> {
    let Some(memory) = &state.memory else {
        return Ok(Json(Vec::new()));
    };

    let limit = query
        .limit
        .unwrap_or(state.config.memory.recent_limit)
        .min(MAX_MEMORY_PAGE);
    let records = memory.retrieve_recent(&user_id, limit).await?;
    Ok(Json(records))
}
