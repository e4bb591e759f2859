use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

// ============= Domains =============

/// The fixed set of user-intent categories, one dedicated agent each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Research,
    Finance,
    Travel,
    Shopping,
    Jobs,
    Recipes,
}

impl Domain {
    /// Every known domain, in registry order.
    pub const ALL: [Domain; 6] = [
        Domain::Research,
        Domain::Finance,
        Domain::Travel,
        Domain::Shopping,
        Domain::Jobs,
        Domain::Recipes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Research => "research",
            Domain::Finance => "finance",
            Domain::Travel => "travel",
            Domain::Shopping => "shopping",
            Domain::Jobs => "jobs",
            Domain::Recipes => "recipes",
        }
    }

    /// One-line capability summary, shared by the router prompt and discovery.
    pub fn summary(&self) -> &'static str {
        match self {
            Domain::Research => "Web research, articles, academic and technical information gathering",
            Domain::Finance => "Markets, stocks, budgeting, investing and other financial questions",
            Domain::Travel => "Flights, hotels, destinations and trip planning",
            Domain::Shopping => "Product recommendations, comparisons and buying advice",
            Domain::Jobs => "Job search, hiring, resumes and career advice",
            Domain::Recipes => "Recipes, cooking techniques and dietary guidance",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Domain {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase();
        Domain::ALL
            .into_iter()
            .find(|d| d.as_str() == normalized)
            .ok_or_else(|| AppError::NotFound(format!("Unknown domain: {}", s)))
    }
}

// ============= Conversation Types =============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// How the client is interacting; echoed back on every stream event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum InteractionMode {
    #[default]
    Text,
    Voice,
    Video,
}

impl InteractionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionMode::Text => "text",
            InteractionMode::Voice => "voice",
            InteractionMode::Video => "video",
        }
    }
}

// ============= Memory Types =============

/// Scalar metadata value attached to a memory record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl Scalar {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Scalar::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Converts a JSON value, dropping arrays, objects and nulls.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Bool(b) => Some(Scalar::Bool(*b)),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map(Scalar::Int)
                .or_else(|| n.as_f64().map(Scalar::Float)),
            serde_json::Value::String(s) => Some(Scalar::String(s.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Int(i) => write!(f, "{}", i),
            Scalar::Float(x) => write!(f, "{}", x),
            Scalar::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::String(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::String(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int(value)
    }
}

impl From<usize> for Scalar {
    fn from(value: usize) -> Self {
        Scalar::Int(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

pub type Metadata = BTreeMap<String, Scalar>;

/// A short persisted note about a user, owned by the memory store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MemoryRecord {
    pub owner: String,
    pub message: String,
    #[serde(default)]
    pub metadata: Metadata,
    pub created_at: DateTime<Utc>,
}

// ============= Routing & Agent Types =============

/// Outcome of classifying one request. Produced once, consumed once.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RoutingDecision {
    pub domain: Domain,
    pub rationale: String,
    #[schema(value_type = Object)]
    pub context: serde_json::Map<String, serde_json::Value>,
}

/// Static description of an agent for discovery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AgentDescriptor {
    pub domain: Domain,
    pub capability: String,
    pub tools: Vec<String>,
}

// ============= API Request/Response Types =============

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MultiAgentRequest {
    pub user_id: String,
    pub session_id: String,
    pub message: String,
    #[serde(default)]
    pub mode: InteractionMode,
    #[serde(default)]
    pub conversation_history: Vec<ConversationTurn>,
}

/// Request body of the legacy single-provider stream.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LegacyChatRequest {
    pub messages: Vec<ConversationTurn>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SessionCreateRequest {
    pub user_id: String,
    #[serde(default = "default_first_name")]
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

fn default_first_name() -> String {
    "Demo".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SessionResponse {
    pub user_id: String,
    pub session_id: String,
    pub memory_enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RouteResponse {
    pub status: String,
    pub recommended_agent: Domain,
    pub classified_domain: String,
    pub rationale: String,
    #[schema(value_type = Object)]
    pub context: serde_json::Map<String, serde_json::Value>,
    pub session_id: String,
}

/// One server-pushed event. Fragments carry `content`; the terminal
/// failure event carries `error` with a readable `content`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, ToSchema)]
pub struct StreamEvent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent: Option<Domain>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<InteractionMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StreamEvent {
    pub fn fragment(text: impl Into<String>, agent: Domain, mode: InteractionMode) -> Self {
        Self {
            content: Some(text.into()),
            agent: Some(agent),
            mode: Some(mode),
            error: None,
        }
    }

    pub fn failure(err: &AppError, agent: Option<Domain>, mode: InteractionMode) -> Self {
        Self {
            content: Some(format!("Error: {}", err.user_message())),
            agent,
            mode: Some(mode),
            error: Some(err.to_string()),
        }
    }

    /// Content-only fragment of the legacy endpoint.
    pub fn legacy(text: impl Into<String>) -> Self {
        Self {
            content: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn legacy_failure(err: &AppError) -> Self {
        Self::legacy(format!("Error: {}", err.user_message()))
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

// ============= Error Types =============

/// Failure class, used by callers that need to branch on the kind of error
/// rather than its message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Classification,
    Resolution,
    Generation,
    Tool,
    Memory,
    NotFound,
    InvalidInput,
    Internal,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Classification error: {0}")]
    Classification(String),

    #[error("Resolution error: {0}")]
    Resolution(String),

    #[error("LLM error: {0}")]
    LLM(String),

    #[error("Tool error: {0}")]
    Tool(String),

    #[error("Memory error: {0}")]
    Memory(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Configuration(_) => ErrorKind::Configuration,
            AppError::Classification(_) => ErrorKind::Classification,
            AppError::Resolution(_) => ErrorKind::Resolution,
            AppError::LLM(_) => ErrorKind::Generation,
            AppError::Tool(_) => ErrorKind::Tool,
            AppError::Memory(_) => ErrorKind::Memory,
            AppError::NotFound(_) => ErrorKind::NotFound,
            AppError::InvalidInput(_) => ErrorKind::InvalidInput,
            AppError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Human-readable description for the terminal error fragment.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Configuration(_) => "The assistant is not configured correctly.".to_string(),
            AppError::Classification(msg) => {
                format!("Could not decide which assistant should answer ({}).", msg)
            }
            AppError::Resolution(msg) => format!("No assistant is available ({}).", msg),
            AppError::LLM(msg) => format!("The response could not be generated ({}).", msg),
            AppError::Tool(msg) => format!("A search tool failed ({}).", msg),
            AppError::Memory(msg) => format!("Memory is unavailable ({}).", msg),
            AppError::NotFound(msg) | AppError::InvalidInput(msg) | AppError::Internal(msg) => {
                msg.clone()
            }
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;

        let status = match self.kind() {
            ErrorKind::Classification | ErrorKind::Generation => StatusCode::BAD_GATEWAY,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorKind::Memory => StatusCode::SERVICE_UNAVAILABLE,
            ErrorKind::Configuration
            | ErrorKind::Resolution
            | ErrorKind::Tool
            | ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = serde_json::json!({
            "error": self.to_string(),
            "detail": self.user_message(),
        });

        (status, axum::Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_round_trips_through_str() {
        for domain in Domain::ALL {
            assert_eq!(domain.as_str().parse::<Domain>().unwrap(), domain);
        }
        assert_eq!(" Travel ".parse::<Domain>().unwrap(), Domain::Travel);
        assert!("weather".parse::<Domain>().is_err());
    }

    #[test]
    fn test_domain_serializes_lowercase() {
        let json = serde_json::to_string(&Domain::Recipes).unwrap();
        assert_eq!(json, "\"recipes\"");
    }

    #[test]
    fn test_scalar_from_json_drops_nested_values() {
        assert_eq!(
            Scalar::from_json(&serde_json::json!(3)),
            Some(Scalar::Int(3))
        );
        assert_eq!(
            Scalar::from_json(&serde_json::json!("x")),
            Some(Scalar::String("x".into()))
        );
        assert_eq!(Scalar::from_json(&serde_json::json!([1, 2])), None);
        assert_eq!(Scalar::from_json(&serde_json::json!(null)), None);
    }

    #[test]
    fn test_metadata_deserializes_untagged_scalars() {
        let metadata: Metadata =
            serde_json::from_str(r#"{"domain":"travel","response_length":42,"ok":true}"#).unwrap();
        assert_eq!(metadata["domain"].as_str(), Some("travel"));
        assert_eq!(metadata["response_length"].as_i64(), Some(42));
        assert_eq!(metadata["ok"], Scalar::Bool(true));
    }

    #[test]
    fn test_stream_event_omits_absent_fields() {
        let event = StreamEvent::legacy("hi");
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json, serde_json::json!({"content": "hi"}));

        let event = StreamEvent::fragment("hi", Domain::Jobs, InteractionMode::Voice);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"content": "hi", "agent": "jobs", "mode": "voice"})
        );
    }

    #[test]
    fn test_failure_event_is_readable() {
        let err = AppError::LLM("Stream error: connection reset".into());
        let event = StreamEvent::failure(&err, Some(Domain::Travel), InteractionMode::Text);
        assert!(event.is_error());
        assert!(event.content.unwrap().starts_with("Error: "));
        assert_eq!(event.agent, Some(Domain::Travel));
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            AppError::Classification("x".into()).kind(),
            ErrorKind::Classification
        );
        assert_eq!(AppError::LLM("x".into()).kind(), ErrorKind::Generation);
        assert_eq!(AppError::Memory("x".into()).kind(), ErrorKind::Memory);
    }
}
