//! TOML configuration for Maestro
//!
//! The server is configured by a single TOML file (`maestro.toml` by default).
//! Secrets never live in the file: it only names the environment variables
//! that hold them (`*_env` keys), which are resolved and checked at load time.
//!
//! Every table is optional except `[provider]`.
//!
//! ```toml
//! [provider]
//! type = "openai"
//! api_key_env = "GROQ_API_KEY"
//! api_base = "https://api.groq.com/openai/v1"
//! model = "llama-3.3-70b-versatile"
//! ```

use crate::llm::{ModelParams, Provider};
use crate::memory::mem0::DEFAULT_MEM0_URL;
use crate::memory::{DEFAULT_HISTORY_WINDOW, DEFAULT_RECENT_LIMIT};
use crate::tools::documents::{DEFAULT_CHROMA_URL, DEFAULT_COLLECTION};
use crate::tools::serpapi::DEFAULT_SERPAPI_URL;
use crate::types::{AppError, Domain};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Root configuration structure loaded from maestro.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaestroConfig {
    #[serde(default)]
    pub server: ServerConfig,

    pub provider: ProviderConfig,

    #[serde(default)]
    pub generation: GenerationConfig,

    #[serde(default)]
    pub router: RouterConfig,

    #[serde(default)]
    pub memory: MemoryConfig,

    #[serde(default)]
    pub tools: ToolsConfig,

    #[serde(default)]
    pub agents: AgentsConfig,

    #[serde(default)]
    pub modes: ModesConfig,

    #[serde(default)]
    pub legacy: LegacyConfig,
}

// ============= Server Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Upper bound on routing plus streaming for one request. 0 disables it.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_request_timeout() -> u64 {
    120
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }
}

// ============= Provider Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderConfig {
    /// OpenAI-compatible endpoint (Groq by default)
    #[serde(rename = "openai")]
    OpenAI {
        /// Environment variable containing API key
        #[serde(default = "default_openai_key_env")]
        api_key_env: String,
        #[serde(default = "default_openai_base")]
        api_base: String,
        #[serde(default = "default_openai_model")]
        model: String,
    },
    Ollama {
        #[serde(default = "default_ollama_url")]
        base_url: String,
        #[serde(default = "default_ollama_model")]
        model: String,
    },
}

fn default_openai_key_env() -> String {
    "GROQ_API_KEY".to_string()
}

fn default_openai_base() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_openai_model() -> String {
    "llama-3.3-70b-versatile".to_string()
}

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "llama3.2:3b".to_string()
}

impl ProviderConfig {
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderConfig::OpenAI { .. } => "openai",
            ProviderConfig::Ollama { .. } => "ollama",
        }
    }

    pub fn model(&self) -> &str {
        match self {
            ProviderConfig::OpenAI { model, .. } | ProviderConfig::Ollama { model, .. } => model,
        }
    }

    fn is_compiled(&self) -> bool {
        match self {
            ProviderConfig::OpenAI { .. } => cfg!(feature = "openai"),
            ProviderConfig::Ollama { .. } => cfg!(feature = "ollama"),
        }
    }
}

// ============= Generation / Router =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    2048
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Target for classifications outside the enabled set
    #[serde(default = "default_domain")]
    pub default_domain: String,

    #[serde(default)]
    pub temperature: f32,

    #[serde(default = "default_history_window")]
    pub history_window: usize,
}

fn default_domain() -> String {
    Domain::Research.as_str().to_string()
}

fn default_history_window() -> usize {
    DEFAULT_HISTORY_WINDOW
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            default_domain: default_domain(),
            temperature: 0.0,
            history_window: default_history_window(),
        }
    }
}

// ============= Memory =============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryBackend {
    Mem0,
    InMemory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_memory_backend")]
    pub backend: MemoryBackend,

    /// Environment variable containing the Mem0 API key
    #[serde(default = "default_mem0_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_mem0_url")]
    pub base_url: String,

    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,
}

fn default_true() -> bool {
    true
}

fn default_memory_backend() -> MemoryBackend {
    MemoryBackend::InMemory
}

fn default_mem0_key_env() -> String {
    "MEM0_API_KEY".to_string()
}

fn default_mem0_url() -> String {
    DEFAULT_MEM0_URL.to_string()
}

fn default_recent_limit() -> usize {
    DEFAULT_RECENT_LIMIT
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            backend: default_memory_backend(),
            api_key_env: default_mem0_key_env(),
            base_url: default_mem0_url(),
            recent_limit: default_recent_limit(),
        }
    }
}

// ============= Tools =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Environment variable containing the SerpAPI key. News, job and recipe
    /// search are disabled when unset.
    pub serpapi_key_env: Option<String>,

    #[serde(default = "default_serpapi_url")]
    pub serpapi_base_url: String,

    /// DuckDuckGo web search, no key required
    #[serde(default = "default_true")]
    pub web_search: bool,

    #[serde(default = "default_tool_timeout")]
    pub timeout_secs: u64,

    pub documents: Option<DocumentsConfig>,
}

fn default_serpapi_url() -> String {
    DEFAULT_SERPAPI_URL.to_string()
}

fn default_tool_timeout() -> u64 {
    30
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            serpapi_key_env: None,
            serpapi_base_url: default_serpapi_url(),
            web_search: true,
            timeout_secs: default_tool_timeout(),
            documents: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentsConfig {
    #[serde(default = "default_chroma_url")]
    pub url: String,

    #[serde(default = "default_collection")]
    pub collection: String,
}

fn default_chroma_url() -> String {
    DEFAULT_CHROMA_URL.to_string()
}

fn default_collection() -> String {
    DEFAULT_COLLECTION.to_string()
}

// ============= Agents / Modes / Legacy =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentsConfig {
    /// Enabled domains, in registry order
    #[serde(default = "default_domains")]
    pub domains: Vec<String>,
}

fn default_domains() -> Vec<String> {
    Domain::ALL.iter().map(|d| d.as_str().to_string()).collect()
}

impl Default for AgentsConfig {
    fn default() -> Self {
        Self {
            domains: default_domains(),
        }
    }
}

/// Interaction modes advertised to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModesConfig {
    #[serde(default = "default_true")]
    pub text_chat: bool,

    #[serde(default)]
    pub voice_agent: bool,

    #[serde(default)]
    pub video_avatar: bool,
}

impl Default for ModesConfig {
    fn default() -> Self {
        Self {
            text_chat: true,
            voice_agent: false,
            video_avatar: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyConfig {
    #[serde(default = "default_legacy_prompt")]
    pub system_prompt: String,
}

fn default_legacy_prompt() -> String {
    "You are a helpful AI assistant.".to_string()
}

impl Default for LegacyConfig {
    fn default() -> Self {
        Self {
            system_prompt: default_legacy_prompt(),
        }
    }
}

// ============= Errors =============

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Environment variable '{0}' referenced in config is not set")]
    MissingEnvVar(String),

    #[error("Unknown domain '{0}' (known: research, finance, travel, shopping, jobs, recipes)")]
    UnknownDomain(String),

    #[error("Provider '{0}' is not compiled in; rebuild with the '{0}' feature")]
    ProviderNotCompiled(String),
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::Configuration(err.to_string())
    }
}

impl MaestroConfig {
    /// Load and validate configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse and validate configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: MaestroConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration for internal consistency and env var availability
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.provider.is_compiled() {
            return Err(ConfigError::ProviderNotCompiled(self.provider.kind().to_string()));
        }
        if let ProviderConfig::OpenAI { api_key_env, .. } = &self.provider {
            self.validate_env_var(api_key_env)?;
        }
        if self.provider.model().trim().is_empty() {
            return Err(ConfigError::ValidationError("provider.model must not be empty".to_string()));
        }

        let domains = self.enabled_domains()?;
        let default = self.default_domain()?;
        if !domains.contains(&default) {
            return Err(ConfigError::ValidationError(format!(
                "router.default_domain '{}' is not listed in agents.domains",
                default
            )));
        }

        if !(0.0..=2.0).contains(&self.generation.temperature)
            || !(0.0..=2.0).contains(&self.router.temperature)
        {
            return Err(ConfigError::ValidationError(
                "temperatures must be between 0.0 and 2.0".to_string(),
            ));
        }

        if self.memory.enabled && self.memory.backend == MemoryBackend::Mem0 {
            self.validate_env_var(&self.memory.api_key_env)?;
        }

        if let Some(env) = &self.tools.serpapi_key_env {
            self.validate_env_var(env)?;
        }

        Ok(())
    }

    fn validate_env_var(&self, name: &str) -> Result<(), ConfigError> {
        std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))?;
        Ok(())
    }

    /// Get a resolved value from an env var reference
    pub fn resolve_env(&self, env_name: &str) -> Result<String, ConfigError> {
        std::env::var(env_name).map_err(|_| ConfigError::MissingEnvVar(env_name.to_string()))
    }

    /// Enabled domains in registry order. Duplicates are rejected.
    pub fn enabled_domains(&self) -> Result<Vec<Domain>, ConfigError> {
        if self.agents.domains.is_empty() {
            return Err(ConfigError::ValidationError(
                "agents.domains must list at least one domain".to_string(),
            ));
        }

        let mut domains = Vec::with_capacity(self.agents.domains.len());
        for name in &self.agents.domains {
            let domain = name
                .parse::<Domain>()
                .map_err(|_| ConfigError::UnknownDomain(name.clone()))?;
            if domains.contains(&domain) {
                return Err(ConfigError::ValidationError(format!(
                    "domain '{}' listed twice in agents.domains",
                    domain
                )));
            }
            domains.push(domain);
        }
        Ok(domains)
    }

    pub fn default_domain(&self) -> Result<Domain, ConfigError> {
        self.router
            .default_domain
            .parse::<Domain>()
            .map_err(|_| ConfigError::UnknownDomain(self.router.default_domain.clone()))
    }

    /// Provider for domain agents and the legacy endpoint
    pub fn generation_provider(&self) -> Result<Provider, ConfigError> {
        self.provider_with(ModelParams {
            temperature: self.generation.temperature,
            max_tokens: self.generation.max_tokens,
        })
    }

    /// Provider for the router, with its own (normally zero) temperature
    pub fn router_provider(&self) -> Result<Provider, ConfigError> {
        self.provider_with(ModelParams {
            temperature: self.router.temperature,
            max_tokens: self.generation.max_tokens,
        })
    }

    fn provider_with(&self, params: ModelParams) -> Result<Provider, ConfigError> {
        Ok(match &self.provider {
            ProviderConfig::OpenAI {
                api_key_env,
                api_base,
                model,
            } => Provider::OpenAI {
                api_key: self.resolve_env(api_key_env)?,
                api_base: api_base.clone(),
                model: model.clone(),
                params,
            },
            ProviderConfig::Ollama { base_url, model } => Provider::Ollama {
                base_url: base_url.clone(),
                model: model.clone(),
                params,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const OLLAMA_ONLY: &str = r#"
[provider]
type = "ollama"
model = "llama3.2:3b"
"#;

    #[test]
    fn test_defaults_fill_every_table() {
        let config: MaestroConfig = toml::from_str(OLLAMA_ONLY).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.request_timeout(), Some(Duration::from_secs(120)));
        assert_eq!(config.router.default_domain, "research");
        assert_eq!(config.router.temperature, 0.0);
        assert_eq!(config.memory.backend, MemoryBackend::InMemory);
        assert_eq!(config.memory.recent_limit, 5);
        assert!(config.tools.web_search);
        assert!(config.modes.text_chat && !config.modes.voice_agent);
        assert_eq!(config.enabled_domains().unwrap(), Domain::ALL.to_vec());
    }

    #[test]
    #[cfg(feature = "ollama")]
    fn test_parse_valid_ollama_config() {
        let config = MaestroConfig::parse(OLLAMA_ONLY).unwrap();
        assert_eq!(config.provider.kind(), "ollama");
        let provider = config.router_provider().unwrap();
        assert_eq!(provider.params().temperature, 0.0);
        assert_eq!(config.generation_provider().unwrap().params().temperature, 0.7);
    }

    #[test]
    fn test_zero_timeout_disables_deadline() {
        let server = ServerConfig {
            request_timeout_secs: 0,
            ..Default::default()
        };
        assert!(server.request_timeout().is_none());
    }

    #[test]
    fn test_unknown_domain_rejected() {
        let content = format!("{}\n[agents]\ndomains = [\"travel\", \"weather\"]\n", OLLAMA_ONLY);
        let config: MaestroConfig = toml::from_str(&content).unwrap();
        assert!(matches!(config.enabled_domains(), Err(ConfigError::UnknownDomain(d)) if d == "weather"));
    }

    #[test]
    fn test_duplicate_and_empty_domains_rejected() {
        let dup = format!("{}\n[agents]\ndomains = [\"travel\", \"Travel\"]\n", OLLAMA_ONLY);
        let config: MaestroConfig = toml::from_str(&dup).unwrap();
        assert!(matches!(config.enabled_domains(), Err(ConfigError::ValidationError(_))));

        let empty = format!("{}\n[agents]\ndomains = []\n", OLLAMA_ONLY);
        let config: MaestroConfig = toml::from_str(&empty).unwrap();
        assert!(matches!(config.enabled_domains(), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    #[cfg(feature = "ollama")]
    fn test_default_domain_must_be_enabled() {
        let content = format!(
            "{}\n[router]\ndefault_domain = \"finance\"\n[agents]\ndomains = [\"travel\"]\n",
            OLLAMA_ONLY
        );
        assert!(matches!(
            MaestroConfig::parse(&content),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    #[cfg(feature = "openai")]
    fn test_missing_api_key_env() {
        let content = r#"
[provider]
type = "openai"
api_key_env = "MAESTRO_TEST_UNSET_KEY_7f3a"
model = "gpt-4o-mini"
"#;
        assert!(matches!(
            MaestroConfig::parse(content),
            Err(ConfigError::MissingEnvVar(name)) if name == "MAESTRO_TEST_UNSET_KEY_7f3a"
        ));
    }

    #[test]
    #[cfg(feature = "openai")]
    fn test_openai_key_resolved_from_env() {
        // SAFETY: the variable name is unique to this test
        unsafe {
            std::env::set_var("MAESTRO_TEST_OPENAI_KEY", "sk-test");
        }
        let content = r#"
[provider]
type = "openai"
api_key_env = "MAESTRO_TEST_OPENAI_KEY"
"#;
        let config = MaestroConfig::parse(content).unwrap();
        match config.generation_provider().unwrap() {
            Provider::OpenAI { api_key, api_base, .. } => {
                assert_eq!(api_key, "sk-test");
                assert_eq!(api_base, "https://api.groq.com/openai/v1");
            }
            other => panic!("unexpected provider {:?}", other.name()),
        }
    }

    #[test]
    #[cfg(feature = "ollama")]
    fn test_mem0_backend_requires_key() {
        let content = format!(
            "{}\n[memory]\nbackend = \"mem0\"\napi_key_env = \"MAESTRO_TEST_UNSET_MEM0_91c2\"\n",
            OLLAMA_ONLY
        );
        assert!(matches!(
            MaestroConfig::parse(&content),
            Err(ConfigError::MissingEnvVar(_))
        ));

        let disabled = format!(
            "{}\n[memory]\nenabled = false\nbackend = \"mem0\"\napi_key_env = \"MAESTRO_TEST_UNSET_MEM0_91c2\"\n",
            OLLAMA_ONLY
        );
        assert!(MaestroConfig::parse(&disabled).is_ok());
    }

    #[test]
    #[cfg(feature = "ollama")]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(OLLAMA_ONLY.as_bytes()).unwrap();
        let config = MaestroConfig::load(file.path()).unwrap();
        assert_eq!(config.provider.model(), "llama3.2:3b");
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            MaestroConfig::load("/nonexistent/maestro.toml"),
            Err(ConfigError::FileNotFound(_))
        ));
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            MaestroConfig::parse("[provider\ntype="),
            Err(ConfigError::ParseError(_))
        ));
    }
}
