use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,

    /// LLM endpoint configuration
    pub llm: LlmConfig,

    /// Filtering configuration
    pub filtering: FilteringConfig,

    /// Upload spool configuration
    pub upload: UploadConfig,

    /// Observability configuration
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Load configuration from file and environment
    pub fn load(config_path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let config_path = config_path
            .map(|p| p.to_string_lossy().into_owned())
            .or_else(|| std::env::var("CONFIG_PATH").ok())
            .unwrap_or_else(|| "config/default.toml".to_string());

        config::Config::builder()
            // Start with default values
            .add_source(config::File::from_str(
                include_str!("../config/default.toml"),
                config::FileFormat::Toml,
            ))
            // Override with config file if it exists
            .add_source(config::File::with_name(&config_path).required(false))
            // Override with environment variables (prefix: LLM_LS)
            .add_source(
                config::Environment::with_prefix("LLM_LS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server host
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_http_port")]
    pub http_port: u16,

    /// Request timeout (seconds); must exceed the per-keyword remote
    /// timeout or long filtering runs are cut off at the HTTP layer
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

/// Text-generation endpoint configuration.
///
/// The API key is resolved from the environment variable named by
/// `api_key_env`; it is never read from configuration files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Enable the remote relevance strategy
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Service base endpoint
    pub endpoint: String,

    /// Deployment (model) name
    pub deployment: String,

    /// API version query parameter
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Per-request timeout (seconds)
    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilteringConfig {
    /// Maximum concurrent remote relevance calls per filtering run
    #[serde(default = "default_max_concurrent_remote")]
    pub max_concurrent_remote: usize,

    /// Overall timeout for one keyword's remote call (seconds)
    #[serde(default = "default_remote_timeout")]
    pub remote_timeout_secs: u64,

    /// Annotate diagnostic lines unless the request says otherwise
    #[serde(default = "default_true")]
    pub annotate_by_default: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Directory for transient upload spool files
    #[serde(default = "default_spool_dir")]
    pub spool_dir: PathBuf,

    /// Maximum accepted request body size (bytes)
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub json_logs: bool,

    /// Service name
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Enable Prometheus metrics
    #[serde(default = "default_true")]
    pub prometheus_enabled: bool,
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_http_port() -> u16 {
    3000
}

fn default_request_timeout() -> u64 {
    120
}

fn default_api_version() -> String {
    "2024-05-01-preview".to_string()
}

fn default_api_key_env() -> String {
    "AZURE_OPENAI_API_KEY".to_string()
}

fn default_llm_timeout() -> u64 {
    30
}

fn default_max_concurrent_remote() -> usize {
    4
}

fn default_remote_timeout() -> u64 {
    45
}

fn default_spool_dir() -> PathBuf {
    PathBuf::from("./uploads")
}

fn default_max_body_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_service_name() -> String {
    "llm-log-sifter".to_string()
}

fn default_true() -> bool {
    true
}
