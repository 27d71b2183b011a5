use serde::{Deserialize, Serialize};

/// Main configuration structure for flowsync
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Explicit flow identifier supplied by the deployment, if any.
    ///
    /// When set, the backend-role resolver prefers this over every other
    /// source (operator override); the orchestrator-role resolver consults
    /// it after the persisted record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flow_id: Option<String>,

    /// Engine (flow host) configuration
    #[serde(default)]
    pub engine: EngineConfig,

    /// Backend API configuration
    #[serde(default)]
    pub backend: BackendConfig,

    /// Shared storage configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Readiness probing configuration
    #[serde(default)]
    pub readiness: ReadinessConfig,

    /// Change watcher configuration
    #[serde(default)]
    pub watcher: WatcherConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            flow_id: None,
            engine: EngineConfig::default(),
            backend: BackendConfig::default(),
            storage: StorageConfig::default(),
            readiness: ReadinessConfig::default(),
            watcher: WatcherConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EngineConfig {
    /// Base URL of the flow engine
    #[serde(default = "default_engine_host")]
    pub host: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Name of the flow this deployment targets
    #[serde(default = "default_flow_name")]
    pub flow_name: String,

    /// Path to the bundled flow definition used by the bootstrap path
    #[serde(default = "default_flow_definition")]
    pub flow_definition: String,
}

fn default_engine_host() -> String {
    "http://localhost:8080".to_string()
}

const fn default_request_timeout_secs() -> u64 {
    10
}

fn default_flow_name() -> String {
    "Travel Chatbot".to_string()
}

fn default_flow_definition() -> String {
    "TravelMate.json".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            host: default_engine_host(),
            request_timeout_secs: default_request_timeout_secs(),
            flow_name: default_flow_name(),
            flow_definition: default_flow_definition(),
        }
    }
}

/// Backend API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct BackendConfig {
    /// Base URL of the backend API
    #[serde(default = "default_backend_host")]
    pub host: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_backend_host() -> String {
    "http://localhost:8000".to_string()
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            host: default_backend_host(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// Shared storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct StorageConfig {
    /// Directory shared between the cooperating processes
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

fn default_data_dir() -> String {
    "data".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Readiness probing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ReadinessConfig {
    /// Seconds between probe rounds
    #[serde(default = "default_readiness_interval_secs")]
    pub poll_interval_secs: u64,

    /// Maximum probe rounds before giving up
    #[serde(default = "default_readiness_max_attempts")]
    pub max_attempts: u32,

    /// Per-probe timeout in seconds
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,

    /// Log a progress line every N attempts
    #[serde(default = "default_progress_every")]
    pub progress_every: u32,
}

const fn default_readiness_interval_secs() -> u64 {
    2
}

const fn default_readiness_max_attempts() -> u32 {
    60
}

const fn default_probe_timeout_secs() -> u64 {
    5
}

const fn default_progress_every() -> u32 {
    10
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_readiness_interval_secs(),
            max_attempts: default_readiness_max_attempts(),
            probe_timeout_secs: default_probe_timeout_secs(),
            progress_every: default_progress_every(),
        }
    }
}

/// Change watcher configuration
///
/// Polling-based detection is sized for low-frequency configuration
/// changes; it is not suitable for sub-second propagation requirements.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct WatcherConfig {
    /// Seconds between polls of the persisted record
    #[serde(default = "default_watch_interval_secs")]
    pub poll_interval_secs: u64,
}

const fn default_watch_interval_secs() -> u64 {
    5
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_watch_interval_secs(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}
