use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub host: HostConfig,

    #[serde(default)]
    pub pool: PoolConfig,

    #[serde(default)]
    pub handlers: HandlerConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PathsConfig {
    /// Root directory that proxy renders land under. Source media paths are
    /// mirrored below it, minus their filesystem root.
    #[serde(default = "default_proxy_root")]
    pub proxy_root: PathBuf,

    /// Extension allow-list applied when scanning for candidate proxy files.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Extension the worker pool writes rendered proxies with.
    #[serde(default = "default_proxy_ext")]
    pub proxy_ext: String,
}

fn default_proxy_root() -> PathBuf {
    PathBuf::from("/mnt/proxies")
}

fn default_extensions() -> Vec<String> {
    vec![".mxf".to_string(), ".mov".to_string(), ".mp4".to_string()]
}

fn default_proxy_ext() -> String {
    ".mxf".to_string()
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            proxy_root: default_proxy_root(),
            extensions: default_extensions(),
            proxy_ext: default_proxy_ext(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HostConfig {
    /// Base URL of the host-bridge endpoint exposing the editor API.
    #[serde(default = "default_host_url")]
    pub url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_host_timeout")]
    pub timeout_secs: u64,
}

fn default_host_url() -> String {
    "http://127.0.0.1:8090".to_string()
}

fn default_host_timeout() -> u64 {
    10
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            url: default_host_url(),
            timeout_secs: default_host_timeout(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PoolConfig {
    /// Base URL of the worker pool's batch API.
    #[serde(default = "default_pool_url")]
    pub url: String,

    /// Seconds between batch status polls while awaiting completion.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// Maximum seconds to wait for a batch. Unset means wait forever,
    /// which matches an operator-attended run.
    #[serde(default)]
    pub max_wait_secs: Option<u64>,

    /// Where detailed worker logs live, quoted to the operator when a
    /// batch partially fails.
    #[serde(default)]
    pub dashboard_url: Option<String>,
}

fn default_pool_url() -> String {
    "http://127.0.0.1:8700".to_string()
}

fn default_poll_interval() -> u64 {
    5
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            url: default_pool_url(),
            poll_interval_secs: default_poll_interval(),
            max_wait_secs: None,
            dashboard_url: None,
        }
    }
}

/// Per-bucket classification toggles. A disabled stage passes its clips
/// through untouched to the next stage.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HandlerConfig {
    #[serde(default = "default_true")]
    pub handle_already_linked: bool,

    #[serde(default = "default_true")]
    pub handle_offline: bool,

    #[serde(default = "default_true")]
    pub handle_existing_unlinked: bool,
}

fn default_true() -> bool {
    true
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            handle_already_linked: true,
            handle_offline: true,
            handle_existing_unlinked: true,
        }
    }
}
