mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    // Try default locations
    let default_paths = [
        "./config.toml",
        "./proxybridge.toml",
        "~/.config/proxybridge/config.toml",
        "/etc/proxybridge/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    // Return default config if no file found
    Ok(Config::default())
}

/// Validate configuration
fn validate_config(config: &Config) -> Result<()> {
    if config.pool.url.is_empty() {
        anyhow::bail!("Worker pool URL cannot be empty");
    }

    if config.host.url.is_empty() {
        anyhow::bail!("Host bridge URL cannot be empty");
    }

    if config.pool.poll_interval_secs == 0 {
        anyhow::bail!("Pool poll interval cannot be 0");
    }

    if config.paths.extensions.is_empty() {
        anyhow::bail!("Proxy extension allow-list cannot be empty");
    }

    if !config.paths.proxy_ext.starts_with('.') {
        anyhow::bail!(
            "Proxy output extension must start with a dot: {:?}",
            config.paths.proxy_ext
        );
    }

    if !config.paths.proxy_root.exists() {
        tracing::warn!("Proxy root does not exist: {:?}", config.paths.proxy_root);
    }

    Ok(())
}
