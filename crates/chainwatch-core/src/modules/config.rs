use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use chainwatch_types::{ConfigError, MonitorConfig};
use validator::Validate;

use crate::rpc::is_address;

const CONFIG_DIR: &str = "chainwatch";
const CONFIG_FILE: &str = "config.json";

/// Default config location: `<data dir>/chainwatch/config.json`.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    let data_dir = dirs::data_dir().ok_or_else(|| ConfigError::Missing {
        path: "<data dir>".to_string(),
    })?;
    Ok(data_dir.join(CONFIG_DIR).join(CONFIG_FILE))
}

/// Load and validate the config at `path`.
pub fn load_config(path: &Path) -> Result<MonitorConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ConfigError::Missing {
            path: path.display().to_string(),
        },
        _ => ConfigError::unreadable(path, e),
    })?;

    let config: MonitorConfig =
        serde_json::from_str(&content).map_err(|e| ConfigError::unreadable(path, e))?;
    validate(&config)?;

    tracing::debug!(
        path = %path.display(),
        chains = config.chains.len(),
        accounts = config.accounts.len(),
        "Config loaded"
    );
    Ok(config)
}

/// Like [`load_config`], but a missing file yields the default config.
pub fn load_config_or_default(path: &Path) -> Result<MonitorConfig, ConfigError> {
    match load_config(path) {
        Err(ConfigError::Missing { .. }) => {
            tracing::info!(path = %path.display(), "No config file; using defaults");
            Ok(MonitorConfig::default())
        },
        other => other,
    }
}

/// Validate and write `config` to `path` atomically.
pub fn save_config(path: &Path, config: &MonitorConfig) -> Result<(), ConfigError> {
    validate(config)?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| ConfigError::unwritable(path, e))?;
    }

    let content =
        serde_json::to_string_pretty(config).map_err(|e| ConfigError::unwritable(path, e))?;

    // Atomic write
    let temp_path = path.with_extension("json.tmp");
    fs::write(&temp_path, content).map_err(|e| ConfigError::unwritable(path, e))?;
    fs::rename(&temp_path, path).map_err(|e| ConfigError::unwritable(path, e))
}

/// Field-level checks plus the cross-field rules derive(Validate) cannot express.
///
/// Accounts and token contracts must be 20-byte hex addresses. A bad one
/// would otherwise fail identically on every endpoint of a chain.
pub fn validate(config: &MonitorConfig) -> Result<(), ConfigError> {
    config.validate().map_err(|errors| {
        let field = errors
            .field_errors()
            .keys()
            .next()
            .map_or_else(|| "config".to_string(), ToString::to_string);
        ConfigError::invalid(field, errors.to_string())
    })?;

    let mut seen = HashSet::new();
    for chain in &config.chains {
        if !seen.insert(chain.name.as_str()) {
            return Err(ConfigError::invalid(
                "chains",
                format!("Duplicate chain name: {}", chain.name),
            ));
        }

        for rpc in &chain.rpc_urls {
            let parsed = url::Url::parse(rpc).map_err(|e| {
                ConfigError::invalid(
                    format!("chains.{}.rpc_urls", chain.name),
                    format!("Invalid RPC URL {rpc}: {e}"),
                )
            })?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(ConfigError::invalid(
                    format!("chains.{}.rpc_urls", chain.name),
                    format!("Unsupported RPC scheme: {}", parsed.scheme()),
                ));
            }
        }

        if let Some(token) = chain.tokens.iter().find(|t| !is_address(&t.contract)) {
            return Err(ConfigError::invalid(
                format!("chains.{}.tokens.{}.contract", chain.name, token.symbol),
                format!("Not a contract address: '{}'", token.contract),
            ));
        }
    }

    if let Some(account) = config.accounts.iter().find(|a| !is_address(a)) {
        return Err(ConfigError::invalid(
            "accounts",
            format!("Not a 20-byte hex address: '{account}'"),
        ));
    }

    Ok(())
}
