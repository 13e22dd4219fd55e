//! Configuration loader using Figment for layered config management.
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. TOML config file
//! 3. Environment variables (`GUARDVAULT_*` prefix, `__` separates nesting)

use crate::foundation::{GuardError, DEFAULT_RPC_ADDR};
use crate::infrastructure::config::env::CONFIG_FILE_NAME;
use crate::infrastructure::config::types::AppConfig;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use log::{debug, info};
use std::path::Path;

const DEFAULT_LOG_FILTERS: &str = "info";

/// Environment variable prefix for config overrides.
///
/// Example: `GUARDVAULT_RPC__ADDR` -> `rpc.addr`
const ENV_PREFIX: &str = "GUARDVAULT_";

/// Load configuration from the default file in `data_dir` (`guardvault.toml`).
pub fn load_config(data_dir: &Path) -> Result<AppConfig, GuardError> {
    let config_path = data_dir.join(CONFIG_FILE_NAME);
    load_config_from_file(&config_path, data_dir)
}

/// Load configuration from a specific file path.
pub fn load_config_from_file(path: &Path, data_dir: &Path) -> Result<AppConfig, GuardError> {
    info!("loading configuration path={} data_dir={}", path.display(), data_dir.display());
    let figment = figment_base(path).merge(Env::prefixed(ENV_PREFIX).split("__"));
    let mut config: AppConfig = figment.extract().map_err(|e| GuardError::ConfigError(format!("config extraction failed: {e}")))?;
    postprocess(&mut config, data_dir);
    debug!(
        "configuration loaded rpc_addr={} rpc_enabled={} rpc_token_set={} guardians={}",
        config.rpc.addr,
        config.rpc.enabled,
        config.rpc.token.is_some(),
        config.guardians.len()
    );
    Ok(config)
}

fn figment_base(path: &Path) -> Figment {
    let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));
    if path.exists() {
        figment = figment.merge(Toml::file(path));
    } else {
        debug!("configuration file missing; using defaults and env only path={}", path.display());
    }
    figment
}

fn postprocess(config: &mut AppConfig, data_dir: &Path) {
    if config.service.data_dir.trim().is_empty() {
        config.service.data_dir = data_dir.to_string_lossy().to_string();
    }
    if config.rpc.addr.trim().is_empty() {
        config.rpc.addr = DEFAULT_RPC_ADDR.to_string();
    }
    if config.logging.filters.trim().is_empty() {
        config.logging.filters = DEFAULT_LOG_FILTERS.to_string();
    }
    if let Some(audit_path) = config.service.audit_log_path.as_mut() {
        let candidate = Path::new(audit_path.as_str());
        if candidate.is_relative() {
            *audit_path = Path::new(&config.service.data_dir).join(candidate).to_string_lossy().to_string();
        }
    }
    if config.rpc.token.as_deref().is_some_and(|token| token.trim().is_empty()) {
        config.rpc.token = None;
    }
}
