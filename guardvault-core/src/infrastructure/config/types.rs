use crate::domain::Guardian;
use crate::foundation::util::decimal;
use crate::foundation::{Address, B256, U256};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub rpc: RpcConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Seeds the static guardian registry.
    #[serde(default)]
    pub guardians: Vec<GuardianEntryConfig>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub data_dir: String,
    /// Append-only JSONL audit file. Relative paths resolve against `data_dir`.
    #[serde(default)]
    pub audit_log_path: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RpcConfig {
    #[serde(default)]
    pub addr: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub rate_limit_rps: Option<u32>,
    #[serde(default)]
    pub rate_limit_burst: Option<u32>,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self { addr: String::new(), token: None, enabled: true, rate_limit_rps: None, rate_limit_burst: None }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter expression understood by `init_logger` (e.g. `"info,guardvault_core=debug"`).
    #[serde(default)]
    pub filters: String,
    #[serde(default)]
    pub log_dir: Option<String>,
}

/// One `[[guardians]]` table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardianEntryConfig {
    pub vault: Address,
    pub address: Address,
    #[serde(with = "decimal")]
    pub token_id: U256,
    pub token_address: Address,
    #[serde(default)]
    pub granted_at_block: u64,
    #[serde(default)]
    pub granted_tx_hash: B256,
}

impl GuardianEntryConfig {
    pub fn to_guardian(&self) -> Guardian {
        Guardian {
            address: self.address,
            token_id: self.token_id,
            token_address: self.token_address,
            granted_at_block: self.granted_at_block,
            granted_tx_hash: self.granted_tx_hash,
        }
    }
}
