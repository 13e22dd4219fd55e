use crate::infrastructure::config::types::AppConfig;
use std::collections::HashSet;
use std::net::SocketAddr;

impl AppConfig {
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.rpc.enabled && self.rpc.addr.parse::<SocketAddr>().is_err() {
            errors.push(format!("invalid rpc.addr: {}", self.rpc.addr));
        }
        if self.rpc.rate_limit_rps == Some(0) {
            errors.push("rpc.rate_limit_rps must be > 0 when set".to_string());
        }
        if self.rpc.rate_limit_burst == Some(0) {
            errors.push("rpc.rate_limit_burst must be > 0 when set".to_string());
        }

        let mut seen = HashSet::new();
        for (idx, entry) in self.guardians.iter().enumerate() {
            if entry.vault.is_zero() {
                errors.push(format!("guardians[{}].vault must not be the zero address", idx));
            }
            if entry.address.is_zero() {
                errors.push(format!("guardians[{}].address must not be the zero address", idx));
            }
            if !seen.insert((entry.vault, entry.address)) {
                errors.push(format!("guardians[{}] duplicates guardian {} for vault {}", idx, entry.address, entry.vault));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
