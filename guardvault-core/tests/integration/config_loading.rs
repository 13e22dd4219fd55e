use alloy_primitives::address;
use guardvault_core::foundation::{GuardError, U256};
use guardvault_core::infrastructure::config::{load_config, load_config_from_file};
use guardvault_core::infrastructure::registry::{GuardianRegistry, StaticGuardianRegistry};
use std::fs;

const SAMPLE_TOML: &str = r#"
[service]
audit_log_path = "audit/withdrawals.jsonl"

[rpc]
addr = "127.0.0.1:9100"
enabled = true
token = "  "
rate_limit_rps = 10

[logging]
filters = "info,guardvault_core=debug"

[[guardians]]
vault = "0x0101010101010101010101010101010101010101"
address = "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf"
token_id = "7"
token_address = "0xEeEeeEeEeEeEeEeEeEeEeEeEeEeEeEeEeEeEeEeE"
granted_at_block = 42
"#;

// Environment overrides are process wide, so everything touching them lives in one test.
#[tokio::test]
async fn toml_file_then_env_overrides() -> Result<(), GuardError> {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("guardvault.toml");
    fs::write(&path, SAMPLE_TOML).expect("write config");

    let config = load_config_from_file(&path, dir.path())?;
    assert_eq!(config.rpc.addr, "127.0.0.1:9100");
    assert!(config.rpc.enabled);
    assert_eq!(config.rpc.token, None);
    assert_eq!(config.rpc.rate_limit_rps, Some(10));
    assert_eq!(config.service.data_dir, dir.path().to_string_lossy().to_string());
    let audit_path = config.service.audit_log_path.clone().expect("audit path");
    assert!(audit_path.ends_with("withdrawals.jsonl"));
    assert!(audit_path.starts_with(dir.path().to_string_lossy().as_ref()));
    assert_eq!(config.guardians.len(), 1);
    assert_eq!(config.guardians[0].token_id, U256::from(7u64));
    assert!(config.validate().is_ok());

    let vault = address!("0101010101010101010101010101010101010101");
    let registry = StaticGuardianRegistry::from_config(&config.guardians);
    assert!(registry.is_active_guardian(&vault, &address!("7E5F4552091A69125d5DfCb7b8C2659029395Bdf")).await?);

    std::env::set_var("GUARDVAULT_RPC__ADDR", "0.0.0.0:9200");
    let overridden = load_config_from_file(&path, dir.path());
    std::env::remove_var("GUARDVAULT_RPC__ADDR");
    assert_eq!(overridden?.rpc.addr, "0.0.0.0:9200");

    // No file at all falls back to defaults.
    let empty = tempfile::tempdir().expect("tempdir");
    let defaults = load_config(empty.path())?;
    assert_eq!(defaults.rpc.addr, guardvault_core::foundation::DEFAULT_RPC_ADDR);
    assert_eq!(defaults.logging.filters, "info");
    assert!(defaults.guardians.is_empty());
    Ok(())
}

#[test]
fn malformed_guardian_entry_is_a_config_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("guardvault.toml");
    fs::write(&path, "[[guardians]]\nvault = \"not-an-address\"\n").expect("write config");
    let err = load_config_from_file(&path, dir.path()).expect_err("invalid");
    assert!(matches!(err, GuardError::ConfigError(_)));
}
