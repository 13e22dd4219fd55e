use crate::foundation::GuardError;
use std::path::{Path, PathBuf};

pub const CONFIG_PATH_ENV: &str = "GUARDVAULT_CONFIG_PATH";
pub const DATA_DIR_ENV: &str = "GUARDVAULT_DATA_DIR";
pub const CONFIG_FILE_NAME: &str = "guardvault.toml";
pub const DEFAULT_DATA_DIR_NAME: &str = ".guardvault";

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
}

pub fn resolve_config_path(data_dir: &Path) -> Result<PathBuf, GuardError> {
    if let Some(value) = non_empty_env(CONFIG_PATH_ENV) {
        return Ok(PathBuf::from(value));
    }
    Ok(data_dir.join(CONFIG_FILE_NAME))
}

pub fn resolve_data_dir() -> Result<PathBuf, GuardError> {
    if let Some(value) = non_empty_env(DATA_DIR_ENV) {
        return Ok(PathBuf::from(value));
    }
    let cwd = std::env::current_dir().map_err(|err| crate::storage_err!("env::current_dir", err))?;
    Ok(cwd.join(DEFAULT_DATA_DIR_NAME))
}
