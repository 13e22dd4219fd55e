mod env;
mod loader;
mod types;
pub mod validation;

pub use env::*;
pub use loader::{load_config, load_config_from_file};
pub use types::*;

use crate::foundation::GuardError;
use std::path::Path;

pub fn load_app_config() -> Result<AppConfig, GuardError> {
    let data_dir = resolve_data_dir()?;
    let config_path = resolve_config_path(&data_dir)?;
    let config = load_config_from_file(&config_path, &data_dir)?;
    config.validate().map_err(|errors| GuardError::ConfigError(format!("validation failed: {:?}", errors)))?;
    Ok(config)
}

pub fn load_app_config_from_path(path: &Path) -> Result<AppConfig, GuardError> {
    let data_dir = resolve_data_dir()?;
    let config = load_config_from_file(path, &data_dir)?;
    config.validate().map_err(|errors| GuardError::ConfigError(format!("validation failed: {:?}", errors)))?;
    Ok(config)
}
