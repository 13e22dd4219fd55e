use clap::Parser;
use guardvault_core::infrastructure::config::{CONFIG_PATH_ENV, DATA_DIR_ENV};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "guardvault-service")]
#[command(about = "Guardian quorum withdrawal coordinator", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override data directory
    #[arg(short, long)]
    pub data_dir: Option<PathBuf>,

    /// Override the JSON-RPC bind address
    #[arg(long)]
    pub rpc_addr: Option<String>,

    /// Log filters, e.g. `info,guardvault_core=debug` (defaults to `logging.filters`)
    #[arg(short, long)]
    pub log_filters: Option<String>,

    /// Load and validate the configuration, then exit
    #[arg(long)]
    pub check_config: bool,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Forwards path overrides to the config loader through its environment variables.
    pub fn apply_to_env(&self) {
        if let Some(config_path) = &self.config {
            std::env::set_var(CONFIG_PATH_ENV, config_path);
        }
        if let Some(data_dir) = &self.data_dir {
            std::env::set_var(DATA_DIR_ENV, data_dir);
        }
        if let Some(addr) = &self.rpc_addr {
            std::env::set_var("GUARDVAULT_RPC__ADDR", addr);
        }
    }
}
