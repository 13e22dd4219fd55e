#[path = "guardvault-service/cli.rs"]
mod cli;
#[path = "guardvault-service/setup.rs"]
mod setup;

use crate::cli::Cli;
use guardvault_service::api::run_json_rpc_server;
use log::{info, warn};
use std::net::SocketAddr;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse_args();
    args.apply_to_env();

    let app_config = setup::load_app_config()?;
    if args.check_config {
        println!("configuration ok guardians={} rpc_addr={}", app_config.guardians.len(), app_config.rpc.addr);
        return Ok(());
    }

    setup::init_logging(&app_config, args.log_filters.as_deref())?;
    setup::init_audit(&app_config)?;
    info!(
        "guardvault-service starting data_dir={} rpc_enabled={} rpc_addr={} guardians={}",
        app_config.service.data_dir,
        app_config.rpc.enabled,
        app_config.rpc.addr,
        app_config.guardians.len()
    );

    let state = setup::build_state(&app_config)?;
    if !app_config.rpc.enabled {
        warn!("rpc.enabled=false; nothing to serve, exiting");
        return Ok(());
    }

    let rpc_addr: SocketAddr = app_config.rpc.addr.parse().map_err(|err| format!("invalid rpc.addr {}: {}", app_config.rpc.addr, err))?;
    info!(
        "starting json-rpc server rpc_addr={} rate_limit_rps={} rate_limit_burst={} auth={}",
        rpc_addr,
        state.rate_limit_rps,
        state.rate_limit_burst,
        state.rpc_token.is_some()
    );
    run_json_rpc_server(rpc_addr, state, setup::shutdown_signal()).await?;
    info!("guardvault-service stopped");
    Ok(())
}
