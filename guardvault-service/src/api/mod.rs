mod handlers;
mod middleware;
mod router;
mod state;

pub use handlers::types::RpcErrorCode;
pub use middleware::rate_limit::RateLimiter;
pub use router::{build_router, run_json_rpc_server};
pub use state::RpcState;
