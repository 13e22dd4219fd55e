pub mod activity;
pub mod health;
pub mod rpc;
pub mod types;
pub mod withdrawal;
