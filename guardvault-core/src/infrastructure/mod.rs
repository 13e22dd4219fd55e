//! Infrastructure layer: collaborators, I/O and process-wide services.

pub mod audit;
pub mod config;
pub mod logging;
pub mod registry;
pub mod storage;
pub mod verifier;
