//! Coordinator integration tests.
//!
//! Wired up via the explicit `[[test]]` target in `guardvault-core/Cargo.toml`.

mod concurrent_signing;
mod config_loading;
mod dependency_failures;
