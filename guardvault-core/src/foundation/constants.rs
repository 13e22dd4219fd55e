//! System-wide constants for the guardvault coordinator.

/// Nanoseconds per second (10^9).
pub const NANOS_PER_SECOND: u64 = 1_000_000_000;

/// Environment variable that pins `now_nanos()` for deterministic tests.
pub const TEST_NOW_NANOS_ENV_VAR: &str = "GUARDVAULT_TEST_NOW_NANOS";

/// Domain separation prefix of the canonical withdrawal payload.
///
/// Bump the version suffix whenever the field layout changes; old signatures
/// must never verify against a new layout.
pub const CANONICAL_DOMAIN_TAG: &[u8] = b"guardvault:withdrawal:v1:";

/// Recoverable ECDSA signature size (`r || s || v`).
pub const RECOVERABLE_SIGNATURE_SIZE: usize = 65;

/// Maximum length of the free-text withdrawal reason in bytes.
pub const MAX_REASON_LENGTH: usize = 1024;

/// Maximum number of guardians a single vault may require for quorum.
pub const MAX_QUORUM: u32 = 64;

/// Maximum JSON-RPC request body size (64 KiB).
pub const MAX_RPC_BODY_BYTES: usize = 64 * 1024;

/// Default JSON-RPC bind address.
pub const DEFAULT_RPC_ADDR: &str = "127.0.0.1:8088";

/// Default per-IP rate limit (requests per second).
pub const DEFAULT_RATE_LIMIT_RPS: u32 = 30;

/// Default per-IP burst allowance on top of the steady rate.
pub const DEFAULT_RATE_LIMIT_BURST: u32 = 60;

/// Rate limiter accounting window.
pub const RPC_RATE_LIMIT_WINDOW_SECS: u64 = 1;
pub const RPC_RATE_LIMIT_CLEANUP_INTERVAL_SECS: u64 = 60;
/// Idle per-IP buckets are dropped after this long.
pub const RPC_RATE_LIMIT_ENTRY_TTL_SECS: u64 = 300;
