//! Application layer: orchestration across domain logic and infrastructure I/O.

pub mod coordinator;
pub mod lifecycle;
pub mod locks;

pub use coordinator::WithdrawalCoordinator;
pub use lifecycle::{AuditLoggingObserver, CompositeObserver, NoopObserver, WithdrawalObserver};
pub use locks::LockTable;
