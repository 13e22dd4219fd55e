//! Domain layer: pure models and rules. No I/O, no async.

pub mod activity;
pub mod audit;
pub mod canonical;
pub mod guardian;
pub mod quorum;
pub mod withdrawal;

pub use activity::{AccountActivity, ActivityType};
pub use guardian::Guardian;
pub use quorum::QuorumReport;
pub use withdrawal::{PendingWithdrawalRequest, SignedWithdrawal, WithdrawalRequest, WithdrawalStatus};
