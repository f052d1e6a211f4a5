//! In-memory stores
//!
//! Explicit store instances, passed to every operation instead of living in
//! process-wide state.

pub mod accounts;
pub mod loans;

pub use accounts::{AccountStore, BalanceChange};
pub use loans::{ApprovalOutcome, LoanCounts, LoanStore};
