//! # Bankdesk Core
//!
//! Domain types and in-memory stores for accounts and loan applications.
//!
//! ## Modules
//!
//! - [`account`] - Account, AccountType
//! - [`loan`] - Loan, LoanStatus, Submitter
//! - [`role`] - Role (Admin | Employee(id) | User(acc_no))
//! - [`audit`] - AuditLogEntry and its line format
//! - [`money`] - cents rounding for display
//! - [`store`] - AccountStore, LoanStore
//! - [`error`] - CoreError

pub mod account;
pub mod audit;
pub mod error;
pub mod loan;
pub mod money;
pub mod role;
pub mod store;

pub use account::{Account, AccountType};
pub use audit::{AuditLogEntry, TIMESTAMP_FORMAT};
pub use error::{CoreError, CoreResult};
pub use loan::{Loan, LoanStatus, Submitter};
pub use money::cents;
pub use role::Role;
pub use store::{AccountStore, ApprovalOutcome, BalanceChange, LoanCounts, LoanStore};
