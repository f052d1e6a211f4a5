//! # Error Module
//!
//! Domain errors for Bankdesk, built with thiserror.

use crate::loan::LoanStatus;
use rust_decimal::Decimal;
use thiserror::Error;

/// Core domain errors.
///
/// Business-rule failures only; nothing here touches infrastructure.
#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    // === Lookup errors ===
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Loan not found: {0}")]
    LoanNotFound(String),

    // === Key errors ===
    #[error("Account already exists: {0}")]
    AccountAlreadyExists(String),

    // === Validation errors ===
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid term: {0} months")]
    InvalidTerm(i64),

    #[error("Validation error: {0}")]
    ValidationError(String),

    // === Money errors ===
    #[error("Insufficient funds: need {needed}, available {available}")]
    InsufficientFunds { needed: Decimal, available: Decimal },

    // === State errors ===
    #[error("Loan {loan_id} is {status}, only pending loans can change status")]
    LoanNotPending { loan_id: String, status: LoanStatus },

    #[error("Account {account} has {count} outstanding loan(s)")]
    OutstandingLoans { account: String, count: usize },

    #[error("No unused loan id after {attempts} attempts")]
    LoanIdExhausted { attempts: u32 },
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CoreError::AccountNotFound(_) | CoreError::LoanNotFound(_)
        )
    }

    pub fn is_duplicate_key(&self) -> bool {
        matches!(self, CoreError::AccountAlreadyExists(_))
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            CoreError::InvalidAmount(_) | CoreError::InvalidTerm(_) | CoreError::ValidationError(_)
        )
    }

    pub fn is_insufficient_funds(&self) -> bool {
        matches!(self, CoreError::InsufficientFunds { .. })
    }

    /// Illegal loan transition, a delete blocked by loans still in flight,
    /// or a loan id space that keeps colliding
    pub fn is_invalid_state(&self) -> bool {
        matches!(
            self,
            CoreError::LoanNotPending { .. }
                | CoreError::OutstandingLoans { .. }
                | CoreError::LoanIdExhausted { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_display() {
        let err = CoreError::InsufficientFunds {
            needed: dec!(200),
            available: dec!(150),
        };
        assert_eq!(err.to_string(), "Insufficient funds: need 200, available 150");

        let err = CoreError::AccountNotFound("A1".to_string());
        assert_eq!(err.to_string(), "Account not found: A1");

        let err = CoreError::LoanNotPending {
            loan_id: "LN-1234ABCD".to_string(),
            status: LoanStatus::Approved,
        };
        assert!(err.to_string().contains("LN-1234ABCD"));
        assert!(err.to_string().contains("approved"));
    }

    #[test]
    fn test_error_checks() {
        assert!(CoreError::LoanNotFound("LN-X".to_string()).is_not_found());
        assert!(CoreError::AccountAlreadyExists("A1".to_string()).is_duplicate_key());
        assert!(CoreError::InvalidTerm(0).is_invalid_input());
        assert!(CoreError::OutstandingLoans {
            account: "A1".to_string(),
            count: 1
        }
        .is_invalid_state());
        assert!(!CoreError::InvalidAmount("-1".to_string()).is_insufficient_funds());
    }
}
