//! Business layer errors
//!
//! Every failure surfaced to the presentation layer is a [`BusinessError`];
//! [`BusinessError::kind`] folds it into one [`ErrorKind`].

use crate::auth::AuthError;
use crate::guard::Action;
use bankdesk_core::{CoreError, Role};
use bankdesk_persistence::PersistenceError;
use std::fmt;
use thiserror::Error;

/// Coarse error classification shown to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    DuplicateKey,
    InvalidInput,
    InsufficientFunds,
    /// Illegal loan transition, or a delete blocked by live loans
    InvalidState,
    PermissionDenied,
    PersistenceFailure,
    AuthenticationFailed,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::DuplicateKey => "duplicate_key",
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::InsufficientFunds => "insufficient_funds",
            ErrorKind::InvalidState => "invalid_state",
            ErrorKind::PermissionDenied => "permission_denied",
            ErrorKind::PersistenceFailure => "persistence_failure",
            ErrorKind::AuthenticationFailed => "authentication_failed",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Business operation errors
#[derive(Debug, Error)]
pub enum BusinessError {
    // === Permission errors ===
    #[error("Permission denied: {role} may not {operation}")]
    PermissionDenied { role: String, operation: String },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(#[from] AuthError),

    // === Wrapped errors ===
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Persistence failure: {0}")]
    Persistence(#[from] PersistenceError),
}

/// Result type alias for business operations
pub type BusinessResult<T> = Result<T, BusinessError>;

impl BusinessError {
    /// Create permission denied error
    pub fn permission_denied(role: &Role, action: Action) -> Self {
        Self::PermissionDenied {
            role: role.to_string(),
            operation: action.as_str().to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            BusinessError::PermissionDenied { .. } => ErrorKind::PermissionDenied,
            BusinessError::AuthenticationFailed(_) => ErrorKind::AuthenticationFailed,
            BusinessError::Persistence(_) => ErrorKind::PersistenceFailure,
            BusinessError::Core(err) => match err {
                CoreError::AccountNotFound(_) | CoreError::LoanNotFound(_) => ErrorKind::NotFound,
                CoreError::AccountAlreadyExists(_) => ErrorKind::DuplicateKey,
                CoreError::InvalidAmount(_)
                | CoreError::InvalidTerm(_)
                | CoreError::ValidationError(_) => ErrorKind::InvalidInput,
                CoreError::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
                CoreError::LoanNotPending { .. }
                | CoreError::OutstandingLoans { .. }
                | CoreError::LoanIdExhausted { .. } => ErrorKind::InvalidState,
            },
        }
    }

    pub fn is_permission_denied(&self) -> bool {
        self.kind() == ErrorKind::PermissionDenied
    }
}
