//! Authorization guard
//!
//! One policy table maps (role, action) to an access decision. Every
//! sensitive call in [`crate::service::BankService`] goes through
//! [`AuthorizationGuard::check`] before touching any state.
//!
//! | Action             | Admin | Employee      | User          |
//! |--------------------|-------|---------------|---------------|
//! | create account     | yes   | yes           | no            |
//! | delete account     | yes   | no            | no            |
//! | deposit / withdraw | yes   | yes           | own account   |
//! | view all accounts  | yes   | no            | no            |
//! | view account       | yes   | yes           | own account   |
//! | apply loan         | yes   | yes           | own account   |
//! | view loans         | all   | own-submitted | own-applicant |
//! | approve / reject   | yes   | no            | no            |
//! | view / clear audit | yes   | no            | no            |
//! | save snapshot      | yes   | no            | no            |

use crate::error::{BusinessError, BusinessResult};
use bankdesk_core::Role;
use std::fmt;

/// Guarded operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    // === Accounts ===
    CreateAccount,
    DeleteAccount,
    Deposit,
    Withdraw,
    ViewAllAccounts,
    ViewAccount,

    // === Loans ===
    ApplyLoan,
    /// Scoped per role by `LoanStore::list_for`
    ViewLoans,
    ApproveLoan,
    RejectLoan,

    // === Administration ===
    ViewAuditLog,
    ClearAuditLog,
    SaveSnapshot,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::CreateAccount => "create account",
            Action::DeleteAccount => "delete account",
            Action::Deposit => "deposit",
            Action::Withdraw => "withdraw",
            Action::ViewAllAccounts => "view all accounts",
            Action::ViewAccount => "view account",
            Action::ApplyLoan => "apply for loan",
            Action::ViewLoans => "view loans",
            Action::ApproveLoan => "approve loan",
            Action::RejectLoan => "reject loan",
            Action::ViewAuditLog => "view audit log",
            Action::ClearAuditLog => "clear audit log",
            Action::SaveSnapshot => "save snapshot",
        }
    }

    pub fn all() -> Vec<Action> {
        vec![
            Action::CreateAccount,
            Action::DeleteAccount,
            Action::Deposit,
            Action::Withdraw,
            Action::ViewAllAccounts,
            Action::ViewAccount,
            Action::ApplyLoan,
            Action::ViewLoans,
            Action::ApproveLoan,
            Action::RejectLoan,
            Action::ViewAuditLog,
            Action::ClearAuditLog,
            Action::SaveSnapshot,
        ]
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Policy decision for a (role, action) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    Deny,
    /// Allowed only when the target account is the caller's own
    OwnAccountOnly,
}

/// The policy table
pub fn policy(role: &Role, action: Action) -> Access {
    use Action::*;

    match (role, action) {
        (Role::Admin, _) => Access::Allow,

        (
            Role::Employee(_),
            CreateAccount | Deposit | Withdraw | ViewAccount | ApplyLoan | ViewLoans,
        ) => Access::Allow,
        (Role::Employee(_), _) => Access::Deny,

        (Role::User(_), Deposit | Withdraw | ViewAccount | ApplyLoan) => Access::OwnAccountOnly,
        (Role::User(_), ViewLoans) => Access::Allow,
        (Role::User(_), _) => Access::Deny,
    }
}

/// Stateless guard over [`policy`]
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthorizationGuard;

impl AuthorizationGuard {
    /// True if `role` may perform `action` on the `target` account
    pub fn permits(role: &Role, action: Action, target: Option<&str>) -> bool {
        match policy(role, action) {
            Access::Allow => true,
            Access::Deny => false,
            Access::OwnAccountOnly => target.is_some_and(|acc_no| role.owns_account(acc_no)),
        }
    }

    /// Fail with PermissionDenied unless allowed
    pub fn check(role: &Role, action: Action, target: Option<&str>) -> BusinessResult<()> {
        let allowed = Self::permits(role, action, target);
        tracing::debug!(
            role = %role,
            action = action.as_str(),
            target = ?target,
            allowed,
            "Authorization check"
        );

        if allowed {
            Ok(())
        } else {
            Err(BusinessError::permission_denied(role, action))
        }
    }
}
