//! Bank service facade
//!
//! [`BankService`] owns both stores and the storage handles. Every
//! operation runs the same pipeline:
//!
//! ```text
//! guard check ──▶ store mutation ──▶ audit append ──▶ autosave
//! ```
//!
//! A denied or invalid call stops before the mutation. Once the mutation
//! is committed it stays committed; a failing audit append or save is
//! returned as a persistence failure without rolling anything back.

use crate::error::{BusinessError, BusinessResult};
use crate::guard::{Action, AuthorizationGuard};
use bankdesk_core::{
    cents, Account, AccountStore, AccountType, ApprovalOutcome, AuditLogEntry, CoreError, Loan,
    LoanCounts, LoanStore, Role, Submitter,
};
use bankdesk_persistence::{LoadWarning, Storage, StorageConfig};
use rust_decimal::Decimal;
use std::fmt;

/// Input for [`BankService::create_account`]
#[derive(Debug, Clone, PartialEq)]
pub struct NewAccount {
    pub acc_no: String,
    pub name: String,
    pub gender: String,
    pub mobile: String,
    pub account_type: AccountType,
    pub balance: Decimal,
}

/// Input for [`BankService::apply_loan`]
#[derive(Debug, Clone, PartialEq)]
pub struct LoanRequest {
    pub applicant_acc_no: String,
    pub amount: Decimal,
    pub term_months: i64,
    pub purpose: String,
}

/// Admin overview of the whole bank
#[derive(Debug, Clone, PartialEq)]
pub struct BankSummary {
    pub accounts: usize,
    pub total_balance: Decimal,
    pub loans: LoanCounts,
}

impl fmt::Display for BankSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} account(s), total balance {:.2}; loans: {} pending, {} approved, {} rejected",
            self.accounts,
            cents(self.total_balance),
            self.loans.pending,
            self.loans.approved,
            self.loans.rejected
        )
    }
}

/// Guarded, audited access to accounts and loans
pub struct BankService {
    accounts: AccountStore,
    loans: LoanStore,
    storage: Storage,
    load_warnings: Vec<LoadWarning>,
}

impl BankService {
    /// Load both snapshots and wire up storage. Missing or corrupt
    /// snapshots start empty and are reported through [`Self::load_warnings`].
    pub fn open(config: StorageConfig) -> Self {
        let storage = Storage::open(config);
        let loaded = storage.snapshots().load();
        tracing::info!(
            accounts = loaded.accounts.len(),
            loans = loaded.loans.len(),
            warnings = loaded.warnings.len(),
            "Bank state loaded"
        );

        Self {
            accounts: loaded.accounts,
            loans: loaded.loans,
            storage,
            load_warnings: loaded.warnings,
        }
    }

    pub fn load_warnings(&self) -> &[LoadWarning] {
        &self.load_warnings
    }

    /// Unguarded read access for collaborators such as authentication
    pub fn accounts(&self) -> &AccountStore {
        &self.accounts
    }

    /// Unguarded read access to the loan store
    pub fn loans(&self) -> &LoanStore {
        &self.loans
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    // === Accounts ===

    pub fn create_account(&mut self, role: &Role, new: NewAccount) -> BusinessResult<Account> {
        AuthorizationGuard::check(role, Action::CreateAccount, None)?;

        let account = self.accounts.create(
            &new.acc_no,
            &new.name,
            &new.gender,
            &new.mobile,
            new.account_type,
            new.balance,
        )?;
        tracing::info!(account = %account.acc_no, by = %role, "Account created");

        let text = match role {
            Role::Employee(id) => format!(
                "EMP-ADD: Account {} ({}) created by {} with balance {:.2}",
                account.acc_no,
                account.name,
                id,
                cents(account.balance)
            ),
            _ => format!(
                "ADD: Account {} ({}) created by {} with balance {:.2}",
                account.acc_no,
                account.name,
                role.actor_label(),
                cents(account.balance)
            ),
        };
        self.record(&text)?;
        Ok(account)
    }

    /// Remove an account. Blocked while it has Pending or Approved loans.
    pub fn delete_account(&mut self, role: &Role, acc_no: &str) -> BusinessResult<Account> {
        AuthorizationGuard::check(role, Action::DeleteAccount, Some(acc_no))?;

        if !self.accounts.contains(acc_no) {
            return Err(CoreError::AccountNotFound(acc_no.to_string()).into());
        }
        let outstanding = self.loans.outstanding_for(acc_no);
        if outstanding > 0 {
            tracing::warn!(account = %acc_no, outstanding, "Delete blocked by outstanding loans");
            return Err(CoreError::OutstandingLoans {
                account: acc_no.to_string(),
                count: outstanding,
            }
            .into());
        }

        let account = self.accounts.delete(acc_no)?;
        tracing::info!(account = %account.acc_no, "Account deleted");

        self.record(&format!(
            "DELETE: Account {} ({}) removed by {}",
            account.acc_no,
            account.name,
            role.actor_label()
        ))?;
        Ok(account)
    }

    /// Credit an account; returns the new balance
    pub fn deposit(&mut self, role: &Role, acc_no: &str, amount: Decimal) -> BusinessResult<Decimal> {
        AuthorizationGuard::check(role, Action::Deposit, Some(acc_no))?;

        let change = self.accounts.deposit(acc_no, amount)?;
        tracing::info!(account = %acc_no, %amount, balance = %change.after, "Deposit");

        self.record(&format!(
            "DEPOSIT by {}: {:.2} to {} ({:.2} -> {:.2})",
            role.actor_label(),
            cents(change.amount),
            change.acc_no,
            cents(change.before),
            cents(change.after)
        ))?;
        Ok(change.after)
    }

    /// Debit an account; returns the new balance
    pub fn withdraw(&mut self, role: &Role, acc_no: &str, amount: Decimal) -> BusinessResult<Decimal> {
        AuthorizationGuard::check(role, Action::Withdraw, Some(acc_no))?;

        let change = self.accounts.withdraw(acc_no, amount)?;
        tracing::info!(account = %acc_no, %amount, balance = %change.after, "Withdrawal");

        self.record(&format!(
            "WITHDRAW by {}: {:.2} from {} ({:.2} -> {:.2})",
            role.actor_label(),
            cents(change.amount),
            change.acc_no,
            cents(change.before),
            cents(change.after)
        ))?;
        Ok(change.after)
    }

    pub fn find_account(&self, role: &Role, acc_no: &str) -> BusinessResult<Option<&Account>> {
        AuthorizationGuard::check(role, Action::ViewAccount, Some(acc_no))?;
        Ok(self.accounts.find(acc_no))
    }

    pub fn list_accounts(&self, role: &Role) -> BusinessResult<&[Account]> {
        AuthorizationGuard::check(role, Action::ViewAllAccounts, None)?;
        Ok(self.accounts.list_all())
    }

    // === Loans ===

    /// Submit an application on behalf of the caller
    pub fn apply_loan(&mut self, role: &Role, request: LoanRequest) -> BusinessResult<Loan> {
        let applicant = request.applicant_acc_no.trim();
        AuthorizationGuard::check(role, Action::ApplyLoan, Some(applicant))?;

        let (submitter, submitter_id) = Submitter::from_role(role);
        let loan = self.loans.apply(
            &self.accounts,
            applicant,
            request.amount,
            request.term_months,
            &request.purpose,
            submitter,
            &submitter_id,
        )?;
        tracing::info!(loan_id = %loan.loan_id, account = %loan.applicant_acc_no, "Loan application submitted");

        self.record(&format!(
            "LOAN_APPLY: {} applied by {}({}) for {:.2} term {}",
            loan.loan_id,
            loan.applied_by,
            loan.applied_by_id,
            cents(loan.amount),
            loan.term_months
        ))?;
        Ok(loan)
    }

    /// Approve a pending loan.
    ///
    /// Returns [`ApprovalOutcome::NeedsConfirmation`] without any change
    /// when the applicant already holds an approved loan and `confirmed`
    /// is false.
    pub fn approve_loan(
        &mut self,
        role: &Role,
        loan_id: &str,
        confirmed: bool,
    ) -> BusinessResult<ApprovalOutcome> {
        AuthorizationGuard::check(role, Action::ApproveLoan, None)?;

        let outcome = self.loans.approve(loan_id, confirmed)?;
        match &outcome {
            ApprovalOutcome::Approved(loan) => {
                tracing::info!(loan_id = %loan.loan_id, "Loan approved");
                self.record(&format!(
                    "LOAN_APPROVE: {} approved by {}",
                    loan.loan_id,
                    role.actor_label()
                ))?;
            }
            ApprovalOutcome::NeedsConfirmation {
                applicant,
                existing_approved,
                ..
            } => {
                tracing::warn!(
                    loan_id = %loan_id,
                    account = %applicant,
                    existing = existing_approved.len(),
                    "Applicant already holds approved loans; confirmation required"
                );
            }
        }
        Ok(outcome)
    }

    /// Reject a pending loan, optionally annotating its purpose
    pub fn reject_loan(&mut self, role: &Role, loan_id: &str, note: Option<&str>) -> BusinessResult<Loan> {
        AuthorizationGuard::check(role, Action::RejectLoan, None)?;

        let loan = self.loans.reject(loan_id, note)?;
        tracing::info!(loan_id = %loan.loan_id, "Loan rejected");

        self.record(&format!(
            "LOAN_REJECT: {} rejected by {} ({})",
            loan.loan_id,
            role.actor_label(),
            note.map(str::trim).unwrap_or_default()
        ))?;
        Ok(loan)
    }

    /// Loans visible to the caller, in insertion order
    pub fn list_loans(&self, role: &Role) -> BusinessResult<Vec<&Loan>> {
        AuthorizationGuard::check(role, Action::ViewLoans, None)?;
        Ok(self.loans.list_for(role))
    }

    // === Administration ===

    pub fn audit_entries(&self, role: &Role) -> BusinessResult<Vec<AuditLogEntry>> {
        AuthorizationGuard::check(role, Action::ViewAuditLog, None)?;
        Ok(self.storage.audit().entries()?)
    }

    /// Irreversibly truncate the audit log
    pub fn clear_audit(&self, role: &Role) -> BusinessResult<()> {
        AuthorizationGuard::check(role, Action::ClearAuditLog, None)?;
        self.storage.audit().clear()?;
        Ok(())
    }

    pub fn summary(&self, role: &Role) -> BusinessResult<BankSummary> {
        AuthorizationGuard::check(role, Action::ViewAllAccounts, None)?;
        Ok(BankSummary {
            accounts: self.accounts.len(),
            total_balance: self.accounts.total_balance()?,
            loans: self.loans.counts(),
        })
    }

    /// Explicit "save now"
    pub fn save(&self, role: &Role) -> BusinessResult<()> {
        AuthorizationGuard::check(role, Action::SaveSnapshot, None)?;
        self.persist()
    }

    /// Save on graceful shutdown, whoever is logged in
    pub fn shutdown(&self) -> BusinessResult<()> {
        self.persist()?;
        tracing::info!("Bank state saved on shutdown");
        Ok(())
    }

    // === Internals ===

    /// Audit a committed mutation, then autosave if enabled
    fn record(&self, text: &str) -> BusinessResult<()> {
        if let Err(e) = self.storage.audit().append(text) {
            tracing::error!(error = %e, "Audit append failed after committed mutation");
            return Err(e.into());
        }
        if self.storage.config().autosave {
            self.persist()?;
        }
        Ok(())
    }

    fn persist(&self) -> BusinessResult<()> {
        self.storage
            .snapshots()
            .save(&self.accounts, &self.loans)
            .map_err(|e| {
                tracing::error!(error = %e, "Snapshot save failed");
                BusinessError::from(e)
            })
    }
}
