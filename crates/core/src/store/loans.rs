//! LoanStore - application submission and status transitions
//!
//! Loans are never deleted; they leave Pending exactly once.

use crate::error::{CoreError, CoreResult};
use crate::loan::{Loan, LoanStatus, Submitter};
use crate::role::Role;
use crate::store::accounts::AccountStore;
use rust_decimal::Decimal;

/// Fresh ids drawn before `apply` gives up on a colliding generator
const MAX_ID_ATTEMPTS: u32 = 32;

/// Result of an approval attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum ApprovalOutcome {
    /// Status is now Approved
    Approved(Loan),
    /// Applicant already holds approved loan(s); nothing changed.
    /// Call again with `confirmed = true` to approve anyway.
    NeedsConfirmation {
        loan_id: String,
        applicant: String,
        existing_approved: Vec<String>,
    },
}

impl ApprovalOutcome {
    pub fn is_approved(&self) -> bool {
        matches!(self, ApprovalOutcome::Approved(_))
    }
}

/// Per-status loan counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoanCounts {
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
}

/// In-memory loan collection
#[derive(Debug, Clone)]
pub struct LoanStore {
    loans: Vec<Loan>,
    id_generator: fn() -> String,
}

impl Default for LoanStore {
    fn default() -> Self {
        Self {
            loans: Vec::new(),
            id_generator: Loan::generate_id,
        }
    }
}

impl LoanStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from a snapshot; duplicate loan ids are rejected
    pub fn from_loans(loans: Vec<Loan>) -> CoreResult<Self> {
        let mut store = Self::new();
        for loan in loans {
            if store.find(&loan.loan_id).is_some() {
                return Err(CoreError::ValidationError(format!(
                    "Duplicate loan id: {}",
                    loan.loan_id
                )));
            }
            store.loans.push(loan);
        }
        Ok(store)
    }

    /// Replace the id generator (tests use this to force collisions)
    pub fn with_id_generator(mut self, generator: fn() -> String) -> Self {
        self.id_generator = generator;
        self
    }

    fn next_loan_id(&self) -> CoreResult<String> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = (self.id_generator)();
            if self.find(&id).is_none() {
                return Ok(id);
            }
        }
        Err(CoreError::LoanIdExhausted {
            attempts: MAX_ID_ATTEMPTS,
        })
    }

    fn get_mut(&mut self, loan_id: &str) -> CoreResult<&mut Loan> {
        self.loans
            .iter_mut()
            .find(|l| l.loan_id == loan_id)
            .ok_or_else(|| CoreError::LoanNotFound(loan_id.to_string()))
    }

    /// Submit a new application in Pending state.
    ///
    /// The applicant must name an existing account in `accounts`.
    #[allow(clippy::too_many_arguments)]
    pub fn apply(
        &mut self,
        accounts: &AccountStore,
        applicant_acc_no: &str,
        amount: Decimal,
        term_months: i64,
        purpose: &str,
        applied_by: Submitter,
        applied_by_id: &str,
    ) -> CoreResult<Loan> {
        let applicant_acc_no = applicant_acc_no.trim();
        if !accounts.contains(applicant_acc_no) {
            return Err(CoreError::AccountNotFound(applicant_acc_no.to_string()));
        }

        let loan = Loan::new(
            self.next_loan_id()?,
            applicant_acc_no,
            amount,
            term_months,
            purpose,
            applied_by,
            applied_by_id,
        )?;
        self.loans.push(loan.clone());
        Ok(loan)
    }

    /// Approve a pending loan.
    ///
    /// When the applicant already has another approved loan and `confirmed`
    /// is false, returns [`ApprovalOutcome::NeedsConfirmation`] without
    /// changing anything.
    pub fn approve(&mut self, loan_id: &str, confirmed: bool) -> CoreResult<ApprovalOutcome> {
        let (applicant, status) = match self.find(loan_id) {
            Some(loan) => (loan.applicant_acc_no.clone(), loan.status),
            None => return Err(CoreError::LoanNotFound(loan_id.to_string())),
        };
        if status != LoanStatus::Pending {
            return Err(CoreError::LoanNotPending {
                loan_id: loan_id.to_string(),
                status,
            });
        }

        let existing_approved = self.approved_for(&applicant, loan_id);
        if !existing_approved.is_empty() && !confirmed {
            return Ok(ApprovalOutcome::NeedsConfirmation {
                loan_id: loan_id.to_string(),
                applicant,
                existing_approved,
            });
        }

        let loan = self.get_mut(loan_id)?;
        loan.approve()?;
        Ok(ApprovalOutcome::Approved(loan.clone()))
    }

    /// Reject a pending loan, optionally annotating its purpose
    pub fn reject(&mut self, loan_id: &str, note: Option<&str>) -> CoreResult<Loan> {
        let loan = self.get_mut(loan_id)?;
        loan.reject(note)?;
        Ok(loan.clone())
    }

    /// Loans visible to a caller, in insertion order.
    ///
    /// - Admin: every loan
    /// - Employee: loans that employee submitted
    /// - User: loans where they are the applicant
    pub fn list_for(&self, role: &Role) -> Vec<&Loan> {
        self.loans
            .iter()
            .filter(|loan| match role {
                Role::Admin => true,
                Role::Employee(id) => {
                    loan.applied_by == Submitter::Employee && &loan.applied_by_id == id
                }
                Role::User(acc_no) => &loan.applicant_acc_no == acc_no,
            })
            .collect()
    }

    pub fn find(&self, loan_id: &str) -> Option<&Loan> {
        self.loans.iter().find(|l| l.loan_id == loan_id)
    }

    pub fn list_all(&self) -> &[Loan] {
        &self.loans
    }

    /// Ids of approved loans held by `acc_no`, other than `except`
    pub fn approved_for(&self, acc_no: &str, except: &str) -> Vec<String> {
        self.loans
            .iter()
            .filter(|l| {
                l.applicant_acc_no == acc_no
                    && l.status == LoanStatus::Approved
                    && l.loan_id != except
            })
            .map(|l| l.loan_id.clone())
            .collect()
    }

    /// Number of Pending or Approved loans for an account
    pub fn outstanding_for(&self, acc_no: &str) -> usize {
        self.loans
            .iter()
            .filter(|l| l.applicant_acc_no == acc_no && l.status.is_outstanding())
            .count()
    }

    pub fn counts(&self) -> LoanCounts {
        let mut counts = LoanCounts::default();
        for loan in &self.loans {
            match loan.status {
                LoanStatus::Pending => counts.pending += 1,
                LoanStatus::Approved => counts.approved += 1,
                LoanStatus::Rejected => counts.rejected += 1,
            }
        }
        counts
    }

    pub fn len(&self) -> usize {
        self.loans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loans.is_empty()
    }
}
