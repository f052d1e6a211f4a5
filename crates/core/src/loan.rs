//! # Loan Module
//!
//! Loan applications and their one-way status machine:
//!
//! ```text
//! Pending ──approve──▶ Approved
//!    │
//!    └────reject────▶ Rejected
//! ```

use crate::error::{CoreError, CoreResult};
use crate::money::cents;
use crate::role::Role;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a loan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    Pending,
    Approved,
    Rejected,
}

impl LoanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Pending => "pending",
            LoanStatus::Approved => "approved",
            LoanStatus::Rejected => "rejected",
        }
    }

    /// Pending or Approved loans still tie up the applicant's account
    pub fn is_outstanding(&self) -> bool {
        matches!(self, LoanStatus::Pending | LoanStatus::Approved)
    }
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which kind of caller submitted the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Submitter {
    Admin,
    Employee,
    User,
}

impl Submitter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Submitter::Admin => "ADMIN",
            Submitter::Employee => "EMPLOYEE",
            Submitter::User => "USER",
        }
    }

    /// Submitter kind and submitter id for a caller
    pub fn from_role(role: &Role) -> (Self, String) {
        match role {
            Role::Admin => (Submitter::Admin, "ADMIN".to_string()),
            Role::Employee(id) => (Submitter::Employee, id.clone()),
            Role::User(acc_no) => (Submitter::User, acc_no.clone()),
        }
    }
}

impl fmt::Display for Submitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A loan application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    /// Generated id, e.g. `LN-1A2B3C4D`
    pub loan_id: String,
    pub applicant_acc_no: String,
    pub amount: Decimal,
    pub term_months: u32,
    /// Free text; a rejection note may be appended
    pub purpose: String,
    pub status: LoanStatus,
    pub applied_by: Submitter,
    /// Employee id, applicant account number, or `ADMIN`
    pub applied_by_id: String,
}

impl Loan {
    /// New pending application. Amount and term are validated here.
    pub fn new(
        loan_id: String,
        applicant_acc_no: &str,
        amount: Decimal,
        term_months: i64,
        purpose: &str,
        applied_by: Submitter,
        applied_by_id: &str,
    ) -> CoreResult<Self> {
        if amount <= Decimal::ZERO {
            return Err(CoreError::InvalidAmount(format!(
                "Loan amount must be positive: {}",
                amount
            )));
        }
        let term_months = match u32::try_from(term_months) {
            Ok(term) if term > 0 => term,
            _ => return Err(CoreError::InvalidTerm(term_months)),
        };

        Ok(Self {
            loan_id,
            applicant_acc_no: applicant_acc_no.to_string(),
            amount,
            term_months,
            purpose: purpose.trim().to_string(),
            status: LoanStatus::Pending,
            applied_by,
            applied_by_id: applied_by_id.to_string(),
        })
    }

    /// Generate a loan id: `LN-` + 8 uppercase hex chars
    pub fn generate_id() -> String {
        let uuid = uuid::Uuid::new_v4().simple().to_string();
        format!("LN-{}", uuid[..8].to_uppercase())
    }

    pub fn is_pending(&self) -> bool {
        self.status == LoanStatus::Pending
    }

    fn ensure_pending(&self) -> CoreResult<()> {
        if self.is_pending() {
            Ok(())
        } else {
            Err(CoreError::LoanNotPending {
                loan_id: self.loan_id.clone(),
                status: self.status,
            })
        }
    }

    /// Pending -> Approved
    pub fn approve(&mut self) -> CoreResult<()> {
        self.ensure_pending()?;
        self.status = LoanStatus::Approved;
        Ok(())
    }

    /// Pending -> Rejected. A non-blank note is appended to `purpose`.
    pub fn reject(&mut self, note: Option<&str>) -> CoreResult<()> {
        self.ensure_pending()?;
        self.status = LoanStatus::Rejected;
        if let Some(note) = note.map(str::trim).filter(|n| !n.is_empty()) {
            self.purpose.push_str(" | Rejection note: ");
            self.purpose.push_str(note);
        }
        Ok(())
    }
}

impl fmt::Display for Loan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Loan {} for {} ({:.2} over {} months, {})",
            self.loan_id,
            self.applicant_acc_no,
            cents(self.amount),
            self.term_months,
            self.status
        )
    }
}
