//! Loan commands

use anyhow::{Context, Result};
use bankdesk_business::{BankService, LoanRequest};
use bankdesk_core::{cents, ApprovalOutcome, Loan, Role};

use crate::LoanAction;

/// Handle loan subcommands
pub fn handle(service: &mut BankService, role: &Role, action: LoanAction) -> Result<()> {
    match action {
        LoanAction::Apply {
            applicant,
            amount,
            term,
            purpose,
        } => {
            let loan = service
                .apply_loan(
                    role,
                    LoanRequest {
                        applicant_acc_no: applicant,
                        amount,
                        term_months: term,
                        purpose,
                    },
                )
                .context("Failed to apply for loan")?;
            println!("✅ Loan application submitted: {}", loan.loan_id);
            println!("   {}", loan);
        }
        LoanAction::List => list_loans(&service.list_loans(role)?),
        LoanAction::Approve { loan_id, confirm } => {
            let outcome = service
                .approve_loan(role, &loan_id, confirm)
                .with_context(|| format!("Failed to approve {}", loan_id))?;
            match outcome {
                ApprovalOutcome::Approved(loan) => println!("✅ Approved {}", loan),
                ApprovalOutcome::NeedsConfirmation {
                    loan_id,
                    applicant,
                    existing_approved,
                } => {
                    println!(
                        "⚠️  Account {} already has approved loan(s): {}",
                        applicant,
                        existing_approved.join(", ")
                    );
                    println!("   {} is still pending. Re-run with --confirm to approve anyway.", loan_id);
                }
            }
        }
        LoanAction::Reject { loan_id, note } => {
            let loan = service
                .reject_loan(role, &loan_id, note.as_deref())
                .with_context(|| format!("Failed to reject {}", loan_id))?;
            println!("❌ Rejected {}", loan);
        }
    }

    Ok(())
}

fn list_loans(loans: &[&Loan]) {
    if loans.is_empty() {
        println!("No loans found.");
        return;
    }

    println!(
        "{:<12} {:<12} {:>12} {:>6} {:<9} {:<18} {}",
        "LOAN", "APPLICANT", "AMOUNT", "TERM", "STATUS", "APPLIED BY", "PURPOSE"
    );
    println!("{}", "-".repeat(90));
    for l in loans {
        println!(
            "{:<12} {:<12} {:>12.2} {:>6} {:<9} {:<18} {}",
            l.loan_id,
            l.applicant_acc_no,
            cents(l.amount),
            l.term_months,
            l.status.as_str(),
            format!("{}({})", l.applied_by, l.applied_by_id),
            l.purpose
        );
    }
}
