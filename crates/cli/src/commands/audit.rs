//! Audit log commands

use anyhow::{Context, Result};
use bankdesk_business::BankService;
use bankdesk_core::Role;

use crate::AuditAction;

/// Handle audit subcommands
pub fn handle(service: &BankService, role: &Role, action: AuditAction) -> Result<()> {
    match action {
        AuditAction::Show => {
            let entries = service.audit_entries(role).context("Failed to read audit log")?;
            if entries.is_empty() {
                println!("Audit log is empty.");
                return Ok(());
            }
            println!("🔍 Audit Log ({} entries)", entries.len());
            for entry in entries {
                println!("{}", entry);
            }
        }
        AuditAction::Clear => {
            service.clear_audit(role).context("Failed to clear audit log")?;
            println!("🗑️  Audit log cleared");
        }
    }

    Ok(())
}
