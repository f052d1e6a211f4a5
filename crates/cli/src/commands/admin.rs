//! Save and status commands

use anyhow::{Context, Result};
use bankdesk_business::BankService;
use bankdesk_core::{cents, Role};

pub fn save(service: &BankService, role: &Role) -> Result<()> {
    service.save(role).context("Failed to save snapshot")?;
    let storage = service.storage();
    println!("✅ Saved to {}", storage.config().data_dir.display());
    Ok(())
}

pub fn status(service: &BankService, role: &Role) -> Result<()> {
    let summary = service.summary(role)?;
    let config = service.storage().config();

    println!("📊 Bank Status");
    println!("   Data dir:      {}", config.data_dir.display());
    println!("   Autosave:      {}", if config.autosave { "on" } else { "off" });
    println!();
    println!("   Accounts:      {}", summary.accounts);
    println!("   Total balance: {:.2}", cents(summary.total_balance));
    println!(
        "   Loans:         {} pending, {} approved, {} rejected",
        summary.loans.pending, summary.loans.approved, summary.loans.rejected
    );
    Ok(())
}
