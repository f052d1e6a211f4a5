//! Account management commands

use anyhow::{Context, Result};
use bankdesk_business::{BankService, NewAccount};
use bankdesk_core::{cents, Account, Role};

use crate::AccountAction;

/// Handle account subcommands
pub fn handle(service: &mut BankService, role: &Role, action: AccountAction) -> Result<()> {
    match action {
        AccountAction::Create {
            acc_no,
            name,
            gender,
            mobile,
            r#type,
            balance,
        } => {
            let account = service
                .create_account(
                    role,
                    NewAccount {
                        acc_no,
                        name,
                        gender,
                        mobile,
                        account_type: r#type.to_core_type(),
                        balance,
                    },
                )
                .context("Failed to create account")?;
            println!("✅ Created account:");
            print_account(&account);
        }
        AccountAction::Delete { acc_no } => {
            let account = service
                .delete_account(role, &acc_no)
                .with_context(|| format!("Failed to delete account {}", acc_no))?;
            println!("🗑️  Deleted {}", account);
        }
        AccountAction::Deposit { acc_no, amount } => {
            let balance = service
                .deposit(role, &acc_no, amount)
                .with_context(|| format!("Failed to deposit into {}", acc_no))?;
            println!(
                "✅ Deposited {:.2} to {} (balance: {:.2})",
                cents(amount),
                acc_no,
                cents(balance)
            );
        }
        AccountAction::Withdraw { acc_no, amount } => {
            let balance = service
                .withdraw(role, &acc_no, amount)
                .with_context(|| format!("Failed to withdraw from {}", acc_no))?;
            println!(
                "✅ Withdrew {:.2} from {} (balance: {:.2})",
                cents(amount),
                acc_no,
                cents(balance)
            );
        }
        AccountAction::Show { acc_no } => match service.find_account(role, &acc_no)? {
            Some(account) => {
                println!("📋 Account Details");
                print_account(account);
            }
            None => println!("❌ Account '{}' not found", acc_no),
        },
        AccountAction::List => list_accounts(service.list_accounts(role)?),
    }

    Ok(())
}

fn print_account(account: &Account) {
    println!("   Account No: {}", account.acc_no);
    println!("   Name:       {}", account.name);
    println!("   Gender:     {}", account.gender);
    println!("   Mobile:     {}", account.mobile);
    println!("   Type:       {}", account.account_type);
    println!("   Balance:    {:.2}", cents(account.balance));
}

fn list_accounts(accounts: &[Account]) {
    if accounts.is_empty() {
        println!("No accounts found.");
        return;
    }

    println!(
        "{:<12} {:<20} {:<8} {:<14} {:<8} {:>14}",
        "ACCOUNT", "NAME", "GENDER", "MOBILE", "TYPE", "BALANCE"
    );
    println!("{}", "-".repeat(81));
    for a in accounts {
        println!(
            "{:<12} {:<20} {:<8} {:<14} {:<8} {:>14.2}",
            a.acc_no,
            a.name,
            a.gender,
            a.mobile,
            a.account_type.as_str(),
            cents(a.balance)
        );
    }
}
