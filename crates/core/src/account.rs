//! # Account Module
//!
//! Defines Account, a customer bank account keyed by its account number.
//! The balance is a `Decimal` and never goes below zero.

use crate::error::{CoreError, CoreResult};
use crate::money::cents;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Product type of an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountType {
    Savings,
    Current,
    Fixed,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Savings => "Savings",
            AccountType::Current => "Current",
            AccountType::Fixed => "Fixed",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A customer account.
///
/// `acc_no` is fixed at creation; only `balance` changes afterwards, through
/// [`Account::credit`] and [`Account::debit`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Account number (unique key)
    pub acc_no: String,
    /// Holder name
    pub name: String,
    pub gender: String,
    pub mobile: String,
    #[serde(rename = "type")]
    pub account_type: AccountType,
    pub balance: Decimal,
}

impl Account {
    /// Build an account after validating the key fields and opening balance
    pub fn new(
        acc_no: &str,
        name: &str,
        gender: &str,
        mobile: &str,
        account_type: AccountType,
        balance: Decimal,
    ) -> CoreResult<Self> {
        let acc_no = acc_no.trim();
        let name = name.trim();

        if acc_no.is_empty() {
            return Err(CoreError::ValidationError(
                "Account number must not be empty".to_string(),
            ));
        }
        if name.is_empty() {
            return Err(CoreError::ValidationError(
                "Account name must not be empty".to_string(),
            ));
        }
        if balance < Decimal::ZERO {
            return Err(CoreError::InvalidAmount(format!(
                "Opening balance must not be negative: {}",
                balance
            )));
        }

        Ok(Self {
            acc_no: acc_no.to_string(),
            name: name.to_string(),
            gender: gender.trim().to_string(),
            mobile: mobile.trim().to_string(),
            account_type,
            balance,
        })
    }

    /// Add a strictly positive amount to the balance
    pub fn credit(&mut self, amount: Decimal) -> CoreResult<Decimal> {
        if amount <= Decimal::ZERO {
            return Err(CoreError::InvalidAmount(format!(
                "Deposit amount must be positive: {}",
                amount
            )));
        }
        self.balance = self.balance.checked_add(amount).ok_or_else(|| {
            CoreError::InvalidAmount(format!(
                "Deposit of {} would overflow balance of {}",
                amount, self.acc_no
            ))
        })?;
        Ok(self.balance)
    }

    /// Remove a strictly positive amount, never below zero.
    ///
    /// On failure the balance is left untouched.
    pub fn debit(&mut self, amount: Decimal) -> CoreResult<Decimal> {
        if amount <= Decimal::ZERO {
            return Err(CoreError::InvalidAmount(format!(
                "Withdrawal amount must be positive: {}",
                amount
            )));
        }
        if amount > self.balance {
            return Err(CoreError::InsufficientFunds {
                needed: amount,
                available: self.balance,
            });
        }
        self.balance -= amount;
        Ok(self.balance)
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Account {} ({}, {}, balance: {:.2})",
            self.acc_no,
            self.name,
            self.account_type,
            cents(self.balance)
        )
    }
}
