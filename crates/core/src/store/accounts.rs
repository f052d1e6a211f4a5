//! AccountStore - CRUD and balance operations over accounts
//!
//! Accounts are kept in insertion order; the account number is the key.

use crate::account::{Account, AccountType};
use crate::error::{CoreError, CoreResult};
use rust_decimal::Decimal;

/// Balance before and after a deposit or withdrawal
#[derive(Debug, Clone, PartialEq)]
pub struct BalanceChange {
    pub acc_no: String,
    pub amount: Decimal,
    pub before: Decimal,
    pub after: Decimal,
}

/// In-memory account collection
#[derive(Debug, Clone, Default)]
pub struct AccountStore {
    accounts: Vec<Account>,
}

impl AccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from a snapshot; duplicate keys are rejected
    pub fn from_accounts(accounts: Vec<Account>) -> CoreResult<Self> {
        let mut store = Self::new();
        for account in accounts {
            if store.contains(&account.acc_no) {
                return Err(CoreError::AccountAlreadyExists(account.acc_no));
            }
            store.accounts.push(account);
        }
        Ok(store)
    }

    fn position(&self, acc_no: &str) -> Option<usize> {
        self.accounts.iter().position(|a| a.acc_no == acc_no)
    }

    fn get_mut(&mut self, acc_no: &str) -> CoreResult<&mut Account> {
        self.accounts
            .iter_mut()
            .find(|a| a.acc_no == acc_no)
            .ok_or_else(|| CoreError::AccountNotFound(acc_no.to_string()))
    }

    /// Create a new account. The store is unchanged on any error.
    pub fn create(
        &mut self,
        acc_no: &str,
        name: &str,
        gender: &str,
        mobile: &str,
        account_type: AccountType,
        balance: Decimal,
    ) -> CoreResult<Account> {
        let account = Account::new(acc_no, name, gender, mobile, account_type, balance)?;
        if self.contains(&account.acc_no) {
            return Err(CoreError::AccountAlreadyExists(account.acc_no));
        }
        self.accounts.push(account.clone());
        Ok(account)
    }

    /// Remove an account, returning it
    pub fn delete(&mut self, acc_no: &str) -> CoreResult<Account> {
        let idx = self
            .position(acc_no)
            .ok_or_else(|| CoreError::AccountNotFound(acc_no.to_string()))?;
        Ok(self.accounts.remove(idx))
    }

    pub fn deposit(&mut self, acc_no: &str, amount: Decimal) -> CoreResult<BalanceChange> {
        let account = self.get_mut(acc_no)?;
        let before = account.balance;
        let after = account.credit(amount)?;
        Ok(BalanceChange {
            acc_no: acc_no.to_string(),
            amount,
            before,
            after,
        })
    }

    pub fn withdraw(&mut self, acc_no: &str, amount: Decimal) -> CoreResult<BalanceChange> {
        let account = self.get_mut(acc_no)?;
        let before = account.balance;
        let after = account.debit(amount)?;
        Ok(BalanceChange {
            acc_no: acc_no.to_string(),
            amount,
            before,
            after,
        })
    }

    pub fn find(&self, acc_no: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.acc_no == acc_no)
    }

    pub fn contains(&self, acc_no: &str) -> bool {
        self.position(acc_no).is_some()
    }

    /// All accounts, in insertion order
    pub fn list_all(&self) -> &[Account] {
        &self.accounts
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Sum of all balances; fails instead of overflowing
    pub fn total_balance(&self) -> CoreResult<Decimal> {
        self.accounts
            .iter()
            .try_fold(Decimal::ZERO, |total, a| total.checked_add(a.balance))
            .ok_or_else(|| CoreError::InvalidAmount("Total balance overflows".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn store_with_alice() -> AccountStore {
        let mut store = AccountStore::new();
        store
            .create("A1", "Alice", "F", "555", AccountType::Savings, dec!(100.0))
            .unwrap();
        store
    }

    #[test]
    fn test_create_and_find() {
        let store = store_with_alice();
        let alice = store.find("A1").unwrap();
        assert_eq!(alice.name, "Alice");
        assert_eq!(alice.balance, dec!(100.0));
        assert!(store.find("A2").is_none());
    }

    #[test]
    fn test_create_duplicate_leaves_store_unchanged() {
        let mut store = store_with_alice();
        let err = store
            .create("A1", "Mallory", "M", "000", AccountType::Current, dec!(999))
            .unwrap_err();
        assert!(err.is_duplicate_key());
        assert_eq!(store.len(), 1);
        assert_eq!(store.find("A1").unwrap().name, "Alice");
    }

    #[test]
    fn test_create_invalid_input() {
        let mut store = AccountStore::new();
        assert!(store
            .create("A1", "Alice", "F", "555", AccountType::Savings, dec!(-1))
            .unwrap_err()
            .is_invalid_input());
        assert!(store
            .create("", "Alice", "F", "555", AccountType::Savings, dec!(1))
            .unwrap_err()
            .is_invalid_input());
        assert!(store.is_empty());
    }

    #[test]
    fn test_deposit_then_overdraw() {
        let mut store = store_with_alice();

        let change = store.deposit("A1", dec!(50)).unwrap();
        assert_eq!(change.before, dec!(100.0));
        assert_eq!(change.after, dec!(150.0));

        let err = store.withdraw("A1", dec!(200)).unwrap_err();
        assert!(err.is_insufficient_funds());
        assert_eq!(store.find("A1").unwrap().balance, dec!(150.0));
    }

    #[test]
    fn test_withdraw_exact_balance() {
        let mut store = store_with_alice();
        let change = store.withdraw("A1", dec!(100)).unwrap();
        assert_eq!(change.after, dec!(0));
    }

    #[test]
    fn test_operations_on_missing_account() {
        let mut store = store_with_alice();
        assert!(store.deposit("ZZ", dec!(1)).unwrap_err().is_not_found());
        assert!(store.withdraw("ZZ", dec!(1)).unwrap_err().is_not_found());
        assert!(store.delete("ZZ").unwrap_err().is_not_found());
    }

    #[test]
    fn test_delete() {
        let mut store = store_with_alice();
        let removed = store.delete("A1").unwrap();
        assert_eq!(removed.acc_no, "A1");
        assert!(store.is_empty());
    }

    #[test]
    fn test_list_all_insertion_order() {
        let mut store = AccountStore::new();
        for acc in ["C3", "A1", "B2"] {
            store
                .create(acc, "Holder", "", "", AccountType::Current, dec!(1))
                .unwrap();
        }
        let keys: Vec<&str> = store.list_all().iter().map(|a| a.acc_no.as_str()).collect();
        assert_eq!(keys, vec!["C3", "A1", "B2"]);
        assert_eq!(store.total_balance().unwrap(), dec!(3));
    }

    #[test]
    fn test_total_balance_overflow_is_an_error() {
        let mut store = AccountStore::new();
        for acc in ["A1", "B2"] {
            store
                .create(acc, "Holder", "", "", AccountType::Current, Decimal::MAX)
                .unwrap();
        }
        assert!(store.total_balance().unwrap_err().is_invalid_input());
        assert!(store.deposit("A1", dec!(1)).unwrap_err().is_invalid_input());
        assert_eq!(store.find("A1").unwrap().balance, Decimal::MAX);
    }

    #[test]
    fn test_from_accounts_rejects_duplicates() {
        let alice = Account::new("A1", "Alice", "F", "555", AccountType::Savings, dec!(1)).unwrap();
        let err = AccountStore::from_accounts(vec![alice.clone(), alice]).unwrap_err();
        assert!(err.is_duplicate_key());
    }

    /// Balance stays non-negative across a mixed sequence of operations
    #[test]
    fn test_balance_never_negative() {
        let mut store = store_with_alice();
        let ops: [(bool, Decimal); 8] = [
            (false, dec!(60)),
            (false, dec!(60)),
            (true, dec!(0.5)),
            (false, dec!(40.5)),
            (false, dec!(0.01)),
            (true, dec!(10)),
            (false, dec!(10.01)),
            (false, dec!(10)),
        ];
        for (is_deposit, amount) in ops {
            let before = store.find("A1").unwrap().balance;
            let result = if is_deposit {
                store.deposit("A1", amount)
            } else {
                store.withdraw("A1", amount)
            };
            let after = store.find("A1").unwrap().balance;
            match result {
                Ok(change) => {
                    assert_eq!(change.after, after);
                    if is_deposit {
                        assert_eq!(after, before + amount);
                    } else {
                        assert_eq!(after, before - amount);
                    }
                }
                Err(err) => {
                    assert!(err.is_insufficient_funds());
                    assert_eq!(after, before);
                }
            }
            assert!(after >= Decimal::ZERO);
        }
    }
}
