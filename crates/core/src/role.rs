//! # Role Module
//!
//! Defines Role - who is calling into the core, together with the
//! identity that scopes what they may touch.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Authenticated caller.
///
/// - `Admin`: full access
/// - `Employee(id)`: staff member acting on behalf of customers
/// - `User(acc_no)`: customer, bound to their own account number
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "role", content = "id", rename_all = "lowercase")]
pub enum Role {
    Admin,
    Employee(String),
    User(String),
}

impl Role {
    pub fn admin() -> Self {
        Role::Admin
    }

    pub fn employee(id: &str) -> Self {
        Role::Employee(id.to_string())
    }

    pub fn user(acc_no: &str) -> Self {
        Role::User(acc_no.to_string())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Employee(_) => "employee",
            Role::User(_) => "user",
        }
    }

    /// Employee id or account number; `None` for the admin
    pub fn identity(&self) -> Option<&str> {
        match self {
            Role::Admin => None,
            Role::Employee(id) => Some(id),
            Role::User(acc_no) => Some(acc_no),
        }
    }

    /// Label used in audit lines: `ADMIN`, `EMP:<id>`, `USER:<acc_no>`
    pub fn actor_label(&self) -> String {
        match self {
            Role::Admin => "ADMIN".to_string(),
            Role::Employee(id) => format!("EMP:{}", id),
            Role::User(acc_no) => format!("USER:{}", acc_no),
        }
    }

    /// True when this caller is the customer owning `acc_no`
    pub fn owns_account(&self, acc_no: &str) -> bool {
        matches!(self, Role::User(own) if own == acc_no)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.identity() {
            Some(id) => write!(f, "{} ({})", self.as_str(), id),
            None => write!(f, "{}", self.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_identity() {
        assert_eq!(Role::admin().identity(), None);
        assert_eq!(Role::employee("employee1").identity(), Some("employee1"));
        assert_eq!(Role::user("A1").identity(), Some("A1"));
    }

    #[test]
    fn test_actor_label() {
        assert_eq!(Role::admin().actor_label(), "ADMIN");
        assert_eq!(Role::employee("employee1").actor_label(), "EMP:employee1");
        assert_eq!(Role::user("A1").actor_label(), "USER:A1");
    }

    #[test]
    fn test_owns_account() {
        assert!(Role::user("A1").owns_account("A1"));
        assert!(!Role::user("A1").owns_account("A2"));
        assert!(!Role::employee("A1").owns_account("A1"));
        assert!(!Role::admin().owns_account("A1"));
    }

    #[test]
    fn test_role_display() {
        assert_eq!(Role::admin().to_string(), "admin");
        assert_eq!(Role::user("A1").to_string(), "user (A1)");
    }
}
