//! Authentication capability
//!
//! Login sits outside the core: a provider turns [`Credentials`] into a
//! [`Role`] or refuses. [`DirectoryAuthProvider`] checks a static
//! directory from [`AuthConfig`], and for customers the set of existing
//! account numbers.

use bankdesk_core::{AccountStore, Role};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// What a caller presents at login
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    Admin { password: String },
    Employee { id: String, password: String },
    User { account_no: String },
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credentials::Admin { .. } => f.write_str("Admin { password: *** }"),
            Credentials::Employee { id, .. } => write!(f, "Employee {{ id: {:?}, password: *** }}", id),
            Credentials::User { account_no } => write!(f, "User {{ account_no: {:?} }}", account_no),
        }
    }
}

/// Authentication failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("invalid admin password")]
    InvalidAdminPassword,

    #[error("invalid credentials for employee {0}")]
    InvalidEmployeeCredentials(String),

    #[error("no account with number {0}")]
    UnknownAccount(String),
}

/// Verifies credentials and yields the authenticated role
pub trait AuthenticationProvider {
    fn verify(&self, credentials: &Credentials) -> Result<Role, AuthError>;
}

/// Static credential directory
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_admin_password")]
    pub admin_password: String,

    /// Employee id -> password
    #[serde(default = "default_employees")]
    pub employees: BTreeMap<String, String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("admin_password", &"***")
            .field("employees", &self.employees.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn default_admin_password() -> String {
    "admin123".to_string()
}

fn default_employee_id() -> String {
    "employee1".to_string()
}

fn default_employee_password() -> String {
    "emp123".to_string()
}

fn default_employees() -> BTreeMap<String, String> {
    BTreeMap::from([(default_employee_id(), default_employee_password())])
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            admin_password: default_admin_password(),
            employees: default_employees(),
        }
    }
}

impl AuthConfig {
    /// Defaults overlaid with `BANKDESK_ADMIN_PASSWORD`,
    /// `BANKDESK_EMPLOYEE_ID` and `BANKDESK_EMPLOYEE_PASSWORD`
    pub fn from_env() -> Self {
        Self::default().with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Apply environment-style overrides from any lookup function.
    ///
    /// Setting either employee variable replaces the directory with that
    /// single employee; the other half falls back to its default.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(password) = lookup("BANKDESK_ADMIN_PASSWORD") {
            self.admin_password = password;
        }

        let id = lookup("BANKDESK_EMPLOYEE_ID").filter(|id| !id.trim().is_empty());
        let password = lookup("BANKDESK_EMPLOYEE_PASSWORD");
        if id.is_some() || password.is_some() {
            let id = id.map(|id| id.trim().to_string()).unwrap_or_else(default_employee_id);
            let password = password.unwrap_or_else(default_employee_password);
            self.employees = BTreeMap::from([(id, password)]);
        }

        self
    }
}

/// Provider backed by [`AuthConfig`] and the current account store
pub struct DirectoryAuthProvider<'a> {
    config: &'a AuthConfig,
    accounts: &'a AccountStore,
}

impl<'a> DirectoryAuthProvider<'a> {
    pub fn new(config: &'a AuthConfig, accounts: &'a AccountStore) -> Self {
        Self { config, accounts }
    }
}

impl AuthenticationProvider for DirectoryAuthProvider<'_> {
    fn verify(&self, credentials: &Credentials) -> Result<Role, AuthError> {
        let result = match credentials {
            Credentials::Admin { password } => {
                if *password == self.config.admin_password {
                    Ok(Role::admin())
                } else {
                    Err(AuthError::InvalidAdminPassword)
                }
            }
            Credentials::Employee { id, password } => {
                let id = id.trim();
                match self.config.employees.get(id) {
                    Some(expected) if expected == password => Ok(Role::employee(id)),
                    _ => Err(AuthError::InvalidEmployeeCredentials(id.to_string())),
                }
            }
            Credentials::User { account_no } => {
                let account_no = account_no.trim();
                if self.accounts.contains(account_no) {
                    Ok(Role::user(account_no))
                } else {
                    Err(AuthError::UnknownAccount(account_no.to_string()))
                }
            }
        };

        match &result {
            Ok(role) => tracing::info!(role = %role, "Login succeeded"),
            Err(e) => tracing::warn!(error = %e, "Login failed"),
        }
        result
    }
}
