//! Login - turn the global flags into credentials and a role

use anyhow::{bail, Context, Result};
use bankdesk_business::{AuthConfig, AuthenticationProvider, Credentials, DirectoryAuthProvider};
use bankdesk_core::{AccountStore, Role};

use crate::{Cli, RoleArg};

fn credentials(cli: &Cli) -> Result<Credentials> {
    let Some(role) = cli.role else {
        bail!("--role is required (admin, employee or user)");
    };

    let credentials = match role {
        RoleArg::Admin => Credentials::Admin {
            password: cli.password.clone().context("--password is required for admin")?,
        },
        RoleArg::Employee => Credentials::Employee {
            id: cli
                .employee_id
                .clone()
                .context("--employee-id is required for employee")?,
            password: cli
                .password
                .clone()
                .context("--password is required for employee")?,
        },
        RoleArg::User => Credentials::User {
            account_no: cli.account.clone().context("--account is required for user")?,
        },
    };
    Ok(credentials)
}

/// Authenticate against the static directory and the loaded accounts
pub fn login(cli: &Cli, auth: &AuthConfig, accounts: &AccountStore) -> Result<Role> {
    let credentials = credentials(cli)?;
    let role = DirectoryAuthProvider::new(auth, accounts)
        .verify(&credentials)
        .context("Login failed")?;
    Ok(role)
}
