//! # Bankdesk Business
//!
//! Business logic layer: the authorization policy, the authentication
//! capability, and the [`BankService`] facade the presentation layer
//! talks to.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bankdesk_business::{AuthConfig, AuthenticationProvider, BankService, Credentials, DirectoryAuthProvider};
//! use bankdesk_persistence::StorageConfig;
//!
//! let mut service = BankService::open(StorageConfig::from_env()?);
//! let auth = AuthConfig::from_env();
//! let role = DirectoryAuthProvider::new(&auth, service.accounts())
//!     .verify(&Credentials::Admin { password: "admin123".into() })?;
//! service.deposit(&role, "A1", dec!(50))?;
//! service.shutdown()?;
//! ```

pub mod auth;
pub mod error;
pub mod guard;
pub mod service;

pub use auth::{AuthConfig, AuthError, AuthenticationProvider, Credentials, DirectoryAuthProvider};
pub use error::{BusinessError, BusinessResult, ErrorKind};
pub use guard::{policy, Access, Action, AuthorizationGuard};
pub use service::{BankService, BankSummary, LoanRequest, NewAccount};
