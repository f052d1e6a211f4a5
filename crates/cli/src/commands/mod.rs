//! Command handlers, one module per command group

pub mod account;
pub mod admin;
pub mod audit;
pub mod loan;
