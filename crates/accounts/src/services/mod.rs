//! Business logic services for the account directory.
//!
//! # Services
//!
//! - `accounts` - User validation, registration, updates and password login

pub mod accounts;
