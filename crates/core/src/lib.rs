//! Jungle Core - Shared types library.
//!
//! This crate provides common types used across all Jungle components:
//! - `accounts` - The account directory (user records, validation, login)
//! - `cli` - Command-line tools for migrations and user management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and normalized emails

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
