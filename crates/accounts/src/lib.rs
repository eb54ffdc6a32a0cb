//! Jungle Accounts - the shop's account directory.
//!
//! Owns user records: validates candidates, stores them with an Argon2id
//! password hash, and authenticates email/password credentials.
//!
//! ```no_run
//! use jungle_accounts::config::HashingConfig;
//! use jungle_accounts::db::MemoryUserStore;
//! use jungle_accounts::models::NewUser;
//! use jungle_accounts::services::accounts::{AccountDirectory, Argon2Hasher};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let hasher = Argon2Hasher::new(&HashingConfig::default())?;
//! let directory = AccountDirectory::new(MemoryUserStore::new(), hasher)?;
//!
//! directory
//!     .save(&NewUser::new("name", "test@test.com", "password", "password"))
//!     .await?;
//!
//! let user = directory
//!     .authenticate_with_credentials("tEsT@tEST.com", "password")
//!     .await?;
//! assert!(user.is_some());
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod models;
pub mod services;
pub mod validation;

pub use services::accounts::{AccountDirectory, AccountError};
