//! User storage for the account directory.
//!
//! # Database: `jungle`
//!
//! ## Tables
//!
//! - `jungle.user` - Shop accounts. `normalized_email` carries a `UNIQUE`
//!   constraint, which is the authoritative guard against two accounts
//!   sharing an email.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/accounts/migrations/` and run via:
//! ```bash
//! cargo run -p jungle-cli -- migrate
//! ```
//!
//! # Stores
//!
//! - [`PgUserStore`] - `PostgreSQL`
//! - [`MemoryUserStore`] - process-local, for tests and embedding

pub mod memory;
pub mod users;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use jungle_core::{NormalizedEmail, UserId};

use crate::config::DatabaseConfig;
use crate::models::{StoredUser, User};

pub use memory::MemoryUserStore;
pub use users::PgUserStore;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// A validated user ready to be inserted.
#[derive(Clone)]
pub struct NewUserRecord {
    pub name: String,
    pub email: String,
    pub normalized_email: NormalizedEmail,
    pub password_hash: String,
}

/// Replacement values for an existing user. A `None` hash keeps the current one.
#[derive(Clone)]
pub struct UserRecordUpdate {
    pub name: String,
    pub email: String,
    pub normalized_email: NormalizedEmail,
    pub password_hash: Option<String>,
}

/// Persistence port for users.
///
/// Implementations must reject a second user with the same normalized email
/// with [`RepositoryError::Conflict`], on both insert and update.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a user and return it with its assigned ID.
    async fn insert(&self, record: NewUserRecord) -> Result<User, RepositoryError>;

    /// Find the user owning a normalized email.
    async fn find_by_normalized_email(
        &self,
        email: &NormalizedEmail,
    ) -> Result<Option<StoredUser>, RepositoryError>;

    /// Find a user by ID.
    async fn find_by_id(&self, id: UserId) -> Result<Option<StoredUser>, RepositoryError>;

    /// Overwrite a user's fields.
    ///
    /// Returns [`RepositoryError::NotFound`] if the user doesn't exist.
    async fn update(&self, id: UserId, update: UserRecordUpdate) -> Result<User, RepositoryError>;
}

/// Create a `PostgreSQL` connection pool.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect(config.url.expose_secret())
        .await
}
