//! CLI command implementations.

pub mod migrate;
pub mod users;

use thiserror::Error;

use jungle_accounts::AccountError;
use jungle_accounts::config::{AccountsConfig, ConfigError};
use jungle_accounts::db::RepositoryError;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration failed.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Account operation failed.
    #[error("{0}")]
    Account(#[from] AccountError),

    /// Repository/database error.
    #[error("{0}")]
    Repository(#[from] RepositoryError),

    /// Email/password pair was rejected.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// No user with that email.
    #[error("No user found with email: {0}")]
    UserNotFound(String),

    /// Output could not be serialized.
    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}

/// Load configuration and connect to the accounts database.
async fn connect() -> Result<(AccountsConfig, sqlx::PgPool), CommandError> {
    let config = AccountsConfig::from_env()?;

    tracing::info!("Connecting to accounts database...");
    let pool = jungle_accounts::db::create_pool(&config.database).await?;

    Ok((config, pool))
}
