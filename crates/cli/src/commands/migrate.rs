//! Database migration commands.
//!
//! # Usage
//!
//! ```bash
//! jungle-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `JUNGLE_DATABASE_URL` - `PostgreSQL` connection string (or `DATABASE_URL`)
//!
//! # Migration Files
//!
//! Account migrations: `crates/accounts/migrations/`

use super::{CommandError, connect};

/// Run account database migrations.
///
/// # Errors
///
/// Returns `CommandError` if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), CommandError> {
    let (_config, pool) = connect().await?;

    tracing::info!("Running account migrations...");
    sqlx::migrate!("../accounts/migrations").run(&pool).await?;

    tracing::info!("Account migrations complete!");
    Ok(())
}
