//! User management commands.
//!
//! # Usage
//!
//! ```bash
//! jungle-cli users create -n "Name" -e test@test.com --password secret1 --password-confirmation secret1
//! jungle-cli users authenticate -e test@test.com --password secret1
//! jungle-cli users show -e test@test.com
//! ```
//!
//! # Environment Variables
//!
//! - `JUNGLE_DATABASE_URL` - `PostgreSQL` connection string (or `DATABASE_URL`)
//! - `JUNGLE_USER_PASSWORD` - Password, when not passed with `--password`

use sqlx::PgPool;

use jungle_accounts::config::AccountsConfig;
use jungle_accounts::db::PgUserStore;
use jungle_accounts::models::{NewUser, User};
use jungle_accounts::services::accounts::Argon2Hasher;
use jungle_accounts::{AccountDirectory, AccountError};

use super::{CommandError, connect};

/// Validate and create a new user.
///
/// # Errors
///
/// Returns `CommandError::Account` with every validation message if the user
/// is invalid, or if the database operation fails.
pub async fn create(
    name: &str,
    email: &str,
    password: &str,
    password_confirmation: Option<&str>,
) -> Result<(), CommandError> {
    let (config, pool) = connect().await?;
    let directory = open_directory(&config, &pool)?;

    let mut candidate = NewUser::default()
        .with_name(name)
        .with_email(email)
        .with_password(password);
    if let Some(confirmation) = password_confirmation {
        candidate.set_password_confirmation(confirmation);
    }

    let user = match directory.save(&candidate).await {
        Ok(user) => user,
        Err(AccountError::Invalid(errors)) => {
            for message in errors.full_messages() {
                tracing::error!("{message}");
            }
            return Err(AccountError::Invalid(errors).into());
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!("User created successfully! ID: {}, Email: {}", user.id, user.email);
    print_user(&user)
}

/// Check an email/password pair.
///
/// # Errors
///
/// Returns `CommandError::InvalidCredentials` if the pair is rejected.
pub async fn authenticate(email: &str, password: &str) -> Result<(), CommandError> {
    let (config, pool) = connect().await?;
    let directory = open_directory(&config, &pool)?;

    let user = directory
        .authenticate_with_credentials(email, password)
        .await?
        .ok_or(CommandError::InvalidCredentials)?;

    tracing::info!("Credentials accepted for user {}", user.id);
    print_user(&user)
}

/// Print a user as JSON.
///
/// # Errors
///
/// Returns `CommandError::UserNotFound` if no user has that email.
pub async fn show(email: &str) -> Result<(), CommandError> {
    let (config, pool) = connect().await?;
    let directory = open_directory(&config, &pool)?;

    let user = directory
        .find_by_email(email)
        .await?
        .ok_or_else(|| CommandError::UserNotFound(email.trim().to_owned()))?;

    print_user(&user)
}

fn open_directory<'a>(
    config: &AccountsConfig,
    pool: &'a PgPool,
) -> Result<AccountDirectory<PgUserStore<'a>>, CommandError> {
    let hasher = Argon2Hasher::new(&config.hashing)?;
    AccountDirectory::new(PgUserStore::new(pool), hasher).map_err(CommandError::from)
}

fn print_user(user: &User) -> Result<(), CommandError> {
    let json = serde_json::to_string_pretty(user)?;

    #[allow(clippy::print_stdout)]
    {
        println!("{json}");
    }

    Ok(())
}
