//! Jungle CLI - Database migrations and user management.
//!
//! # Usage
//!
//! ```bash
//! # Run account database migrations
//! jungle-cli migrate
//!
//! # Create a user (password may also come from JUNGLE_USER_PASSWORD)
//! jungle-cli users create -n "Name" -e test@test.com --password secret1 --password-confirmation secret1
//!
//! # Check credentials
//! jungle-cli users authenticate -e " Test@Test.com " --password secret1
//!
//! # Look up a user by email
//! jungle-cli users show -e test@test.com
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `users create` - Validate and create a user
//! - `users authenticate` - Check an email/password pair
//! - `users show` - Print a user as JSON

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "jungle-cli")]
#[command(author, version, about = "Jungle CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage shop users
    Users {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Validate and create a new user
    Create {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password (at least 5 characters)
        #[arg(long, env = "JUNGLE_USER_PASSWORD", hide_env_values = true)]
        password: String,

        /// Must match the password when given
        #[arg(long)]
        password_confirmation: Option<String>,
    },
    /// Check an email/password pair
    Authenticate {
        /// Email address (case and surrounding whitespace are ignored)
        #[arg(short, long)]
        email: String,

        /// Password
        #[arg(long, env = "JUNGLE_USER_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Print a user as JSON
    Show {
        /// Email address
        #[arg(short, long)]
        email: String,
    },
}

#[tokio::main]
async fn main() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "jungle_cli=info,jungle_accounts=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Users { action } => match action {
            UserAction::Create {
                name,
                email,
                password,
                password_confirmation,
            } => {
                commands::users::create(&name, &email, &password, password_confirmation.as_deref())
                    .await?;
            }
            UserAction::Authenticate { email, password } => {
                commands::users::authenticate(&email, &password).await?;
            }
            UserAction::Show { email } => commands::users::show(&email).await?,
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_create() {
        let cli = Cli::try_parse_from([
            "jungle-cli",
            "users",
            "create",
            "-n",
            "name",
            "-e",
            "test@test.com",
            "--password",
            "password",
            "--password-confirmation",
            "password",
        ]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::Users {
                action: UserAction::Create { .. }
            })
        ));
    }

    #[test]
    fn test_parse_migrate() {
        let cli = Cli::try_parse_from(["jungle-cli", "migrate"]);
        assert!(matches!(cli.map(|c| c.command), Ok(Commands::Migrate)));
    }
}
