//! Integration tests for Jungle.
//!
//! # Running Tests
//!
//! ```bash
//! # Point at a disposable PostgreSQL database
//! export JUNGLE_TEST_DATABASE_URL=postgres://localhost/jungle_test
//!
//! # Run the ignored database tests
//! cargo test -p jungle-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `accounts_postgres` - Account directory against `PostgreSQL`

use sqlx::PgPool;

use jungle_accounts::AccountDirectory;
use jungle_accounts::config::HashingConfig;
use jungle_accounts::db::PgUserStore;
use jungle_accounts::services::accounts::Argon2Hasher;

/// Connected, migrated test database.
pub struct TestContext {
    pub pool: PgPool,
}

impl TestContext {
    /// Connect to `JUNGLE_TEST_DATABASE_URL` and run migrations.
    ///
    /// # Panics
    ///
    /// Panics if the variable is unset, the database is unreachable, or a
    /// migration fails.
    pub async fn new() -> Self {
        dotenvy::dotenv().ok();

        let database_url = std::env::var("JUNGLE_TEST_DATABASE_URL")
            .expect("JUNGLE_TEST_DATABASE_URL must be set for integration tests");
        let pool = PgPool::connect(&database_url)
            .await
            .expect("Failed to connect to test database");

        sqlx::migrate!("../accounts/migrations")
            .run(&pool)
            .await
            .expect("Failed to run account migrations");

        Self { pool }
    }

    /// A directory over the test database with cheap hashing parameters.
    ///
    /// # Panics
    ///
    /// Panics if the hashing parameters are rejected or hashing fails.
    #[must_use]
    pub fn directory(&self) -> AccountDirectory<PgUserStore<'_>> {
        let hasher = Argon2Hasher::new(&HashingConfig {
            memory_kib: 64,
            iterations: 1,
            parallelism: 1,
            pepper: None,
        })
        .expect("valid hashing parameters");
        AccountDirectory::new(PgUserStore::new(&self.pool), hasher)
            .expect("directory should build")
    }
}

/// An email address no other test run has used.
#[must_use]
pub fn unique_email() -> String {
    format!("test-{}@test.com", uuid::Uuid::new_v4())
}
