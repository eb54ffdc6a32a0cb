//! `PostgreSQL` user store.
//!
//! Queries are checked at runtime (`query_as` + `FromRow`), so building the
//! crate needs neither a live database nor an offline query cache.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use jungle_core::{NormalizedEmail, UserId};

use super::{NewUserRecord, RepositoryError, UserRecordUpdate, UserStore};
use crate::models::{StoredUser, User};

/// Row type for `jungle.user`.
#[derive(FromRow)]
struct UserRow {
    id: UserId,
    name: String,
    email: String,
    normalized_email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_stored(self) -> Result<StoredUser, RepositoryError> {
        let normalized_email = NormalizedEmail::parse(&self.normalized_email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(StoredUser {
            user: User {
                id: self.id,
                name: self.name,
                email: self.email,
                normalized_email,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
            password_hash: self.password_hash,
        })
    }
}

/// Map unique violations to [`RepositoryError::Conflict`].
fn map_write_error(e: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict("email already exists".to_owned());
    }
    RepositoryError::Database(e)
}

/// Repository for user database operations.
pub struct PgUserStore<'a> {
    pool: &'a PgPool,
}

impl<'a> PgUserStore<'a> {
    /// Create a new user store.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore<'_> {
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the normalized email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    async fn insert(&self, record: NewUserRecord) -> Result<User, RepositoryError> {
        let row: UserRow = sqlx::query_as(
            r#"
            INSERT INTO jungle.user (name, email, normalized_email, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, normalized_email, password_hash,
                      created_at, updated_at
            "#,
        )
        .bind(&record.name)
        .bind(&record.email)
        .bind(record.normalized_email.as_str())
        .bind(&record.password_hash)
        .fetch_one(self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(row.into_stored()?.user)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored email is blank.
    async fn find_by_normalized_email(
        &self,
        email: &NormalizedEmail,
    ) -> Result<Option<StoredUser>, RepositoryError> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT id, name, email, normalized_email, password_hash,
                   created_at, updated_at
            FROM jungle.user
            WHERE normalized_email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(UserRow::into_stored).transpose()
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored email is blank.
    async fn find_by_id(&self, id: UserId) -> Result<Option<StoredUser>, RepositoryError> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT id, name, email, normalized_email, password_hash,
                   created_at, updated_at
            FROM jungle.user
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(UserRow::into_stored).transpose()
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    /// Returns `RepositoryError::Conflict` if the new normalized email is taken.
    /// Returns `RepositoryError::Database` for other database errors.
    async fn update(&self, id: UserId, update: UserRecordUpdate) -> Result<User, RepositoryError> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            UPDATE jungle.user
            SET name = $2,
                email = $3,
                normalized_email = $4,
                password_hash = COALESCE($5, password_hash)
            WHERE id = $1
            RETURNING id, name, email, normalized_email, password_hash,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&update.name)
        .bind(&update.email)
        .bind(update.normalized_email.as_str())
        .bind(update.password_hash.as_deref())
        .fetch_optional(self.pool)
        .await
        .map_err(map_write_error)?;

        let row = row.ok_or(RepositoryError::NotFound)?;
        Ok(row.into_stored()?.user)
    }
}
