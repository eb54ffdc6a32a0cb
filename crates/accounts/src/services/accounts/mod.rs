//! Account directory service.
//!
//! Owns user validation, registration, updates and password login on top of
//! an injected [`UserStore`] and [`CredentialHasher`].

mod error;
mod password;

pub use error::AccountError;
pub use password::{Argon2Hasher, CredentialHasher};

use secrecy::ExposeSecret;

use jungle_core::{NormalizedEmail, UserId};

use crate::db::{NewUserRecord, RepositoryError, UserRecordUpdate, UserStore};
use crate::models::{NewUser, User, UserChanges};
use crate::validation::{Accepted, Draft, Field, ValidationError, ValidationErrors};

/// Password hashed when the directory is built and verified against when an
/// email is unknown, so unknown emails cost as much as wrong passwords.
const TIMING_PASSWORD: &str = "jungle-timing-equalizer";

/// The account directory.
pub struct AccountDirectory<S, H = Argon2Hasher> {
    store: S,
    hasher: H,
    timing_hash: String,
}

impl<S: UserStore, H: CredentialHasher> AccountDirectory<S, H> {
    /// Create a directory over a store and hasher.
    ///
    /// Hashes the timing password up front, so lookups of unknown emails never
    /// pay for a hash.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::PasswordHash` if the hasher fails.
    pub fn new(store: S, hasher: H) -> Result<Self, AccountError> {
        let timing_hash = hasher.hash(TIMING_PASSWORD)?;
        Ok(Self {
            store,
            hasher,
            timing_hash,
        })
    }

    /// The underlying store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Validate a candidate without saving it.
    ///
    /// Runs every field rule plus the email uniqueness lookup and reports all
    /// failures together.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::Invalid` with every failure found.
    /// Returns `AccountError::Repository` if the uniqueness lookup fails.
    pub async fn validate(&self, candidate: &NewUser) -> Result<(), AccountError> {
        self.review(candidate.draft(), None).await.map(|_| ())
    }

    /// Check a draft, including uniqueness against every user but `owner`.
    async fn review<'a>(
        &self,
        draft: Draft<'a>,
        owner: Option<UserId>,
    ) -> Result<Accepted<'a>, AccountError> {
        let mut errors = draft.check();

        if let Some(email) = draft.normalized_email()
            && self.email_taken(&email, owner).await?
        {
            errors.push(ValidationError::DuplicateField(Field::Email));
        }

        draft.accept(errors).map_err(|errors| {
            tracing::debug!(errors = %errors, "user validation failed");
            AccountError::Invalid(errors)
        })
    }

    async fn email_taken(
        &self,
        email: &NormalizedEmail,
        owner: Option<UserId>,
    ) -> Result<bool, RepositoryError> {
        let existing = self.store.find_by_normalized_email(email).await?;
        Ok(existing.is_some_and(|stored| Some(stored.user.id) != owner))
    }

    // =========================================================================
    // Registration & Updates
    // =========================================================================

    /// Validate and persist a new user.
    ///
    /// The password is hashed before it reaches the store.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::Invalid` if validation fails, including when the
    /// store's uniqueness constraint rejects the email.
    /// Returns `AccountError::PasswordHash` if hashing fails.
    /// Returns `AccountError::Repository` for other storage failures.
    pub async fn save(&self, candidate: &NewUser) -> Result<User, AccountError> {
        let accepted = self.review(candidate.draft(), None).await?;
        let Some(password) = accepted.password else {
            let missing = ValidationError::MissingField(Field::Password);
            return Err(ValidationErrors::from(missing).into());
        };

        let password_hash = self.hasher.hash(password.expose_secret())?;

        let user = self
            .store
            .insert(NewUserRecord {
                name: accepted.name.to_owned(),
                email: accepted.email.to_owned(),
                normalized_email: accepted.normalized_email,
                password_hash,
            })
            .await
            .map_err(conflict_as_duplicate)?;

        tracing::info!(user_id = %user.id, "user created");
        Ok(user)
    }

    /// Apply changes to an existing user.
    ///
    /// Uniqueness ignores the user's own record. Password rules only apply
    /// when a new password is supplied.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::NotFound` if the user doesn't exist.
    /// Returns `AccountError::Invalid` if the merged record fails validation.
    /// Returns `AccountError::PasswordHash` if hashing fails.
    /// Returns `AccountError::Repository` for other storage failures.
    pub async fn update(&self, id: UserId, changes: &UserChanges) -> Result<User, AccountError> {
        let current = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(AccountError::NotFound)?;

        let accepted = self.review(changes.draft(&current.user), Some(id)).await?;
        let password_hash = accepted
            .password
            .map(|password| self.hasher.hash(password.expose_secret()))
            .transpose()?;
        let password_changed = password_hash.is_some();

        let user = self
            .store
            .update(
                id,
                UserRecordUpdate {
                    name: accepted.name.to_owned(),
                    email: accepted.email.to_owned(),
                    normalized_email: accepted.normalized_email,
                    password_hash,
                },
            )
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => AccountError::NotFound,
                other => conflict_as_duplicate(other),
            })?;

        tracing::info!(user_id = %user.id, password_changed, "user updated");
        Ok(user)
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the lookup fails.
    pub async fn find(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.store.find_by_id(id).await?.map(|stored| stored.user))
    }

    /// Get a user by email, in any case and with surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the lookup fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let Ok(email) = NormalizedEmail::parse(email) else {
            return Ok(None);
        };
        Ok(self
            .store
            .find_by_normalized_email(&email)
            .await?
            .map(|stored| stored.user))
    }

    // =========================================================================
    // Password Authentication
    // =========================================================================

    /// Return the user owning `email` if `password` matches.
    ///
    /// The email is normalized before lookup. Unknown emails, blank emails
    /// and wrong passwords all return `None`, and unknown emails still pay
    /// for one hash verification so response times match.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` only for storage failures.
    pub async fn authenticate_with_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, RepositoryError> {
        let Ok(email) = NormalizedEmail::parse(email) else {
            self.verify_against_timing_hash(password);
            return Ok(None);
        };

        match self.store.find_by_normalized_email(&email).await? {
            Some(stored) if self.hasher.verify(password, &stored.password_hash) => {
                tracing::debug!(user_id = %stored.user.id, "credentials accepted");
                Ok(Some(stored.user))
            }
            Some(stored) => {
                tracing::debug!(user_id = %stored.user.id, "credentials rejected");
                Ok(None)
            }
            None => {
                self.verify_against_timing_hash(password);
                Ok(None)
            }
        }
    }

    fn verify_against_timing_hash(&self, password: &str) {
        let _ = self.hasher.verify(password, &self.timing_hash);
    }
}

/// A store-level uniqueness violation surfaces as the usual duplicate-email failure.
fn conflict_as_duplicate(e: RepositoryError) -> AccountError {
    match e {
        RepositoryError::Conflict(reason) => {
            tracing::warn!(%reason, "store rejected email after validation passed");
            AccountError::Invalid(ValidationError::DuplicateField(Field::Email).into())
        }
        other => AccountError::Repository(other),
    }
}
