//! User domain types.
//!
//! These types represent validated domain objects separate from database row types.

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::Serialize;

use jungle_core::{NormalizedEmail, UserId};

use crate::validation::{Draft, ValidationErrors};

/// A persisted shop user.
///
/// Never carries the password or its hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email address as entered, trimmed.
    pub email: String,
    /// Canonical form of `email`, unique across users.
    pub normalized_email: NormalizedEmail,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A user together with their password hash, as read from a store.
#[derive(Clone)]
pub struct StoredUser {
    /// The user record.
    pub user: User,
    /// Argon2 PHC string.
    pub password_hash: String,
}

impl std::fmt::Debug for StoredUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredUser")
            .field("user", &self.user)
            .field("password_hash", &"[REDACTED]")
            .finish()
    }
}

/// A candidate user that has not been saved yet.
///
/// Any field may be missing; validation reports what is wrong. Passwords are
/// kept as [`SecretString`] so they never show up in `Debug` output.
///
/// ```
/// use jungle_accounts::models::NewUser;
///
/// let user = NewUser::new("name", "test@test.com", "password", "password");
/// assert!(user.check().is_empty());
///
/// let blank = NewUser::default().with_email("");
/// assert!(blank.check().full_messages().contains(&"Email can't be blank".to_owned()));
/// ```
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<SecretString>,
    pub password_confirmation: Option<SecretString>,
}

impl NewUser {
    /// Create a candidate with all four fields set.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        password_confirmation: impl Into<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            email: Some(email.into()),
            password: Some(SecretString::from(password.into())),
            password_confirmation: Some(SecretString::from(password_confirmation.into())),
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.set_password(password);
        self
    }

    #[must_use]
    pub fn with_password_confirmation(mut self, confirmation: impl Into<String>) -> Self {
        self.set_password_confirmation(confirmation);
        self
    }

    /// Replace the password, keeping the current confirmation.
    pub fn set_password(&mut self, password: impl Into<String>) {
        self.password = Some(SecretString::from(password.into()));
    }

    pub fn set_password_confirmation(&mut self, confirmation: impl Into<String>) {
        self.password_confirmation = Some(SecretString::from(confirmation.into()));
    }

    /// Check the rules that need no store lookup.
    ///
    /// Email uniqueness is only checked by
    /// [`AccountDirectory::validate`](crate::services::accounts::AccountDirectory::validate).
    #[must_use]
    pub fn check(&self) -> ValidationErrors {
        self.draft().check()
    }

    pub(crate) fn draft(&self) -> Draft<'_> {
        Draft {
            name: self.name.as_deref(),
            email: self.email.as_deref(),
            password: self.password.as_ref(),
            password_confirmation: self.password_confirmation.as_ref(),
            password_required: true,
        }
    }
}

/// Changes to an existing user. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<SecretString>,
    pub password_confirmation: Option<SecretString>,
}

impl UserChanges {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Set a new password and its confirmation.
    #[must_use]
    pub fn password(
        mut self,
        password: impl Into<String>,
        confirmation: impl Into<String>,
    ) -> Self {
        self.password = Some(SecretString::from(password.into()));
        self.password_confirmation = Some(SecretString::from(confirmation.into()));
        self
    }

    /// Merge these changes over `current` into a draft for validation.
    pub(crate) fn draft<'a>(&'a self, current: &'a User) -> Draft<'a> {
        Draft {
            name: Some(self.name.as_deref().unwrap_or(&current.name)),
            email: Some(self.email.as_deref().unwrap_or(&current.email)),
            password: self.password.as_ref(),
            password_confirmation: self.password_confirmation.as_ref(),
            password_required: false,
        }
    }
}
