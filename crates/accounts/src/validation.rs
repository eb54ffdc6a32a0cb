//! Field validation for user records.
//!
//! Every rule is evaluated on each check, so a single candidate can carry
//! several failures at once. Failures render as full sentences
//! (`"Email can't be blank"`) suitable for showing next to a form.
//!
//! The rules here only look at the candidate itself. Email uniqueness needs
//! the user store and is added by
//! [`AccountDirectory`](crate::services::accounts::AccountDirectory).

use core::fmt;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use jungle_core::NormalizedEmail;

/// Minimum password length, in characters.
pub const MIN_PASSWORD_LENGTH: usize = 5;

/// A validated attribute of a user record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Email,
    Password,
    PasswordConfirmation,
}

impl Field {
    /// The field a confirmation field must match. Other fields return themselves.
    #[must_use]
    pub const fn confirmed_field(self) -> Self {
        match self {
            Self::PasswordConfirmation => Self::Password,
            other => other,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Name => "Name",
            Self::Email => "Email",
            Self::Password => "Password",
            Self::PasswordConfirmation => "Password confirmation",
        };
        f.write_str(label)
    }
}

/// A single validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Required field absent or blank.
    #[error("{0} can't be blank")]
    MissingField(Field),

    /// Another record already uses this value.
    #[error("{0} has already been taken")]
    DuplicateField(Field),

    /// Value shorter than the minimum length.
    #[error("{field} is too short (minimum is {min} characters)")]
    TooShort {
        /// Offending field.
        field: Field,
        /// Minimum length in characters.
        min: usize,
    },

    /// Confirmation does not match the field it confirms.
    #[error("{0} doesn't match {target}", target = .0.confirmed_field())]
    Mismatch(Field),
}

impl ValidationError {
    /// The field this failure is attached to.
    #[must_use]
    pub const fn field(&self) -> Field {
        match *self {
            Self::MissingField(field)
            | Self::DuplicateField(field)
            | Self::TooShort { field, .. }
            | Self::Mismatch(field) => field,
        }
    }
}

/// An ordered collection of validation failures.
///
/// An empty collection means the record is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    /// Create an empty collection.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Record a failure. Repeating an identical failure has no effect.
    pub fn push(&mut self, error: ValidationError) {
        if !self.0.contains(&error) {
            self.0.push(error);
        }
    }

    /// Returns `true` if no failures were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of recorded failures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if this exact failure was recorded.
    #[must_use]
    pub fn contains(&self, error: &ValidationError) -> bool {
        self.0.contains(error)
    }

    /// Iterate over recorded failures in the order they were found.
    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.0.iter()
    }

    /// Failures attached to one field.
    pub fn on(&self, field: Field) -> impl Iterator<Item = &ValidationError> {
        self.0.iter().filter(move |error| error.field() == field)
    }

    /// Human-readable messages, one per failure.
    #[must_use]
    pub fn full_messages(&self) -> Vec<String> {
        self.0.iter().map(ToString::to_string).collect()
    }

    /// `Ok(())` when empty, otherwise the collection itself as the error.
    ///
    /// # Errors
    ///
    /// Returns `self` if any failure was recorded.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_messages().join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        Self(vec![error])
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// =============================================================================
// Drafts
// =============================================================================

/// Borrowed view of the fields a record will have once written.
///
/// Built from a new user or from an existing user merged with changes.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Draft<'a> {
    pub name: Option<&'a str>,
    pub email: Option<&'a str>,
    pub password: Option<&'a SecretString>,
    pub password_confirmation: Option<&'a SecretString>,
    /// New records need a password; updates only check one when it is supplied.
    pub password_required: bool,
}

/// A draft that passed validation.
#[derive(Debug)]
pub(crate) struct Accepted<'a> {
    pub name: &'a str,
    /// Trimmed email as entered.
    pub email: &'a str,
    pub normalized_email: NormalizedEmail,
    pub password: Option<&'a SecretString>,
}

impl<'a> Draft<'a> {
    /// Apply the field rules.
    pub fn check(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();

        if present(self.name).is_none() {
            errors.push(ValidationError::MissingField(Field::Name));
        }

        if present(self.email).is_none() {
            errors.push(ValidationError::MissingField(Field::Email));
        }

        match self.password() {
            Some(password) if password.chars().count() < MIN_PASSWORD_LENGTH => {
                errors.push(ValidationError::TooShort {
                    field: Field::Password,
                    min: MIN_PASSWORD_LENGTH,
                });
            }
            Some(_) => {}
            None if self.password_required || self.password.is_some() => {
                errors.push(ValidationError::MissingField(Field::Password));
            }
            None => {}
        }

        if let (Some(password), Some(confirmation)) = (self.password, self.password_confirmation)
            && password.expose_secret() != confirmation.expose_secret()
        {
            errors.push(ValidationError::Mismatch(Field::PasswordConfirmation));
        }

        errors
    }

    /// The normalized email, if one is present.
    pub fn normalized_email(&self) -> Option<NormalizedEmail> {
        self.email.and_then(|email| NormalizedEmail::parse(email).ok())
    }

    /// Accept the draft if `errors` (from [`Self::check`] plus any store
    /// lookups) is empty.
    pub fn accept(self, errors: ValidationErrors) -> Result<Accepted<'a>, ValidationErrors> {
        errors.into_result()?;

        match (present(self.name), present(self.email), self.normalized_email()) {
            (Some(_), Some(email), Some(normalized_email)) => Ok(Accepted {
                name: self.name.unwrap_or_default(),
                email,
                normalized_email,
                password: self.password,
            }),
            _ => Err(self.check()),
        }
    }

    /// The password being set, treating an empty string as absent.
    fn password(&self) -> Option<&'a str> {
        self.password
            .map(|password| password.expose_secret())
            .filter(|password| !password.is_empty())
    }
}

/// Trimmed value if it is non-blank.
fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn secret(value: &str) -> SecretString {
        SecretString::from(value)
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            ValidationError::MissingField(Field::Email).to_string(),
            "Email can't be blank"
        );
        assert_eq!(
            ValidationError::DuplicateField(Field::Email).to_string(),
            "Email has already been taken"
        );
        assert_eq!(
            ValidationError::TooShort {
                field: Field::Password,
                min: MIN_PASSWORD_LENGTH
            }
            .to_string(),
            "Password is too short (minimum is 5 characters)"
        );
        assert_eq!(
            ValidationError::Mismatch(Field::PasswordConfirmation).to_string(),
            "Password confirmation doesn't match Password"
        );
    }

    #[test]
    fn test_errors_are_additive() {
        let mut errors = ValidationErrors::new();
        errors.push(ValidationError::MissingField(Field::Name));
        errors.push(ValidationError::MissingField(Field::Email));
        errors.push(ValidationError::MissingField(Field::Name));

        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors.full_messages(),
            vec!["Name can't be blank", "Email can't be blank"]
        );
        assert_eq!(errors.to_string(), "Name can't be blank, Email can't be blank");
    }

    #[test]
    fn test_errors_on_field() {
        let mut errors = ValidationErrors::new();
        errors.push(ValidationError::TooShort {
            field: Field::Password,
            min: 5,
        });
        errors.push(ValidationError::MissingField(Field::Email));

        assert_eq!(errors.on(Field::Password).count(), 1);
        assert_eq!(errors.on(Field::Name).count(), 0);
    }

    #[test]
    fn test_into_result() {
        assert!(ValidationErrors::new().into_result().is_ok());
        let errors = ValidationErrors::from(ValidationError::MissingField(Field::Name));
        assert_eq!(errors.clone().into_result().unwrap_err(), errors);
    }

    #[test]
    fn test_draft_all_rules_reported_together() {
        let password = secret("abc");
        let confirmation = secret("xyz");
        let draft = Draft {
            name: Some("   "),
            email: None,
            password: Some(&password),
            password_confirmation: Some(&confirmation),
            password_required: true,
        };

        let errors = draft.check();
        assert!(errors.contains(&ValidationError::MissingField(Field::Name)));
        assert!(errors.contains(&ValidationError::MissingField(Field::Email)));
        assert!(errors.contains(&ValidationError::TooShort {
            field: Field::Password,
            min: MIN_PASSWORD_LENGTH
        }));
        assert!(errors.contains(&ValidationError::Mismatch(Field::PasswordConfirmation)));
    }

    #[test]
    fn test_draft_password_length_counts_characters() {
        let password = secret("ñññññ");
        let draft = Draft {
            name: Some("name"),
            email: Some("test@test.com"),
            password: Some(&password),
            password_confirmation: None,
            password_required: true,
        };

        assert!(draft.check().is_empty());
    }

    #[test]
    fn test_draft_missing_password_when_required() {
        let draft = Draft {
            name: Some("name"),
            email: Some("test@test.com"),
            password: None,
            password_confirmation: None,
            password_required: true,
        };

        assert!(
            draft
                .check()
                .contains(&ValidationError::MissingField(Field::Password))
        );
    }

    #[test]
    fn test_draft_password_optional_for_updates() {
        let draft = Draft {
            name: Some("name"),
            email: Some("test@test.com"),
            password: None,
            password_confirmation: None,
            password_required: false,
        };

        assert!(draft.check().is_empty());
    }

    #[test]
    fn test_draft_empty_password_is_blank() {
        let password = secret("");
        let draft = Draft {
            name: Some("name"),
            email: Some("test@test.com"),
            password: Some(&password),
            password_confirmation: None,
            password_required: false,
        };

        let errors = draft.check();
        assert_eq!(
            errors.full_messages(),
            vec!["Password can't be blank".to_owned()]
        );
    }

    #[test]
    fn test_accept_returns_trimmed_email() {
        let password = secret("password");
        let draft = Draft {
            name: Some("name"),
            email: Some("  Test@Test.com "),
            password: Some(&password),
            password_confirmation: Some(&password),
            password_required: true,
        };

        let accepted = draft.accept(draft.check()).unwrap();
        assert_eq!(accepted.name, "name");
        assert_eq!(accepted.email, "Test@Test.com");
        assert_eq!(accepted.normalized_email.as_str(), "test@test.com");
        assert!(accepted.password.is_some());
    }

    #[test]
    fn test_accept_rejects_with_errors() {
        let draft = Draft {
            name: None,
            email: Some("test@test.com"),
            password: None,
            password_confirmation: None,
            password_required: false,
        };

        let errors = draft.accept(draft.check()).unwrap_err();
        assert!(errors.contains(&ValidationError::MissingField(Field::Name)));
    }
}
