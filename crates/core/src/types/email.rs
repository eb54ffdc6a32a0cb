//! Normalized email address type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when normalizing an email address.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    /// The input is empty or only whitespace.
    #[error("email cannot be blank")]
    Empty,
}

/// An email address in its canonical comparison form.
///
/// Normalization trims surrounding whitespace and lowercases the address.
/// Two addresses refer to the same account exactly when their normalized
/// forms are equal, so this is the only type used for lookups and for the
/// uniqueness constraint.
///
/// The normalized form is not meant for display; keep the trimmed address
/// the user typed for that.
///
/// ## Examples
///
/// ```
/// use jungle_core::NormalizedEmail;
///
/// let email = NormalizedEmail::parse("  Test@Test.COM ").unwrap();
/// assert_eq!(email.as_str(), "test@test.com");
///
/// assert!(NormalizedEmail::parse("").is_err());
/// assert!(NormalizedEmail::parse("   ").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub struct NormalizedEmail(String);

impl NormalizedEmail {
    /// Normalize a raw email address.
    ///
    /// # Errors
    ///
    /// Returns [`EmailError::Empty`] if the input is blank after trimming.
    pub fn parse(raw: &str) -> Result<Self, EmailError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(EmailError::Empty);
        }

        Ok(Self(trimmed.to_lowercase()))
    }

    /// Returns the normalized address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `NormalizedEmail` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for NormalizedEmail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for NormalizedEmail {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for NormalizedEmail {
    type Error = EmailError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<NormalizedEmail> for String {
    fn from(email: NormalizedEmail) -> Self {
        email.0
    }
}

impl AsRef<str> for NormalizedEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for NormalizedEmail {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for NormalizedEmail {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::parse(&s)?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for NormalizedEmail {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lowercases() {
        let email = NormalizedEmail::parse("tEsT@tEST.com").unwrap();
        assert_eq!(email.as_str(), "test@test.com");
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let email = NormalizedEmail::parse(" test@test.com \n").unwrap();
        assert_eq!(email.as_str(), "test@test.com");
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(NormalizedEmail::parse(""), Err(EmailError::Empty));
    }

    #[test]
    fn test_parse_whitespace_only() {
        assert_eq!(NormalizedEmail::parse(" \t "), Err(EmailError::Empty));
    }

    #[test]
    fn test_parse_unicode_case_folding() {
        let email = NormalizedEmail::parse("ÉLODIE@Example.FR").unwrap();
        assert_eq!(email.as_str(), "élodie@example.fr");
    }

    #[test]
    fn test_equivalent_inputs_compare_equal() {
        let a = NormalizedEmail::parse("test@test.com").unwrap();
        let b = NormalizedEmail::parse("  TEST@test.COM").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_display() {
        let email = NormalizedEmail::parse("User@Example.com").unwrap();
        assert_eq!(format!("{email}"), "user@example.com");
    }

    #[test]
    fn test_deserialize_normalizes() {
        let parsed: NormalizedEmail = serde_json::from_str("\" Mixed@Case.com \"").unwrap();
        assert_eq!(parsed.as_str(), "mixed@case.com");
        assert_eq!(serde_json::to_string(&parsed).unwrap(), "\"mixed@case.com\"");
    }

    #[test]
    fn test_deserialize_rejects_blank() {
        assert!(serde_json::from_str::<NormalizedEmail>("\"  \"").is_err());
    }

    #[test]
    fn test_from_str() {
        let email: NormalizedEmail = "A@B.C".parse().unwrap();
        assert_eq!(email.as_str(), "a@b.c");
    }
}
