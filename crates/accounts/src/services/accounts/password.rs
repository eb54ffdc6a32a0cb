//! Password hashing.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use secrecy::{ExposeSecret, SecretString};

use super::AccountError;
use crate::config::HashingConfig;

/// One-way password hashing used by the account directory.
pub trait CredentialHasher: Send + Sync {
    /// Hash a plaintext password into a self-describing string.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::PasswordHash` if hashing fails.
    fn hash(&self, password: &str) -> Result<String, AccountError>;

    /// Check a plaintext password against a stored hash.
    ///
    /// Malformed hashes never verify.
    fn verify(&self, password: &str, hash: &str) -> bool;
}

/// Argon2id hasher producing PHC strings.
///
/// Verification reads the cost parameters from each stored hash, so hashes
/// made with older parameters keep working after the configuration changes.
/// The pepper, if any, must stay the same for existing hashes to verify.
pub struct Argon2Hasher {
    params: Params,
    pepper: Option<SecretString>,
}

impl Argon2Hasher {
    /// Build a hasher from configuration.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::HashingParams` if Argon2 rejects the cost parameters.
    pub fn new(config: &HashingConfig) -> Result<Self, AccountError> {
        let params = config
            .params()
            .map_err(|e| AccountError::HashingParams(e.to_string()))?;

        Ok(Self {
            params,
            pepper: config.pepper.clone(),
        })
    }

    fn argon2(&self) -> Result<Argon2<'_>, argon2::Error> {
        match &self.pepper {
            Some(pepper) => Argon2::new_with_secret(
                pepper.expose_secret().as_bytes(),
                Algorithm::Argon2id,
                Version::V0x13,
                self.params.clone(),
            ),
            None => Ok(Argon2::new(
                Algorithm::Argon2id,
                Version::V0x13,
                self.params.clone(),
            )),
        }
    }
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        Self {
            params: Params::default(),
            pepper: None,
        }
    }
}

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, AccountError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = self.argon2().map_err(|_| AccountError::PasswordHash)?;

        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|_| AccountError::PasswordHash)
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        let Ok(parsed_hash) = PasswordHash::new(hash) else {
            return false;
        };
        let Ok(argon2) = self.argon2() else {
            return false;
        };

        argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    /// Small costs keep debug-mode tests fast.
    fn cheap_config() -> HashingConfig {
        HashingConfig {
            memory_kib: 64,
            iterations: 1,
            parallelism: 1,
            pepper: None,
        }
    }

    #[test]
    fn test_hash_is_not_plaintext() {
        let hasher = Argon2Hasher::new(&cheap_config()).unwrap();
        let hash = hasher.hash("password").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(!hash.contains("password"));
    }

    #[test]
    fn test_hashes_are_salted() {
        let hasher = Argon2Hasher::new(&cheap_config()).unwrap();
        assert_ne!(
            hasher.hash("password").unwrap(),
            hasher.hash("password").unwrap()
        );
    }

    #[test]
    fn test_verify() {
        let hasher = Argon2Hasher::new(&cheap_config()).unwrap();
        let hash = hasher.hash("password").unwrap();

        assert!(hasher.verify("password", &hash));
        assert!(!hasher.verify("pass", &hash));
        assert!(!hasher.verify("Password", &hash));
    }

    #[test]
    fn test_verify_malformed_hash() {
        let hasher = Argon2Hasher::new(&cheap_config()).unwrap();
        assert!(!hasher.verify("password", ""));
        assert!(!hasher.verify("password", "password"));
    }

    #[test]
    fn test_pepper_is_required_to_verify() {
        let peppered = Argon2Hasher::new(&HashingConfig {
            pepper: Some(SecretString::from("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6")),
            ..cheap_config()
        })
        .unwrap();
        let plain = Argon2Hasher::new(&cheap_config()).unwrap();

        let hash = peppered.hash("password").unwrap();
        assert!(peppered.verify("password", &hash));
        assert!(!plain.verify("password", &hash));
    }

    #[test]
    fn test_old_params_still_verify() {
        let old = Argon2Hasher::new(&cheap_config()).unwrap();
        let hash = old.hash("password").unwrap();

        let new = Argon2Hasher::new(&HashingConfig {
            iterations: 2,
            ..cheap_config()
        })
        .unwrap();
        assert!(new.verify("password", &hash));
    }

    #[test]
    fn test_rejects_invalid_params() {
        let result = Argon2Hasher::new(&HashingConfig {
            parallelism: 0,
            ..cheap_config()
        });
        assert!(matches!(result, Err(AccountError::HashingParams(_))));
    }
}
