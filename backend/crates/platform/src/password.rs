//! Password Hashing and Verification
//!
//! The [`PasswordHasher`] capability hides the hashing scheme from callers.
//! [`Argon2Hasher`] is the production implementation (Argon2id, PHC strings,
//! optional pepper).
//!
//! Hashing is deliberately slow. Async callers should run it on a blocking
//! thread rather than on the request executor.

use std::fmt;

use argon2::password_hash::{self, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher as _, PasswordVerifier as _};
use rand::rngs::OsRng;
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

// ============================================================================
// Error Types
// ============================================================================

/// Password input rejected before hashing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    #[error("Password cannot be empty")]
    Empty,
}

/// Password hashing/verification errors
#[derive(Debug, Error)]
pub enum PasswordHashError {
    /// Hashing operation failed
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    /// Stored hash is not a PHC string
    #[error("Invalid password hash format")]
    InvalidHashFormat,
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Clear text password with automatic memory zeroization
///
/// Not `Clone`, and `Debug` output is redacted.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        if raw.is_empty() {
            return Err(PasswordPolicyError::Empty);
        }
        Ok(Self(raw))
    }

    /// Raw password bytes. Never log these.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Password bytes with the pepper appended
    fn peppered(&self, pepper: Option<&[u8]>) -> Vec<u8> {
        let mut bytes = self.as_bytes().to_vec();
        if let Some(p) = pepper {
            bytes.extend_from_slice(p);
        }
        bytes
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Hasher capability
// ============================================================================

/// Opaque password hashing capability (hash / compare)
pub trait PasswordHasher: Send + Sync {
    /// Hash a password into a storable string
    fn hash(&self, password: &ClearTextPassword) -> Result<String, PasswordHashError>;

    /// Compare a password with a stored hash.
    ///
    /// `Ok(false)` means "does not match"; `Err` means the comparison
    /// itself could not be performed.
    fn verify(&self, password: &ClearTextPassword, hash: &str) -> Result<bool, PasswordHashError>;
}

/// Argon2id hasher
#[derive(Clone, Default)]
pub struct Argon2Hasher {
    argon2: Argon2<'static>,
    pepper: Option<Vec<u8>>,
}

impl Argon2Hasher {
    /// OWASP recommended parameters (m=19456, t=2, p=1)
    pub fn new(pepper: Option<Vec<u8>>) -> Self {
        Self {
            argon2: Argon2::default(),
            pepper,
        }
    }

    /// Custom cost parameters, e.g. cheaper ones for local development
    pub fn with_params(params: argon2::Params, pepper: Option<Vec<u8>>) -> Self {
        Self {
            argon2: Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params),
            pepper,
        }
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &ClearTextPassword) -> Result<String, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        let bytes = password.peppered(self.pepper.as_deref());

        let hash = self
            .argon2
            .hash_password(&bytes, &salt)
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?;

        Ok(hash.to_string())
    }

    fn verify(&self, password: &ClearTextPassword, hash: &str) -> Result<bool, PasswordHashError> {
        let parsed = PasswordHash::new(hash).map_err(|_| PasswordHashError::InvalidHashFormat)?;
        let bytes = password.peppered(self.pepper.as_deref());

        match self.argon2.verify_password(&bytes, &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(PasswordHashError::HashingFailed(e.to_string())),
        }
    }
}

impl fmt::Debug for Argon2Hasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Argon2Hasher")
            .field("pepper", &self.pepper.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap_hasher(pepper: Option<Vec<u8>>) -> Argon2Hasher {
        let params = argon2::Params::new(256, 1, 1, None).unwrap();
        Argon2Hasher::with_params(params, pepper)
    }

    fn password(raw: &str) -> ClearTextPassword {
        ClearTextPassword::new(raw.to_string()).unwrap()
    }

    #[test]
    fn test_empty_password_rejected() {
        assert_eq!(
            ClearTextPassword::new(String::new()).unwrap_err(),
            PasswordPolicyError::Empty
        );
    }

    #[test]
    fn test_hash_then_verify() {
        let hasher = cheap_hasher(None);
        let hash = hasher.hash(&password("Passw0rd!")).unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify(&password("Passw0rd!"), &hash).unwrap());
        assert!(!hasher.verify(&password("passw0rd!"), &hash).unwrap());
    }

    #[test]
    fn test_pepper_must_match() {
        let peppered = cheap_hasher(Some(b"pepper".to_vec()));
        let hash = peppered.hash(&password("Passw0rd!")).unwrap();

        assert!(peppered.verify(&password("Passw0rd!"), &hash).unwrap());
        assert!(!cheap_hasher(None).verify(&password("Passw0rd!"), &hash).unwrap());
    }

    #[test]
    fn test_invalid_hash_format() {
        let result = cheap_hasher(None).verify(&password("Passw0rd!"), "not-a-phc-string");
        assert!(matches!(result, Err(PasswordHashError::InvalidHashFormat)));
    }

    #[test]
    fn test_debug_is_redacted() {
        let debug = format!("{:?}", password("secret-value"));
        assert!(!debug.contains("secret-value"));
        assert!(debug.contains("REDACTED"));
    }
}
