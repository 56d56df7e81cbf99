//! Password hashing.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use super::MemberError;

/// Hash-and-compare capability for member passwords.
pub trait CredentialVerifier: Send + Sync {
    /// Produce a PHC-format hash for storage.
    ///
    /// # Errors
    ///
    /// Returns `MemberError::PasswordHash` if hashing fails.
    fn hash(&self, password: &str) -> Result<String, MemberError>;

    /// Whether `password` matches a stored hash. Malformed hashes never match.
    fn verify(&self, password: &str, stored_hash: &str) -> bool;
}

/// Argon2id password hashing.
#[derive(Debug, Clone, Default)]
pub struct Argon2Verifier {
    argon2: Argon2<'static>,
}

impl Argon2Verifier {
    /// Argon2id with the crate's default cost parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Argon2id with explicit cost parameters.
    #[must_use]
    pub fn with_params(params: Params) -> Self {
        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        }
    }
}

impl CredentialVerifier for Argon2Verifier {
    fn hash(&self, password: &str) -> Result<String, MemberError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|_| MemberError::PasswordHash)
    }

    fn verify(&self, password: &str, stored_hash: &str) -> bool {
        PasswordHash::new(stored_hash).is_ok_and(|parsed| {
            self.argon2
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;

    /// Cheap parameters so tests don't spend seconds hashing.
    pub(crate) fn fast_verifier() -> Argon2Verifier {
        Argon2Verifier::with_params(Params::new(1024, 1, 1, None).unwrap())
    }

    #[test]
    fn test_hash_then_verify() {
        let verifier = fast_verifier();
        let hash = verifier.hash("hunter22").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(verifier.verify("hunter22", &hash));
        assert!(!verifier.verify("hunter23", &hash));
    }

    #[test]
    fn test_hashes_are_salted() {
        let verifier = fast_verifier();
        assert_ne!(
            verifier.hash("hunter22").unwrap(),
            verifier.hash("hunter22").unwrap()
        );
    }

    #[test]
    fn test_malformed_hash_never_matches() {
        assert!(!fast_verifier().verify("hunter22", "not-a-phc-string"));
    }
}
