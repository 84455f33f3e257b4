//! Credential hashing using Argon2id.

use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};

use crate::error::AuthError;

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashCost {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashCost {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

impl HashCost {
    /// Smallest cost Argon2 accepts. Only suitable for tests.
    pub fn minimal() -> Self {
        Self {
            memory_kib: Params::MIN_M_COST,
            iterations: Params::MIN_T_COST,
            parallelism: Params::MIN_P_COST,
        }
    }
}

/// One-way salted password hasher.
///
/// Verification parameters come from the stored PHC string, so digests made
/// with a different cost still verify.
pub struct CredentialHasher {
    argon2: Argon2<'static>,
    /// Digest used to burn the same work when the account does not exist.
    decoy: String,
}

impl CredentialHasher {
    pub fn new(cost: HashCost) -> Result<Self, AuthError> {
        let params = Params::new(cost.memory_kib, cost.iterations, cost.parallelism, None)
            .map_err(|e| AuthError::Config(format!("argon2 params: {e}")))?;
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

        let salt = SaltString::generate(&mut OsRng);
        let decoy = argon2
            .hash_password(b"decoy-credential", &salt)
            .map_err(|e| AuthError::Crypto(format!("hash error: {e}")))?
            .to_string();

        Ok(Self { argon2, decoy })
    }

    /// Hash a plaintext password with a fresh random salt (PHC string format).
    pub fn hash(&self, plaintext: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::Crypto(format!("hash error: {e}")))
    }

    /// Verify a plaintext password against a stored digest.
    ///
    /// Returns `false` on mismatch and on a malformed digest; never errors.
    pub fn verify(&self, plaintext: &str, digest: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(digest) else {
            return false;
        };
        self.argon2.verify_password(plaintext.as_bytes(), &parsed).is_ok()
    }

    /// Run a verification against the decoy digest and report failure.
    ///
    /// Keeps "unknown account" as slow as "wrong password".
    pub fn verify_absent(&self, plaintext: &str) -> bool {
        let _ = self.verify(plaintext, &self.decoy);
        false
    }
}

impl core::fmt::Debug for CredentialHasher {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CredentialHasher").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> CredentialHasher {
        CredentialHasher::new(HashCost::minimal()).unwrap()
    }

    #[test]
    fn correct_password_matches() {
        let hasher = hasher();
        let digest = hasher.hash("hunter2").unwrap();
        assert!(hasher.verify("hunter2", &digest));
    }

    #[test]
    fn wrong_password_does_not_match() {
        let hasher = hasher();
        let digest = hasher.hash("hunter2").unwrap();
        assert!(!hasher.verify("wrong", &digest));
    }

    #[test]
    fn digest_is_salted_and_not_plaintext() {
        let hasher = hasher();
        let a = hasher.hash("pw123").unwrap();
        let b = hasher.hash("pw123").unwrap();
        assert_ne!(a, b);
        assert!(!a.contains("pw123"));
        assert!(a.starts_with("$argon2id$"));
    }

    #[test]
    fn malformed_digest_is_a_mismatch() {
        let hasher = hasher();
        assert!(!hasher.verify("pw", "not-a-hash"));
        assert!(!hasher.verify("pw", ""));
    }

    #[test]
    fn digest_from_other_cost_still_verifies() {
        let digest = hasher().hash("pw123").unwrap();
        let other = CredentialHasher::new(HashCost {
            memory_kib: 64,
            iterations: 1,
            parallelism: 1,
        })
        .unwrap();
        assert!(other.verify("pw123", &digest));
    }

    #[test]
    fn absent_account_never_verifies() {
        assert!(!hasher().verify_absent("decoy-credential"));
    }
}
