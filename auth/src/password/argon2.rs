use std::sync::OnceLock;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Algorithm;
use argon2::Argon2;
use argon2::Params;
use argon2::Version;

use super::errors::PasswordError;

const DECOY_PASSWORD: &str = "decoy-password-for-unknown-accounts";

/// Argon2 cost parameters.
///
/// Higher values make every hash (and every brute force guess) slower.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkFactor {
    /// Memory size in KiB
    pub memory_kib: u32,
    /// Number of passes over memory
    pub iterations: u32,
    /// Degree of parallelism (lanes)
    pub parallelism: u32,
}

impl Default for WorkFactor {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

/// Password hashing implementation.
///
/// Provides salted one-way hashing (internally uses Argon2id).
/// Hashing and verification hold no mutable state and can be shared across threads.
#[derive(Clone)]
pub struct PasswordHasher {
    params: Params,
    // Hash of DECOY_PASSWORD under `params`, built on first use
    decoy: OnceLock<String>,
}

impl PasswordHasher {
    /// Create a new password hasher with the default work factor.
    ///
    /// The decoy hash used by [`verify_decoy`](Self::verify_decoy) is built
    /// on its first call.
    pub fn new() -> Self {
        Self {
            params: Params::default(),
            decoy: OnceLock::new(),
        }
    }

    /// Create a password hasher with a custom work factor.
    ///
    /// The decoy hash is built here, with the same work factor.
    ///
    /// # Errors
    /// * `HashingFailed` - Parameters are outside the range Argon2 accepts
    pub fn with_work_factor(work_factor: WorkFactor) -> Result<Self, PasswordError> {
        let params = Params::new(
            work_factor.memory_kib,
            work_factor.iterations,
            work_factor.parallelism,
            None,
        )
        .map_err(|e| PasswordError::HashingFailed(format!("Invalid work factor: {}", e)))?;

        let hasher = Self {
            params,
            decoy: OnceLock::new(),
        };
        hasher.decoy_hash()?;

        Ok(hasher)
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash a plaintext password.
    ///
    /// A fresh random salt is generated on every call, so hashing the same
    /// password twice yields two different strings.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to hash
    ///
    /// # Returns
    /// PHC string format hash (includes algorithm, parameters, salt, and hash)
    ///
    /// # Errors
    /// * `HashingFailed` - Input rejected by the algorithm or hashing failed
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a password against a stored hash.
    ///
    /// Parameters and salt are read from the PHC string, so hashes produced
    /// with another work factor still verify.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `hash` - Stored password hash in PHC string format
    ///
    /// # Returns
    /// True if password matches, false otherwise
    ///
    /// # Errors
    /// * `VerificationFailed` - Hash format is invalid
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed_hash = PasswordHash::new(hash).map_err(|e| {
            PasswordError::VerificationFailed(format!("Invalid password hash: {}", e))
        })?;

        match self.argon2().verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(PasswordError::VerificationFailed(e.to_string())),
        }
    }

    /// Run a full verification of `password` against the decoy hash and
    /// discard the outcome.
    ///
    /// Costs the same as [`verify`](Self::verify) on a hash produced by this
    /// hasher. Used when no stored hash exists for the caller.
    ///
    /// # Errors
    /// * `HashingFailed` - The decoy hash could not be built
    /// * `VerificationFailed` - Argon2 rejected the input
    pub fn verify_decoy(&self, password: &str) -> Result<(), PasswordError> {
        let decoy_hash = self.decoy_hash()?;
        self.verify(password, decoy_hash).map(|_| ())
    }

    fn decoy_hash(&self) -> Result<&str, PasswordError> {
        if let Some(hash) = self.decoy.get() {
            return Ok(hash.as_str());
        }

        let hash = self.hash(DECOY_PASSWORD)?;
        Ok(self.decoy.get_or_init(|| hash).as_str())
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap_hasher() -> PasswordHasher {
        PasswordHasher::with_work_factor(WorkFactor {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
        .expect("Failed to build hasher")
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = PasswordHasher::new();
        let password = "my_secure_password";

        let hash = hasher.hash(password).expect("Failed to hash password");
        assert!(hash.starts_with("$argon2id$"));

        assert!(hasher
            .verify(password, &hash)
            .expect("Failed to verify password"));

        assert!(!hasher
            .verify("wrong_password", &hash)
            .expect("Failed to verify password"));
    }

    #[test]
    fn test_hash_is_salted() {
        let hasher = cheap_hasher();

        let first = hasher.hash("secret123").expect("Failed to hash password");
        let second = hasher.hash("secret123").expect("Failed to hash password");

        assert_ne!(first, second);
        assert!(hasher.verify("secret123", &first).unwrap());
        assert!(hasher.verify("secret123", &second).unwrap());
    }

    #[test]
    fn test_hash_never_contains_plaintext() {
        let hasher = cheap_hasher();
        let hash = hasher.hash("plaintext-marker").unwrap();
        assert!(!hash.contains("plaintext-marker"));
    }

    #[test]
    fn test_verify_across_work_factors() {
        let strong = PasswordHasher::new();
        let hash = strong.hash("password").unwrap();

        // Parameters embedded in the hash win over the verifier's own
        assert!(cheap_hasher().verify("password", &hash).unwrap());
    }

    #[test]
    fn test_verify_invalid_hash() {
        let hasher = PasswordHasher::new();
        let result = hasher.verify("password", "invalid_hash");
        assert!(matches!(result, Err(PasswordError::VerificationFailed(_))));
    }

    #[test]
    fn test_invalid_work_factor() {
        let result = PasswordHasher::with_work_factor(WorkFactor {
            memory_kib: 1024,
            iterations: 0,
            parallelism: 1,
        });
        assert!(matches!(result, Err(PasswordError::HashingFailed(_))));
    }

    #[test]
    fn test_decoy_hash_uses_configured_work_factor() {
        let hasher = cheap_hasher();

        let decoy = hasher.decoy_hash().unwrap().to_string();
        let parsed = PasswordHash::new(&decoy).unwrap();
        assert_eq!(parsed.params.get_decimal("m"), Some(1024));
        assert_eq!(parsed.params.get_decimal("t"), Some(1));
        assert_eq!(parsed.params.get_decimal("p"), Some(1));

        // Built once and reused
        assert_eq!(hasher.decoy_hash().unwrap(), decoy);
    }

    #[test]
    fn test_verify_decoy() {
        let hasher = cheap_hasher();

        assert!(hasher.verify_decoy("secret123").is_ok());
        assert!(hasher.verify_decoy("").is_ok());
        assert!(!hasher.verify("secret123", hasher.decoy_hash().unwrap()).unwrap());
    }

    #[test]
    fn test_decoy_hash_construction() {
        let hasher = PasswordHasher::with_work_factor(WorkFactor::default()).unwrap();
        assert!(hasher.decoy.get().is_some());

        let lazy = PasswordHasher::new();
        assert!(lazy.decoy.get().is_none());
        assert!(lazy.verify_decoy("password").is_ok());
        assert!(lazy.decoy.get().is_some());
    }

    #[test]
    fn test_default_work_factor_matches_argon2() {
        let work_factor = WorkFactor::default();
        assert_eq!(work_factor.memory_kib, 19 * 1024);
        assert_eq!(work_factor.iterations, 2);
        assert_eq!(work_factor.parallelism, 1);
    }
}
