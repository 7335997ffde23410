//! Password hashing logic.

use argon2::password_hash::{
    PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
};
use argon2::{Argon2, Params, Version};
use validator::{ValidationError, ValidationErrors};

use crate::config::Argon2 as ArgonConfig;

type Result<T> = std::result::Result<T, CryptoError>;

#[derive(thiserror::Error, Debug)]
pub enum CryptoError {
    #[error("argon2 error: {0}")]
    Argon2(String),
}

/// Cryptographic manager.
pub struct Crypto {
    pub pwd: PasswordManager,
}

impl Crypto {
    /// Create a new [`Crypto`].
    pub fn new(config: Option<ArgonConfig>) -> Result<Self> {
        Ok(Self {
            pwd: PasswordManager::new(config)?,
        })
    }
}

/// Password manager that uses Argon2id and PHC string format for hashing and
/// verification.
pub struct PasswordManager {
    params: Params,
}

impl PasswordManager {
    /// Create a new [`PasswordManager`].
    pub fn new(config: Option<ArgonConfig>) -> Result<Self> {
        let config = config.unwrap_or_default();

        let params = Params::new(
            config.memory_cost,
            config.iterations,
            config.parallelism,
            Some(config.hash_length),
        )
        .map_err(|err| CryptoError::Argon2(err.to_string()))?;

        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2 {
        Argon2::new(
            argon2::Algorithm::Argon2id,
            Version::V0x13,
            self.params.clone(),
        )
    }

    /// Hash password using Argon2id.
    pub fn hash_password(&self, password: impl AsRef<[u8]>) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(password.as_ref(), &salt)
            .map_err(|e| CryptoError::Argon2(e.to_string()))?;

        Ok(hash.to_string())
    }

    fn invalid_password() -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.add(
            "password",
            ValidationError::new("invalid_password")
                .with_message("Invalid password.".into()),
        );
        errors
    }

    /// Verify password against a PHC.
    pub fn verify_password(
        &self,
        password: impl AsRef<[u8]>,
        phc_hash: impl ToString,
    ) -> std::result::Result<(), ValidationErrors> {
        let phc_hash = phc_hash.to_string();
        let parsed = PasswordHash::new(&phc_hash)
            .map_err(|_| Self::invalid_password())?;

        self.argon2()
            .verify_password(password.as_ref(), &parsed)
            .map_err(|_| Self::invalid_password())
    }
}
