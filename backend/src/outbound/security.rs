//! Argon2 credential hashing and OS-random claim token generation.

use argon2::Argon2;
use argon2::password_hash::{
    PasswordHash as PhcHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
};
use rand::RngCore;
use rand::rngs::OsRng;

use crate::domain::ports::{ClaimTokenGenerator, CredentialHashError, CredentialHasher};
use crate::domain::{ClaimTokenValue, PasswordHash};

const SALT_BYTES: usize = 16;
const TOKEN_BYTES: usize = 32;

/// Argon2id hasher with the crate's default cost parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2CredentialHasher;

impl CredentialHasher for Argon2CredentialHasher {
    fn hash(&self, password: &str) -> Result<PasswordHash, CredentialHashError> {
        let mut salt_bytes = [0u8; SALT_BYTES];
        OsRng.fill_bytes(&mut salt_bytes);
        let salt = SaltString::encode_b64(&salt_bytes)
            .map_err(|err| CredentialHashError::hash(err.to_string()))?;
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|phc| PasswordHash::new(phc.to_string()))
            .map_err(|err| CredentialHashError::hash(err.to_string()))
    }

    fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, CredentialHashError> {
        let parsed = PhcHash::new(hash.as_str())
            .map_err(|err| CredentialHashError::malformed_hash(err.to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}

/// 256-bit hex tokens from the operating system RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomClaimTokenGenerator;

impl ClaimTokenGenerator for RandomClaimTokenGenerator {
    fn generate(&self) -> ClaimTokenValue {
        let mut bytes = [0u8; TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        ClaimTokenValue::from_generated(hex::encode(bytes))
    }
}
