//! Port for hashing and verifying account passwords.

use crate::domain::PasswordHash;

use super::define_port_error;

define_port_error! {
    /// Failures raised by credential hashers.
    pub enum CredentialHashError {
        /// Hashing the password failed.
        Hash { message: String } => "password hashing failed: {message}",
        /// The stored credential is not a parseable PHC string.
        MalformedHash { message: String } => "stored password hash is malformed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait CredentialHasher: Send + Sync {
    /// Produce a salted PHC string for `password`.
    fn hash(&self, password: &str) -> Result<PasswordHash, CredentialHashError>;

    /// Check `password` against a stored credential.
    fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, CredentialHashError>;
}
