//! Port abstraction for user persistence adapters and their errors.

use async_trait::async_trait;

use crate::domain::{EmailAddress, Role, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another account already uses the email address.
        DuplicateEmail { email: String } => "email {email} is already registered",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account.
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Fetch an account by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch an account by normalised email.
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserPersistenceError>;

    /// Accounts that carry a full name, oldest first.
    async fn list_named(&self) -> Result<Vec<User>, UserPersistenceError>;

    /// Set `role` only while the stored role still equals `expected`.
    ///
    /// Returns `false` when the account is missing or its role changed.
    async fn replace_role(
        &self,
        id: UserId,
        expected: Role,
        role: Role,
    ) -> Result<bool, UserPersistenceError>;
}
