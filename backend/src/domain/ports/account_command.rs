//! Driving port for sign-up and sign-in.

use async_trait::async_trait;

use crate::domain::{Error, ExternalIdentity, LoginCredentials, Registration, SessionClaims, UserId};

/// Driving port that establishes who the caller is.
///
/// Every operation returns the claims to store in the session: the account,
/// its role and the profile it is linked to.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Create an account, redeeming a claim token when one is supplied.
    ///
    /// # Errors
    ///
    /// - `conflict` when the email is already registered.
    /// - `invalid_request` for unknown, used (`details.reason = "used"`) or
    ///   expired (`details.reason = "expired"`) tokens.
    async fn register(&self, registration: Registration) -> Result<SessionClaims, Error>;

    /// Verify a password login.
    async fn login(&self, credentials: LoginCredentials) -> Result<SessionClaims, Error>;

    /// Sign in an identity asserted by the trusted proxy, provisioning the
    /// account and linking a matching unclaimed profile on first use.
    async fn sign_in_external(&self, identity: ExternalIdentity) -> Result<SessionClaims, Error>;

    /// Recompute claims for an existing session from stored state.
    ///
    /// # Errors
    ///
    /// `unauthorized` when the account no longer exists.
    async fn refresh(&self, user_id: UserId) -> Result<SessionClaims, Error>;
}
