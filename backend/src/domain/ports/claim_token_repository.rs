//! Port abstraction for claim token storage and atomic redemption.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{AlumniId, ClaimToken, ClaimTokenHash, User};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by claim token adapters.
    pub enum ClaimTokenRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "claim token repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "claim token repository query failed: {message}",
        /// No token with the presented digest exists.
        Missing => "claim token does not exist",
        /// The token was consumed before this redemption.
        Used => "claim token has already been used",
        /// The token expired before it could be consumed.
        Expired => "claim token has expired",
        /// The registering email already belongs to an account or profile.
        EmailTaken { email: String } => "email {email} is already registered",
        /// The token's profile gained an owner after the token was minted.
        ProfileClaimed { alumni_id: i64 } => "profile {alumni_id} is already claimed",
    }
}

/// Everything written when a token is redeemed by a new registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRedemption {
    /// Digest of the presented token.
    pub hash: ClaimTokenHash,
    /// Account to create. Its email, and its name when present, are copied
    /// onto the profile.
    pub user: User,
    /// Instant the token must still be valid at.
    pub now: DateTime<Utc>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClaimTokenRepository: Send + Sync {
    /// Persist a freshly minted token. With `revoke_previous`, unused tokens
    /// for the same profile are marked used in the same transaction.
    async fn insert(
        &self,
        token: &ClaimToken,
        revoke_previous: bool,
    ) -> Result<(), ClaimTokenRepositoryError>;

    /// Look a token up by digest.
    async fn find_by_hash(
        &self,
        hash: &ClaimTokenHash,
    ) -> Result<Option<ClaimToken>, ClaimTokenRepositoryError>;

    /// Atomically consume the token, create the account and hand it the
    /// token's profile.
    ///
    /// The token is consumed first and only while it is unused and unexpired
    /// at `redemption.now`; otherwise nothing is written and
    /// [`ClaimTokenRepositoryError::Used`] or
    /// [`ClaimTokenRepositoryError::Expired`] reports which check failed,
    /// evaluated against the row as it stands after the failed consume. The
    /// profile is
    /// only taken while it has no owner.
    async fn redeem(
        &self,
        redemption: &TokenRedemption,
    ) -> Result<AlumniId, ClaimTokenRepositoryError>;
}
