//! Driving port for profile claims and claim token issuance.

use async_trait::async_trait;

use crate::domain::{
    AlumniId, Error, IssuedClaimToken, ProfileUpdate, SessionClaims, UserId,
};

/// Direct claim submitted by a signed-in batchmate.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectClaim {
    /// Profile being claimed.
    pub alumni_id: AlumniId,
    /// Submitted profile fields. `full_name` and `email` also drive identity
    /// resolution.
    pub update: ProfileUpdate,
}

/// Result of a successful direct claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectClaimOutcome {
    /// Claimed profile.
    pub alumni_id: AlumniId,
    /// Owner recorded on the profile after the claim.
    pub owner: Option<UserId>,
}

/// Driving port used by HTTP handlers for claim writes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClaimCommand: Send + Sync {
    /// Claim a profile directly on behalf of `claimant`.
    ///
    /// # Errors
    ///
    /// - `not_found` when the profile does not exist.
    /// - `conflict` when another account owns it, including when ownership
    ///   changes between the check and the write.
    /// - `invalid_request` for field validation failures.
    async fn claim_profile(
        &self,
        claimant: UserId,
        claim: DirectClaim,
    ) -> Result<DirectClaimOutcome, Error>;

    /// Mint a claim token for an unclaimed profile.
    ///
    /// # Errors
    ///
    /// - `forbidden` unless `actor` is an admin.
    /// - `not_found` when the profile does not exist.
    /// - `invalid_request` with `details.code = "already_claimed"` when the
    ///   profile has an owner.
    async fn issue_token(
        &self,
        actor: &SessionClaims,
        alumni_id: AlumniId,
    ) -> Result<IssuedClaimToken, Error>;
}
