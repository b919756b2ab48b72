//! Driving port for read-only claim views.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::{ClaimTokenValue, Error, SessionClaims, UnclaimedProfile};

/// Presentational state of a claim link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimLinkStatus {
    /// Redeemable now.
    Valid,
    /// Unknown token.
    Invalid,
    /// Past its expiry.
    Expired,
    /// Already redeemed.
    Claimed,
}

/// Claim link preview shown before registration.
#[derive(Debug, Clone, PartialEq)]
pub struct ClaimPreview {
    /// Link state.
    pub status: ClaimLinkStatus,
    /// Target profile, present only for valid links.
    pub profile: Option<UnclaimedProfile>,
}

/// Driving port used by HTTP handlers for claim reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClaimQuery: Send + Sync {
    /// Evaluate a claim link without consuming it.
    async fn preview(&self, token: ClaimTokenValue) -> Result<ClaimPreview, Error>;

    /// Unclaimed profiles an admin may mint tokens for.
    async fn unclaimed_for_tokens(
        &self,
        actor: &SessionClaims,
    ) -> Result<Vec<UnclaimedProfile>, Error>;
}
