//! Port for minting raw claim tokens.

use crate::domain::ClaimTokenValue;

/// Source of unguessable claim tokens.
#[cfg_attr(test, mockall::automock)]
pub trait ClaimTokenGenerator: Send + Sync {
    /// Produce a fresh raw token.
    fn generate(&self) -> ClaimTokenValue;
}
