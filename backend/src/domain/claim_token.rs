//! Single-use claim tokens that let a batchmate take over a profile.
//!
//! Only the SHA-256 digest of a token is persisted. The raw value exists in
//! the issuing response and in the claim link handed to the batchmate.

use std::fmt;

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use super::alumni::AlumniId;

/// Upper bound on the length of a submitted raw token.
pub const CLAIM_TOKEN_MAX: usize = 256;

/// Validation failures for submitted tokens.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClaimTokenValidationError {
    #[error("claim token must not be empty")]
    Empty,
    #[error("claim token must be at most {max} characters")]
    TooLong { max: usize },
}

/// Raw claim token as handed to a batchmate.
#[derive(Clone, PartialEq, Eq)]
pub struct ClaimTokenValue(String);

impl ClaimTokenValue {
    /// Validate a submitted raw token.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ClaimTokenValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ClaimTokenValidationError::Empty);
        }
        if trimmed.len() > CLAIM_TOKEN_MAX {
            return Err(ClaimTokenValidationError::TooLong { max: CLAIM_TOKEN_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Wrap a token minted by a generator. The caller guarantees a short,
    /// non-empty, whitespace-free value.
    pub(crate) fn from_generated(raw: String) -> Self {
        Self(raw)
    }

    /// Borrow the raw token.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Digest under which the token is stored.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::ClaimTokenValue;
    ///
    /// let token = ClaimTokenValue::new("abc").expect("valid token");
    /// assert_eq!(
    ///     token.digest().as_str(),
    ///     "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    /// );
    /// ```
    pub fn digest(&self) -> ClaimTokenHash {
        ClaimTokenHash(hex::encode(Sha256::digest(self.0.as_bytes())))
    }
}

impl fmt::Debug for ClaimTokenValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ClaimTokenValue(<redacted>)")
    }
}

/// Hex-encoded SHA-256 digest of a raw claim token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClaimTokenHash(String);

impl ClaimTokenHash {
    /// Wrap a digest read back from storage.
    pub fn from_stored(hex_digest: impl Into<String>) -> Self {
        Self(hex_digest.into())
    }

    /// Borrow the hex digest.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Redeemability of a token at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenStatus {
    Valid,
    Used,
    Expired,
}

/// Persisted claim token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimToken {
    pub hash: ClaimTokenHash,
    pub alumni_id: AlumniId,
    pub used: bool,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl ClaimToken {
    /// Evaluate the token at `now`. A used token reports `Used` even after it
    /// has also expired.
    pub fn status_at(&self, now: DateTime<Utc>) -> TokenStatus {
        if self.used {
            TokenStatus::Used
        } else if self.expires_at <= now {
            TokenStatus::Expired
        } else {
            TokenStatus::Valid
        }
    }
}

/// Result of minting a token: the raw value is only ever available here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedClaimToken {
    pub token: ClaimTokenValue,
    pub claim_url: String,
    pub expires_at: DateTime<Utc>,
}
