//! Profile claim orchestration: direct claims, token issuance and claim link
//! previews.
//!
//! Token redemption during registration lives in
//! [`AccountService`](super::AccountService) because it creates the account.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::TimeDelta;
use mockable::Clock;
use serde_json::json;
use tracing::{info, warn};

use super::identity_resolver::{IdentityQuery, IdentityResolver, NameMatchPolicy};
use super::ports::{
    AlumniRepository, ClaimCommand, ClaimLinkStatus, ClaimPreview, ClaimQuery,
    ClaimTokenGenerator, ClaimTokenRepository, DirectClaim, DirectClaimOutcome, UserRepository,
};
use super::{
    AlumniId, ClaimToken, ClaimTokenValue, Error, IssuedClaimToken, ProfileValidationError, Role,
    RoleGate, SessionClaims, TokenStatus, UnclaimedProfile, UserId, map_alumni_error,
    map_claim_token_error,
};

/// Upper bound on rows returned to the token admin list.
const UNCLAIMED_LIST_LIMIT: i64 = 1000;

/// Tunables for claim handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimSettings {
    /// Lifetime of newly minted tokens.
    pub token_ttl: TimeDelta,
    /// Origin claim links are built from, e.g. `https://reunion.example.org`.
    pub public_base_url: String,
    /// Mark earlier unused tokens for the same profile as used when minting.
    pub revoke_previous: bool,
    /// Fuzzy name acceptance during identity resolution.
    pub name_match: NameMatchPolicy,
}

impl ClaimSettings {
    fn claim_url(&self, token: &ClaimTokenValue) -> String {
        format!(
            "{}/claim/{}",
            self.public_base_url.trim_end_matches('/'),
            token.as_str()
        )
    }
}

/// Driven ports the claim service needs.
#[derive(Clone)]
pub struct ClaimPorts {
    pub users: Arc<dyn UserRepository>,
    pub alumni: Arc<dyn AlumniRepository>,
    pub tokens: Arc<dyn ClaimTokenRepository>,
    pub generator: Arc<dyn ClaimTokenGenerator>,
    pub clock: Arc<dyn Clock>,
}

/// Implements [`ClaimCommand`] and [`ClaimQuery`].
#[derive(Clone)]
pub struct ClaimService {
    alumni: Arc<dyn AlumniRepository>,
    tokens: Arc<dyn ClaimTokenRepository>,
    generator: Arc<dyn ClaimTokenGenerator>,
    clock: Arc<dyn Clock>,
    resolver: IdentityResolver,
    roles: RoleGate,
    settings: ClaimSettings,
}

impl ClaimService {
    /// Wire the service to its ports.
    pub fn new(ports: ClaimPorts, settings: ClaimSettings) -> Self {
        let ClaimPorts {
            users,
            alumni,
            tokens,
            generator,
            clock,
        } = ports;
        Self {
            resolver: IdentityResolver::new(users.clone(), settings.name_match),
            roles: RoleGate::new(users, alumni.clone()),
            alumni,
            tokens,
            generator,
            clock,
            settings,
        }
    }

    async fn load_profile(&self, id: AlumniId) -> Result<super::AlumniProfile, Error> {
        self.alumni
            .find_by_id(id)
            .await
            .map_err(map_alumni_error)?
            .ok_or_else(|| Error::not_found(format!("alumni profile {id} not found")))
    }
}

fn claimed_by_someone_else(id: AlumniId) -> Error {
    Error::conflict("profile already claimed by someone else")
        .with_details(json!({ "alumniId": id, "code": "already_claimed" }))
}

pub(crate) fn profile_validation_error(err: ProfileValidationError) -> Error {
    Error::invalid_request(err.to_string())
        .with_details(json!({ "field": err.field(), "code": "invalid_field" }))
}

#[async_trait]
impl ClaimCommand for ClaimService {
    async fn claim_profile(
        &self,
        claimant: UserId,
        claim: DirectClaim,
    ) -> Result<DirectClaimOutcome, Error> {
        let DirectClaim { alumni_id, update } = claim;
        update.validate().map_err(profile_validation_error)?;

        let profile = self.load_profile(alumni_id).await?;
        let expected_owner = profile.owner;
        if expected_owner.is_some_and(|owner| owner != claimant) {
            warn!(alumni_id = %alumni_id, claimant = %claimant, "claim rejected: owned by another account");
            return Err(claimed_by_someone_else(alumni_id));
        }

        // An owner resubmitting keeps ownership whatever the details resolve to.
        let resolved = if expected_owner.is_some() {
            None
        } else {
            let email = update.email.clone().unwrap_or_else(|| profile.email.clone());
            let full_name = update
                .full_name
                .as_deref()
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .unwrap_or(profile.full_name.as_str())
                .to_owned();
            self.resolver
                .resolve(IdentityQuery {
                    email: Some(&email),
                    full_name: Some(&full_name),
                })
                .await?
        };
        let owner = resolved
            .as_ref()
            .map(|identity| identity.user_id)
            .or(expected_owner);

        let mut updated = update.apply_to(profile, self.clock.utc());
        updated.owner = owner;
        let saved = self
            .alumni
            .save_if_owner(expected_owner, &updated)
            .await
            .map_err(map_alumni_error)?;
        if !saved {
            warn!(alumni_id = %alumni_id, claimant = %claimant, "claim lost a concurrent ownership change");
            return Err(claimed_by_someone_else(alumni_id));
        }

        if let Some(identity) = resolved {
            self.roles.promote(identity.user_id, Role::Alumni).await?;
        }
        info!(
            alumni_id = %alumni_id,
            claimant = %claimant,
            owner = ?owner.map(|id| id.to_string()),
            "profile claimed"
        );
        Ok(DirectClaimOutcome { alumni_id, owner })
    }

    async fn issue_token(
        &self,
        actor: &SessionClaims,
        alumni_id: AlumniId,
    ) -> Result<IssuedClaimToken, Error> {
        actor.require_admin()?;
        let profile = self.load_profile(alumni_id).await?;
        if profile.is_claimed() {
            return Err(Error::invalid_request("profile is already claimed")
                .with_details(json!({ "field": "alumniId", "code": "already_claimed" })));
        }

        let raw = self.generator.generate();
        let now = self.clock.utc();
        let token = ClaimToken {
            hash: raw.digest(),
            alumni_id,
            used: false,
            expires_at: now + self.settings.token_ttl,
            created_at: now,
        };
        self.tokens
            .insert(&token, self.settings.revoke_previous)
            .await
            .map_err(map_claim_token_error)?;
        info!(
            alumni_id = %alumni_id,
            issued_by = %actor.user_id,
            expires_at = %token.expires_at,
            "claim token issued"
        );
        Ok(IssuedClaimToken {
            claim_url: self.settings.claim_url(&raw),
            token: raw,
            expires_at: token.expires_at,
        })
    }
}

#[async_trait]
impl ClaimQuery for ClaimService {
    async fn preview(&self, token: ClaimTokenValue) -> Result<ClaimPreview, Error> {
        let stored = self
            .tokens
            .find_by_hash(&token.digest())
            .await
            .map_err(map_claim_token_error)?;
        let Some(stored) = stored else {
            return Ok(ClaimPreview {
                status: ClaimLinkStatus::Invalid,
                profile: None,
            });
        };
        let status = match stored.status_at(self.clock.utc()) {
            TokenStatus::Used => ClaimLinkStatus::Claimed,
            TokenStatus::Expired => ClaimLinkStatus::Expired,
            TokenStatus::Valid => {
                let profile = self
                    .alumni
                    .find_by_id(stored.alumni_id)
                    .await
                    .map_err(map_alumni_error)?;
                return Ok(match profile {
                    Some(profile) if !profile.is_claimed() => ClaimPreview {
                        status: ClaimLinkStatus::Valid,
                        profile: Some(UnclaimedProfile::from(&profile)),
                    },
                    Some(_) => ClaimPreview {
                        status: ClaimLinkStatus::Claimed,
                        profile: None,
                    },
                    None => ClaimPreview {
                        status: ClaimLinkStatus::Invalid,
                        profile: None,
                    },
                });
            }
        };
        Ok(ClaimPreview {
            status,
            profile: None,
        })
    }

    async fn unclaimed_for_tokens(
        &self,
        actor: &SessionClaims,
    ) -> Result<Vec<UnclaimedProfile>, Error> {
        actor.require_admin()?;
        self.alumni
            .search_unclaimed(None, UNCLAIMED_LIST_LIMIT)
            .await
            .map_err(map_alumni_error)
    }
}
