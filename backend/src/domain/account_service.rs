//! Account lifecycle: registration (with optional claim token redemption),
//! password login, trusted-proxy sign-in and session refresh.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::Clock;
use tracing::{info, warn};

use super::ports::{
    AccountCommand, AlumniRepository, ClaimTokenRepository, CredentialHasher, TokenRedemption,
    UserPersistenceError, UserRepository,
};
use super::{
    ClaimTokenValue, Error, ExternalIdentity, LoginCredentials, PasswordHash, Registration, Role,
    RoleGate, SessionClaims, TokenStatus, User, UserId, map_alumni_error, map_claim_token_error,
    map_hash_error, map_user_error, token_rejected,
};

/// Driven ports the account service needs.
#[derive(Clone)]
pub struct AccountPorts {
    pub users: Arc<dyn UserRepository>,
    pub alumni: Arc<dyn AlumniRepository>,
    pub tokens: Arc<dyn ClaimTokenRepository>,
    pub hasher: Arc<dyn CredentialHasher>,
    pub clock: Arc<dyn Clock>,
}

/// Implements [`AccountCommand`].
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    alumni: Arc<dyn AlumniRepository>,
    tokens: Arc<dyn ClaimTokenRepository>,
    hasher: Arc<dyn CredentialHasher>,
    clock: Arc<dyn Clock>,
    roles: RoleGate,
}

fn invalid_credentials() -> Error {
    Error::unauthorized("invalid email or password")
}

impl AccountService {
    /// Wire the service to its ports.
    pub fn new(ports: AccountPorts) -> Self {
        let AccountPorts {
            users,
            alumni,
            tokens,
            hasher,
            clock,
        } = ports;
        Self {
            roles: RoleGate::new(users.clone(), alumni.clone()),
            users,
            alumni,
            tokens,
            hasher,
            clock,
        }
    }

    async fn redeem_token(
        &self,
        registration: &Registration,
        token: &ClaimTokenValue,
        password_hash: PasswordHash,
        now: DateTime<Utc>,
    ) -> Result<SessionClaims, Error> {
        let hash = token.digest();
        let stored = self
            .tokens
            .find_by_hash(&hash)
            .await
            .map_err(map_claim_token_error)?
            .ok_or_else(|| token_rejected("invalid"))?;
        match stored.status_at(now) {
            TokenStatus::Used => return Err(token_rejected("used")),
            TokenStatus::Expired => return Err(token_rejected("expired")),
            TokenStatus::Valid => {}
        }

        let user = User::register(
            registration.email().clone(),
            registration.full_name().map(str::to_owned),
            Some(password_hash),
            Role::Alumni,
            now,
        );
        let alumni_id = self
            .tokens
            .redeem(&TokenRedemption {
                hash,
                user: user.clone(),
                now,
            })
            .await
            .map_err(map_claim_token_error)?;
        info!(user_id = %user.id, alumni_id = %alumni_id, "claim token redeemed");
        Ok(SessionClaims {
            user_id: user.id,
            role: Role::Alumni,
            alumni_id: Some(alumni_id),
        })
    }

    /// Link the unclaimed profile registered under the account email, if any,
    /// and promote the account to alumni.
    async fn link_matching_profile(&self, user: User, now: DateTime<Utc>) -> Result<SessionClaims, Error> {
        let candidate = self
            .alumni
            .find_by_email(&user.email)
            .await
            .map_err(map_alumni_error)?
            .filter(|profile| !profile.is_claimed());
        if let Some(profile) = candidate {
            let linked = self
                .alumni
                .link_if_unclaimed(profile.id, user.id, now)
                .await
                .map_err(map_alumni_error)?;
            if linked {
                let role = self.roles.promote(user.id, Role::Alumni).await?;
                info!(user_id = %user.id, alumni_id = %profile.id, "profile linked by email");
                return Ok(SessionClaims {
                    user_id: user.id,
                    role,
                    alumni_id: Some(profile.id),
                });
            }
        }
        self.roles.claims_for(&user).await
    }

    async fn find_or_provision(&self, identity: &ExternalIdentity, now: DateTime<Utc>) -> Result<User, Error> {
        if let Some(user) = self
            .users
            .find_by_email(&identity.email)
            .await
            .map_err(map_user_error)?
        {
            return Ok(user);
        }
        let user = User::register(
            identity.email.clone(),
            identity.full_name.clone(),
            None,
            Role::Standard,
            now,
        );
        match self.users.insert(&user).await {
            Ok(()) => {
                info!(user_id = %user.id, provider = %identity.provider, "external account provisioned");
                Ok(user)
            }
            Err(UserPersistenceError::DuplicateEmail { .. }) => self
                .users
                .find_by_email(&identity.email)
                .await
                .map_err(map_user_error)?
                .ok_or_else(|| Error::internal("account vanished during provisioning")),
            Err(err) => Err(map_user_error(err)),
        }
    }
}

#[async_trait]
impl AccountCommand for AccountService {
    async fn register(&self, registration: Registration) -> Result<SessionClaims, Error> {
        let existing = self
            .users
            .find_by_email(registration.email())
            .await
            .map_err(map_user_error)?;
        if existing.is_some() {
            return Err(map_user_error(UserPersistenceError::duplicate_email(
                registration.email().as_ref(),
            )));
        }

        let password_hash = self
            .hasher
            .hash(registration.password())
            .map_err(map_hash_error)?;
        let now = self.clock.utc();
        if let Some(token) = registration.claim_token() {
            return self
                .redeem_token(&registration, token, password_hash, now)
                .await;
        }

        let user = User::register(
            registration.email().clone(),
            registration.full_name().map(str::to_owned),
            Some(password_hash),
            Role::Standard,
            now,
        );
        self.users.insert(&user).await.map_err(map_user_error)?;
        info!(user_id = %user.id, "account registered");
        self.link_matching_profile(user, now).await
    }

    async fn login(&self, credentials: LoginCredentials) -> Result<SessionClaims, Error> {
        let user = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(map_user_error)?
            .ok_or_else(invalid_credentials)?;
        let Some(hash) = user.password_hash.as_ref() else {
            warn!(user_id = %user.id, "password login attempted on external account");
            return Err(invalid_credentials());
        };
        if !self
            .hasher
            .verify(credentials.password(), hash)
            .map_err(map_hash_error)?
        {
            return Err(invalid_credentials());
        }
        self.roles.claims_for(&user).await
    }

    async fn sign_in_external(&self, identity: ExternalIdentity) -> Result<SessionClaims, Error> {
        let now = self.clock.utc();
        let user = self.find_or_provision(&identity, now).await?;
        self.link_matching_profile(user, now).await
    }

    async fn refresh(&self, user_id: UserId) -> Result<SessionClaims, Error> {
        let user = self
            .users
            .find_by_id(user_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::unauthorized("session no longer valid"))?;
        self.roles.claims_for(&user).await
    }
}
