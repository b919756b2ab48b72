//! Session claims and the only code path that changes account roles.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::alumni::AlumniId;
use super::ports::{AlumniRepository, UserRepository};
use super::user::{Role, User, UserId};
use super::{Error, map_alumni_error, map_user_error};

const PROMOTION_ATTEMPTS: usize = 3;

/// Authorization facts stored in the session cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionClaims {
    pub user_id: UserId,
    pub role: Role,
    pub alumni_id: Option<AlumniId>,
}

impl SessionClaims {
    /// Reject callers that are not admins.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::{ErrorCode, Role, SessionClaims, UserId};
    ///
    /// let claims = SessionClaims { user_id: UserId::random(), role: Role::Alumni, alumni_id: None };
    /// assert_eq!(claims.require_admin().unwrap_err().code(), ErrorCode::Forbidden);
    /// ```
    pub fn require_admin(&self) -> Result<(), Error> {
        if self.role == Role::Admin {
            Ok(())
        } else {
            Err(Error::forbidden("admin role required"))
        }
    }

    /// Whether the caller may read other members' full profiles: linked
    /// alumni and admins only.
    pub fn can_view_members(&self) -> bool {
        self.alumni_id.is_some() || self.role == Role::Admin
    }
}

/// Maps stored accounts into session claims and owns role transitions.
#[derive(Clone)]
pub struct RoleGate {
    users: Arc<dyn UserRepository>,
    alumni: Arc<dyn AlumniRepository>,
}

impl RoleGate {
    /// Create a gate over the given repositories.
    pub fn new(users: Arc<dyn UserRepository>, alumni: Arc<dyn AlumniRepository>) -> Self {
        Self { users, alumni }
    }

    /// Raise `user_id` to at least `target`. Returns the resulting role.
    ///
    /// Roles are only ever raised; promoting an admin to alumni is a no-op.
    pub async fn promote(&self, user_id: UserId, target: Role) -> Result<Role, Error> {
        for _ in 0..PROMOTION_ATTEMPTS {
            let user = self
                .users
                .find_by_id(user_id)
                .await
                .map_err(map_user_error)?
                .ok_or_else(|| Error::not_found(format!("user {user_id} not found")))?;
            let promoted = user.role.promoted_to(target);
            if promoted == user.role {
                return Ok(promoted);
            }
            let swapped = self
                .users
                .replace_role(user_id, user.role, promoted)
                .await
                .map_err(map_user_error)?;
            if swapped {
                info!(user_id = %user_id, from = %user.role, to = %promoted, "role promoted");
                return Ok(promoted);
            }
        }
        Err(Error::conflict("role changed concurrently; try again"))
    }

    /// Claims for `user`: the owned profile wins, then the profile registered
    /// under the account email.
    pub async fn claims_for(&self, user: &User) -> Result<SessionClaims, Error> {
        let owned = self
            .alumni
            .find_by_owner(user.id)
            .await
            .map_err(map_alumni_error)?;
        let profile = match owned {
            Some(profile) => Some(profile),
            None => self
                .alumni
                .find_by_email(&user.email)
                .await
                .map_err(map_alumni_error)?
                .filter(|profile| profile.owner.is_none_or(|owner| owner == user.id)),
        };
        Ok(SessionClaims {
            user_id: user.id,
            role: user.role,
            alumni_id: profile.map(|profile| profile.id),
        })
    }
}

#[cfg(test)]
mod tests;
