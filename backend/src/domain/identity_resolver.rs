//! Finds the existing account a claimed profile should be linked to.
//!
//! An exact email match always wins. Failing that, names are compared after
//! trimming, lower-casing and collapsing whitespace, and a match is any pair
//! where one name contains the other.

use std::str::FromStr;
use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;

use super::ports::UserRepository;
use super::user::{EmailAddress, UserId};
use super::{Error, map_user_error};

/// How fuzzy name matches are accepted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameMatchPolicy {
    /// Take the oldest account whose name matches.
    #[default]
    FirstMatch,
    /// Only accept a name match when exactly one account qualifies.
    Unambiguous,
}

impl FromStr for NameMatchPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "first_match" => Ok(Self::FirstMatch),
            "unambiguous" => Ok(Self::Unambiguous),
            other => Err(format!("unknown name match policy `{other}`")),
        }
    }
}

/// How a candidate was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Email,
    FuzzyName,
}

/// An account selected for linking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIdentity {
    pub user_id: UserId,
    pub email: EmailAddress,
    pub kind: MatchKind,
}

/// Inputs to a resolution: the submitted values with the profile's stored
/// values as fallback.
#[derive(Debug, Clone, Copy)]
pub struct IdentityQuery<'a> {
    pub email: Option<&'a EmailAddress>,
    pub full_name: Option<&'a str>,
}

/// Collapse whitespace and lower-case a name for comparison.
///
/// # Examples
/// ```
/// use backend::domain::identity_resolver::normalise_name;
///
/// assert_eq!(normalise_name("  Bhavik   PARMAR "), "bhavik parmar");
/// ```
pub fn normalise_name(raw: &str) -> String {
    raw.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

fn names_overlap(candidate: &str, stored: &str) -> bool {
    !candidate.is_empty()
        && !stored.is_empty()
        && (stored.contains(candidate) || candidate.contains(stored))
}

/// Resolves submitted identity hints to an existing account.
#[derive(Clone)]
pub struct IdentityResolver {
    users: Arc<dyn UserRepository>,
    policy: NameMatchPolicy,
}

impl IdentityResolver {
    /// Create a resolver with the given fuzzy-match policy.
    pub fn new(users: Arc<dyn UserRepository>, policy: NameMatchPolicy) -> Self {
        Self { users, policy }
    }

    /// Resolve `query` to an account. No match is `Ok(None)`.
    pub async fn resolve(&self, query: IdentityQuery<'_>) -> Result<Option<ResolvedIdentity>, Error> {
        if let Some(email) = query.email {
            let found = self
                .users
                .find_by_email(email)
                .await
                .map_err(map_user_error)?;
            if let Some(user) = found {
                debug!(user_id = %user.id, "identity resolved by email");
                return Ok(Some(ResolvedIdentity {
                    user_id: user.id,
                    email: user.email,
                    kind: MatchKind::Email,
                }));
            }
        }

        let Some(candidate) = query.full_name.map(normalise_name).filter(|n| !n.is_empty()) else {
            return Ok(None);
        };
        let users = self.users.list_named().await.map_err(map_user_error)?;
        let mut matches = users.into_iter().filter(|user| {
            user.full_name
                .as_deref()
                .is_some_and(|stored| names_overlap(&candidate, &normalise_name(stored)))
        });
        let first = matches.next();
        if self.policy == NameMatchPolicy::Unambiguous && matches.next().is_some() {
            debug!("fuzzy name matched several accounts; not linking");
            return Ok(None);
        }
        Ok(first.map(|user| {
            debug!(user_id = %user.id, "identity resolved by name");
            ResolvedIdentity {
                user_id: user.id,
                email: user.email,
                kind: MatchKind::FuzzyName,
            }
        }))
    }
}
