//! Driving port for browsing the alumni directory.

use async_trait::async_trait;

use crate::domain::{AlumniId, AlumniProfile, DirectoryEntry, Error, SessionClaims, UnclaimedProfile};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DirectoryQuery: Send + Sync {
    /// Public search over unclaimed profiles by name fragment.
    async fn search_unclaimed(&self, search: Option<String>)
    -> Result<Vec<UnclaimedProfile>, Error>;

    /// Directory listing with map data for signed-in members.
    async fn list(&self, actor: &SessionClaims) -> Result<Vec<DirectoryEntry>, Error>;

    /// Full profile, for linked alumni, the owner or an admin.
    async fn profile(&self, actor: &SessionClaims, id: AlumniId) -> Result<AlumniProfile, Error>;

    /// The caller's own profile.
    async fn own_profile(&self, actor: &SessionClaims) -> Result<AlumniProfile, Error>;
}
