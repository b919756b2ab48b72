//! Port abstraction for the alumni directory store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    AlumniId, AlumniProfile, DirectoryEntry, EmailAddress, RosterEntry, UnclaimedProfile, UserId,
};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by alumni repository adapters.
    pub enum AlumniRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "alumni repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "alumni repository query failed: {message}",
        /// Another profile already uses the email address.
        EmailTaken { email: String } => "a profile already uses {email}",
        /// The selected hotel does not exist.
        UnknownHotel { hotel_id: i64 } => "hotel {hotel_id} does not exist",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AlumniRepository: Send + Sync {
    /// Fetch a profile by identifier.
    async fn find_by_id(&self, id: AlumniId) -> Result<Option<AlumniProfile>, AlumniRepositoryError>;

    /// Fetch the profile registered under `email`.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<AlumniProfile>, AlumniRepositoryError>;

    /// Fetch the profile owned by `owner`, if any.
    async fn find_by_owner(&self, owner: UserId)
    -> Result<Option<AlumniProfile>, AlumniRepositoryError>;

    /// Unclaimed profiles ordered by name, optionally filtered by a
    /// case-insensitive name fragment.
    async fn search_unclaimed(
        &self,
        name_fragment: Option<String>,
        limit: i64,
    ) -> Result<Vec<UnclaimedProfile>, AlumniRepositoryError>;

    /// Every profile, ordered by name.
    async fn list_directory(&self) -> Result<Vec<DirectoryEntry>, AlumniRepositoryError>;

    /// Overwrite the mutable columns of `profile` only while its stored owner
    /// equals `expected_owner`.
    ///
    /// Returns `false` when the row is missing or ownership changed.
    async fn save_if_owner(
        &self,
        expected_owner: Option<UserId>,
        profile: &AlumniProfile,
    ) -> Result<bool, AlumniRepositoryError>;

    /// Attach `owner` to an unclaimed profile. Returns `false` when the
    /// profile is missing or already owned.
    async fn link_if_unclaimed(
        &self,
        id: AlumniId,
        owner: UserId,
        now: DateTime<Utc>,
    ) -> Result<bool, AlumniRepositoryError>;

    /// Insert roster entries as unclaimed profiles, skipping emails that are
    /// already present. Returns the number of rows inserted.
    async fn import_roster(
        &self,
        entries: &[RosterEntry],
        now: DateTime<Utc>,
    ) -> Result<usize, AlumniRepositoryError>;
}
