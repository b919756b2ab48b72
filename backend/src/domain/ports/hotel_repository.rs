//! Port abstraction for hotel storage.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Hotel, HotelDraft, HotelId, HotelWithGuests};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by hotel adapters.
    pub enum HotelRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "hotel repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "hotel repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HotelRepository: Send + Sync {
    /// Hotels ordered by name with the number of profiles selecting each.
    async fn list_with_guest_counts(&self) -> Result<Vec<HotelWithGuests>, HotelRepositoryError>;

    /// Store a new hotel.
    async fn create(&self, draft: &HotelDraft, now: DateTime<Utc>)
    -> Result<Hotel, HotelRepositoryError>;

    /// Replace a hotel's attributes. `None` when the hotel does not exist.
    async fn update(
        &self,
        id: HotelId,
        draft: &HotelDraft,
    ) -> Result<Option<Hotel>, HotelRepositoryError>;
}
