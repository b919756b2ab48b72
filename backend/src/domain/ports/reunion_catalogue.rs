//! Driving ports for hotels, events and the memory wall.

use async_trait::async_trait;

use crate::domain::{
    Error, Event, EventDraft, EventId, EventSummary, Hotel, HotelDraft, HotelId, HotelWithGuests,
    Memory, MemoryDraft, MemoryId, SessionClaims,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HotelCatalogue: Send + Sync {
    /// Hotels with guest counts.
    async fn list(&self) -> Result<Vec<HotelWithGuests>, Error>;

    /// Add a hotel (admin only).
    async fn create(&self, actor: &SessionClaims, draft: HotelDraft) -> Result<Hotel, Error>;

    /// Edit a hotel (admin only).
    async fn update(
        &self,
        actor: &SessionClaims,
        id: HotelId,
        draft: HotelDraft,
    ) -> Result<Hotel, Error>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventCalendar: Send + Sync {
    /// Events with attendee counts.
    async fn list(&self) -> Result<Vec<EventSummary>, Error>;

    /// Schedule an event (admin only).
    async fn create(&self, actor: &SessionClaims, draft: EventDraft) -> Result<Event, Error>;

    /// Mark the caller as attending.
    async fn join(&self, actor: &SessionClaims, id: EventId) -> Result<(), Error>;

    /// Withdraw the caller's attendance.
    async fn leave(&self, actor: &SessionClaims, id: EventId) -> Result<(), Error>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MemoryWall: Send + Sync {
    /// Most recent memories first.
    async fn list(&self) -> Result<Vec<Memory>, Error>;

    /// Post a memory as the caller.
    async fn post(&self, actor: &SessionClaims, draft: MemoryDraft) -> Result<Memory, Error>;

    /// Delete a memory (author or admin).
    async fn delete(&self, actor: &SessionClaims, id: MemoryId) -> Result<(), Error>;
}
