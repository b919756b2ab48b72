//! Port abstraction for events and attendance.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Event, EventDraft, EventId, EventSummary, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by event adapters.
    pub enum EventRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "event repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "event repository query failed: {message}",
        /// The referenced event does not exist.
        UnknownEvent { event_id: i64 } => "event {event_id} does not exist",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Events ordered by start time with attendee counts.
    async fn list_with_counts(&self) -> Result<Vec<EventSummary>, EventRepositoryError>;

    /// Schedule a new event.
    async fn create(
        &self,
        draft: &EventDraft,
        created_by: UserId,
        now: DateTime<Utc>,
    ) -> Result<Event, EventRepositoryError>;

    /// Record attendance. Joining twice is a no-op.
    async fn join(
        &self,
        event: EventId,
        user: UserId,
        now: DateTime<Utc>,
    ) -> Result<(), EventRepositoryError>;

    /// Remove attendance. Returns `false` when the user was not attending.
    async fn leave(&self, event: EventId, user: UserId) -> Result<bool, EventRepositoryError>;
}
