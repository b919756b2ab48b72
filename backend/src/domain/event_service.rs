//! Event scheduling and attendance.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::info;

use super::ports::{EventCalendar, EventRepository};
use super::{Error, Event, EventDraft, EventId, EventSummary, SessionClaims, map_event_error};

/// Implements [`EventCalendar`].
#[derive(Clone)]
pub struct EventService {
    events: Arc<dyn EventRepository>,
    clock: Arc<dyn Clock>,
}

impl EventService {
    pub fn new(events: Arc<dyn EventRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { events, clock }
    }
}

#[async_trait]
impl EventCalendar for EventService {
    async fn list(&self) -> Result<Vec<EventSummary>, Error> {
        self.events.list_with_counts().await.map_err(map_event_error)
    }

    async fn create(&self, actor: &SessionClaims, draft: EventDraft) -> Result<Event, Error> {
        actor.require_admin()?;
        let draft = draft.validated().map_err(|err| {
            Error::invalid_request(err.to_string()).with_details(json!({ "field": "title" }))
        })?;
        let event = self
            .events
            .create(&draft, actor.user_id, self.clock.utc())
            .await
            .map_err(map_event_error)?;
        info!(event_id = %event.id, "event created");
        Ok(event)
    }

    async fn join(&self, actor: &SessionClaims, id: EventId) -> Result<(), Error> {
        self.events
            .join(id, actor.user_id, self.clock.utc())
            .await
            .map_err(map_event_error)
    }

    async fn leave(&self, actor: &SessionClaims, id: EventId) -> Result<(), Error> {
        self.events
            .leave(id, actor.user_id)
            .await
            .map(|_| ())
            .map_err(map_event_error)
    }
}
