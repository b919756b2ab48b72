//! Reunion events and attendance.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::UserId;

/// Identifier of an event row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(i64);

impl EventId {
    /// Wrap a raw row identifier.
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Raw row identifier.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Validation failures for event drafts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EventValidationError {
    #[error("event title must not be empty")]
    EmptyTitle,
}

/// Attributes supplied when scheduling an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDraft {
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
}

impl EventDraft {
    /// Trim the title and reject blank ones.
    pub fn validated(mut self) -> Result<Self, EventValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(EventValidationError::EmptyTitle);
        }
        self.title = title.to_owned();
        Ok(self)
    }
}

/// Stored event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub id: EventId,
    pub draft: EventDraft,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
}

/// Event listing row with its attendee count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventSummary {
    pub event: Event,
    pub attendee_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validated_rejects_blank_title() {
        let draft = EventDraft {
            title: "\t".into(),
            description: None,
            location: None,
            starts_at: None,
        };
        assert_eq!(draft.validated(), Err(EventValidationError::EmptyTitle));
    }
}
