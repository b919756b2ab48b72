//! Partner hotels offered to reunion guests.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a hotel row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HotelId(i64);

impl HotelId {
    /// Wrap a raw row identifier.
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Raw row identifier.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for HotelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Editable hotel attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotelDraft {
    pub name: String,
    pub address: Option<String>,
    pub price_range: Option<String>,
    pub website_url: Option<String>,
    pub contact: Option<String>,
    pub distance_note: Option<String>,
}

/// Validation failures for hotel drafts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HotelValidationError {
    #[error("hotel name must not be empty")]
    EmptyName,
}

impl HotelDraft {
    /// Trim the name and reject blank ones.
    pub fn validated(mut self) -> Result<Self, HotelValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(HotelValidationError::EmptyName);
        }
        self.name = name.to_owned();
        Ok(self)
    }
}

/// Stored hotel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hotel {
    pub id: HotelId,
    pub draft: HotelDraft,
    pub created_at: DateTime<Utc>,
}

/// Hotel listing row with the number of profiles that selected it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotelWithGuests {
    pub hotel: Hotel,
    pub guest_count: i64,
}
