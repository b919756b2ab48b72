//! JSON response bodies shared by several handlers.
//!
//! Domain types stay free of serialisation concerns; these wrappers fix the
//! camelCase wire shape and carry the OpenAPI schemas.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{
    AlumniProfile, Attendance, DirectoryEntry, EventSummary, Event, Hotel, HotelWithGuests,
    Memory, Role, SessionClaims, UnclaimedProfile,
};

/// Current session claims.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionBody {
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub user_id: String,
    #[schema(value_type = String, example = "alumni")]
    pub role: Role,
    pub alumni_id: Option<i64>,
}

impl From<SessionClaims> for SessionBody {
    fn from(claims: SessionClaims) -> Self {
        Self {
            user_id: claims.user_id.to_string(),
            role: claims.role,
            alumni_id: claims.alumni_id.map(|id| id.get()),
        }
    }
}

/// Public search hit: enough to recognise a batchmate, nothing to contact them.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UnclaimedProfileBody {
    pub id: i64,
    pub full_name: String,
    pub roll_number: Option<i32>,
    pub city: Option<String>,
}

impl From<UnclaimedProfile> for UnclaimedProfileBody {
    fn from(profile: UnclaimedProfile) -> Self {
        Self {
            id: profile.id.get(),
            full_name: profile.full_name,
            roll_number: profile.roll_number,
            city: profile.city,
        }
    }
}

/// Admin view of a profile that can still receive a claim token.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClaimableProfileBody {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub roll_number: Option<i32>,
}

impl From<UnclaimedProfile> for ClaimableProfileBody {
    fn from(profile: UnclaimedProfile) -> Self {
        Self {
            id: profile.id.get(),
            full_name: profile.full_name,
            email: profile.email.to_string(),
            roll_number: profile.roll_number,
        }
    }
}

/// Directory listing row with map data.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryEntryBody {
    pub id: i64,
    pub full_name: String,
    pub city: Option<String>,
    pub country: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[schema(value_type = Option<String>, example = "attending")]
    pub attendance: Option<Attendance>,
    pub claimed: bool,
}

impl From<DirectoryEntry> for DirectoryEntryBody {
    fn from(entry: DirectoryEntry) -> Self {
        Self {
            id: entry.id.get(),
            full_name: entry.full_name,
            city: entry.city,
            country: entry.country,
            latitude: entry.latitude,
            longitude: entry.longitude,
            attendance: entry.attendance,
            claimed: entry.claimed,
        }
    }
}

/// Full profile detail.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AlumniProfileBody {
    pub id: i64,
    pub claimed: bool,
    pub roll_number: Option<i32>,
    pub full_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub whatsapp_number: Option<String>,
    pub linkedin_url: Option<String>,
    pub instagram_handle: Option<String>,
    pub country: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub bio: Option<String>,
    pub memory_note: Option<String>,
    pub profession: Option<String>,
    pub company: Option<String>,
    pub specialization: Option<String>,
    pub profile_photo_url: Option<String>,
    pub then_photo_url: Option<String>,
    #[schema(value_type = Option<String>, example = "maybe")]
    pub is_attending: Option<Attendance>,
    pub rsvp_adults: i32,
    pub rsvp_kids: i32,
    pub hotel_selection_id: Option<i64>,
    pub updated_at: DateTime<Utc>,
}

impl From<AlumniProfile> for AlumniProfileBody {
    fn from(profile: AlumniProfile) -> Self {
        Self {
            id: profile.id.get(),
            claimed: profile.is_claimed(),
            roll_number: profile.roll_number,
            full_name: profile.full_name,
            email: profile.email.to_string(),
            phone_number: profile.phone_number,
            whatsapp_number: profile.whatsapp_number,
            linkedin_url: profile.linkedin_url,
            instagram_handle: profile.instagram_handle,
            country: profile.country,
            state: profile.state,
            city: profile.city,
            latitude: profile.latitude,
            longitude: profile.longitude,
            bio: profile.bio,
            memory_note: profile.memory_note,
            profession: profile.profession,
            company: profile.company,
            specialization: profile.specialization,
            profile_photo_url: profile.profile_photo_url,
            then_photo_url: profile.then_photo_url,
            is_attending: profile.attendance,
            rsvp_adults: profile.rsvp_adults,
            rsvp_kids: profile.rsvp_kids,
            hotel_selection_id: profile.hotel_selection.map(|id| id.get()),
            updated_at: profile.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HotelBody {
    pub id: i64,
    pub name: String,
    pub address: Option<String>,
    pub price_range: Option<String>,
    pub website_url: Option<String>,
    pub contact: Option<String>,
    pub distance_note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest_count: Option<i64>,
}

impl From<Hotel> for HotelBody {
    fn from(hotel: Hotel) -> Self {
        let draft = hotel.draft;
        Self {
            id: hotel.id.get(),
            name: draft.name,
            address: draft.address,
            price_range: draft.price_range,
            website_url: draft.website_url,
            contact: draft.contact,
            distance_note: draft.distance_note,
            guest_count: None,
        }
    }
}

impl From<HotelWithGuests> for HotelBody {
    fn from(listing: HotelWithGuests) -> Self {
        Self {
            guest_count: Some(listing.guest_count),
            ..Self::from(listing.hotel)
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventBody {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
    pub created_by: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attendee_count: Option<i64>,
}

impl From<Event> for EventBody {
    fn from(event: Event) -> Self {
        let draft = event.draft;
        Self {
            id: event.id.get(),
            title: draft.title,
            description: draft.description,
            location: draft.location,
            starts_at: draft.starts_at,
            created_by: event.created_by.to_string(),
            attendee_count: None,
        }
    }
}

impl From<EventSummary> for EventBody {
    fn from(summary: EventSummary) -> Self {
        Self {
            attendee_count: Some(summary.attendee_count),
            ..Self::from(summary.event)
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MemoryBody {
    pub id: i64,
    pub author_id: String,
    pub image_url: String,
    pub caption: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Memory> for MemoryBody {
    fn from(memory: Memory) -> Self {
        Self {
            id: memory.id.get(),
            author_id: memory.author.to_string(),
            image_url: memory.draft.image_url,
            caption: memory.draft.caption,
            created_at: memory.created_at,
        }
    }
}

/// Plain acknowledgement for commands without a payload.
#[derive(Debug, Serialize, ToSchema)]
pub struct SuccessBody {
    pub success: bool,
}

impl SuccessBody {
    pub const fn ok() -> Self {
        Self { success: true }
    }
}
