//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{alumni, claim_tokens, event_attendees, events, hotels, memories, users};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub password_hash: Option<String>,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub full_name: Option<&'a str>,
    pub password_hash: Option<&'a str>,
    pub role: &'a str,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Alumni profiles
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = alumni)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AlumniRow {
    pub id: i64,
    pub owner_id: Option<Uuid>,
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
    pub attendance: Option<String>,
    pub rsvp_adults: i32,
    pub rsvp_kids: i32,
    pub hotel_id: Option<i64>,
    pub updated_at: DateTime<Utc>,
}

/// Full overwrite of a profile's mutable columns. `None` writes `NULL`.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = alumni)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct AlumniChangeset<'a> {
    pub owner_id: Option<Uuid>,
    pub roll_number: Option<i32>,
    pub full_name: &'a str,
    pub email: &'a str,
    pub phone_number: Option<&'a str>,
    pub whatsapp_number: Option<&'a str>,
    pub linkedin_url: Option<&'a str>,
    pub instagram_handle: Option<&'a str>,
    pub country: Option<&'a str>,
    pub state: Option<&'a str>,
    pub city: Option<&'a str>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub bio: Option<&'a str>,
    pub memory_note: Option<&'a str>,
    pub profession: Option<&'a str>,
    pub company: Option<&'a str>,
    pub specialization: Option<&'a str>,
    pub profile_photo_url: Option<&'a str>,
    pub then_photo_url: Option<&'a str>,
    pub attendance: Option<&'a str>,
    pub rsvp_adults: i32,
    pub rsvp_kids: i32,
    pub hotel_id: Option<i64>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = alumni)]
pub(crate) struct NewRosterRow<'a> {
    pub full_name: &'a str,
    pub email: &'a str,
    pub roll_number: Option<i32>,
    pub city: Option<&'a str>,
    pub state: Option<&'a str>,
    pub country: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Claim tokens
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = claim_tokens)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ClaimTokenRow {
    pub token_hash: String,
    pub alumni_id: i64,
    pub used: bool,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = claim_tokens)]
pub(crate) struct NewClaimTokenRow<'a> {
    pub token_hash: &'a str,
    pub alumni_id: i64,
    pub used: bool,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Hotels, events and memories
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = hotels)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct HotelRow {
    pub id: i64,
    pub name: String,
    pub address: Option<String>,
    pub price_range: Option<String>,
    pub website_url: Option<String>,
    pub contact: Option<String>,
    pub distance_note: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = hotels)]
pub(crate) struct NewHotelRow<'a> {
    pub name: &'a str,
    pub address: Option<&'a str>,
    pub price_range: Option<&'a str>,
    pub website_url: Option<&'a str>,
    pub contact: Option<&'a str>,
    pub distance_note: Option<&'a str>,
    pub created_at: DateTime<Utc>,
}

/// Full overwrite of a hotel's editable columns. `None` writes `NULL`.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = hotels)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct HotelChangeset<'a> {
    pub name: &'a str,
    pub address: Option<&'a str>,
    pub price_range: Option<&'a str>,
    pub website_url: Option<&'a str>,
    pub contact: Option<&'a str>,
    pub distance_note: Option<&'a str>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = events)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct EventRow {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = events)]
pub(crate) struct NewEventRow<'a> {
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub location: Option<&'a str>,
    pub starts_at: Option<DateTime<Utc>>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = event_attendees)]
pub(crate) struct NewAttendeeRow {
    pub event_id: i64,
    pub user_id: Uuid,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = memories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MemoryRow {
    pub id: i64,
    pub author_id: Uuid,
    pub image_url: String,
    pub caption: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = memories)]
pub(crate) struct NewMemoryRow<'a> {
    pub author_id: Uuid,
    pub image_url: &'a str,
    pub caption: Option<&'a str>,
    pub created_at: DateTime<Utc>,
}
