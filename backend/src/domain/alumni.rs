//! Alumni directory profiles and the partial updates applied to them.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::hotel::HotelId;
use super::user::{EmailAddress, FULL_NAME_MAX, UserId};

/// Identifier of an alumni profile row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlumniId(i64);

impl AlumniId {
    /// Wrap a raw row identifier.
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Raw row identifier.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for AlumniId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Reunion attendance answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attendance {
    Attending,
    Maybe,
    NotAttending,
}

impl Attendance {
    /// Stable storage representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Attending => "attending",
            Self::Maybe => "maybe",
            Self::NotAttending => "not_attending",
        }
    }
}

impl FromStr for Attendance {
    type Err = ProfileValidationError;

    /// Accepts the storage form plus the `yes`/`no` answers older clients send.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "attending" | "yes" => Ok(Self::Attending),
            "maybe" => Ok(Self::Maybe),
            "not_attending" | "no" => Ok(Self::NotAttending),
            other => Err(ProfileValidationError::UnknownAttendance(other.to_owned())),
        }
    }
}

/// Validation failures for profile updates.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProfileValidationError {
    #[error("full name must be at most {max} characters")]
    FullNameTooLong { max: usize },
    #[error("latitude {0} is outside -90..=90")]
    LatitudeOutOfRange(f64),
    #[error("longitude {0} is outside -180..=180")]
    LongitudeOutOfRange(f64),
    #[error("unknown attendance answer `{0}`")]
    UnknownAttendance(String),
}

impl ProfileValidationError {
    /// Request field the failure refers to.
    pub const fn field(&self) -> &'static str {
        match self {
            Self::FullNameTooLong { .. } => "fullName",
            Self::LatitudeOutOfRange(_) => "latitude",
            Self::LongitudeOutOfRange(_) => "longitude",
            Self::UnknownAttendance(_) => "isAttending",
        }
    }
}

/// A directory profile. `owner` is `None` while the profile is unclaimed.
#[derive(Debug, Clone, PartialEq)]
pub struct AlumniProfile {
    pub id: AlumniId,
    pub owner: Option<UserId>,
    pub roll_number: Option<i32>,
    pub full_name: String,
    pub email: EmailAddress,
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
    pub attendance: Option<Attendance>,
    pub rsvp_adults: i32,
    pub rsvp_kids: i32,
    pub hotel_selection: Option<HotelId>,
    pub updated_at: DateTime<Utc>,
}

impl AlumniProfile {
    /// Whether any account owns this profile.
    pub fn is_claimed(&self) -> bool {
        self.owner.is_some()
    }
}

/// Roster entry used to seed unclaimed profiles.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RosterEntry {
    pub full_name: String,
    pub email: EmailAddress,
    #[serde(default)]
    pub roll_number: Option<i32>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

/// Unclaimed profile as shown in search results and the token admin list.
#[derive(Debug, Clone, PartialEq)]
pub struct UnclaimedProfile {
    pub id: AlumniId,
    pub full_name: String,
    pub email: EmailAddress,
    pub roll_number: Option<i32>,
    pub city: Option<String>,
}

impl From<&AlumniProfile> for UnclaimedProfile {
    fn from(profile: &AlumniProfile) -> Self {
        Self {
            id: profile.id,
            full_name: profile.full_name.clone(),
            email: profile.email.clone(),
            roll_number: profile.roll_number,
            city: profile.city.clone(),
        }
    }
}

/// Directory listing row carrying the member map data.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectoryEntry {
    pub id: AlumniId,
    pub full_name: String,
    pub city: Option<String>,
    pub country: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub attendance: Option<Attendance>,
    pub claimed: bool,
}

impl From<&AlumniProfile> for DirectoryEntry {
    fn from(profile: &AlumniProfile) -> Self {
        Self {
            id: profile.id,
            full_name: profile.full_name.clone(),
            city: profile.city.clone(),
            country: profile.country.clone(),
            latitude: profile.latitude,
            longitude: profile.longitude,
            attendance: profile.attendance,
            claimed: profile.is_claimed(),
        }
    }
}

/// Fields submitted with a direct claim.
///
/// Every field is optional. Absent fields keep their stored value, except the
/// RSVP head counts, which reset to zero when absent or unparsable. A blank
/// text field clears the stored value. `roll_number`, `rsvp_adults` and
/// `rsvp_kids` hold the raw submitted text because clients send them either
/// as numbers or strings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileUpdate {
    pub full_name: Option<String>,
    pub email: Option<EmailAddress>,
    pub roll_number: Option<String>,
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
    pub attendance: Option<Attendance>,
    pub rsvp_adults: Option<String>,
    pub rsvp_kids: Option<String>,
    /// `Some(None)` clears the hotel selection.
    pub hotel_selection: Option<Option<HotelId>>,
}

impl ProfileUpdate {
    /// Check field-level constraints before anything is written.
    pub fn validate(&self) -> Result<(), ProfileValidationError> {
        let name_len = self
            .full_name
            .as_deref()
            .map_or(0, |name| name.trim().chars().count());
        if name_len > FULL_NAME_MAX {
            return Err(ProfileValidationError::FullNameTooLong { max: FULL_NAME_MAX });
        }
        if let Some(lat) = self.latitude.filter(|lat| !(-90.0..=90.0).contains(lat)) {
            return Err(ProfileValidationError::LatitudeOutOfRange(lat));
        }
        if let Some(lng) = self.longitude.filter(|lng| !(-180.0..=180.0).contains(lng)) {
            return Err(ProfileValidationError::LongitudeOutOfRange(lng));
        }
        Ok(())
    }

    /// Merge this update into `profile`, stamping `updated_at` with `now`.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::{AlumniProfile, ProfileUpdate};
    /// # use backend::domain::{AlumniId, EmailAddress};
    /// # let profile = AlumniProfile {
    /// #     id: AlumniId::new(1), owner: None, roll_number: Some(12),
    /// #     full_name: "Bhavik Parmar".into(),
    /// #     email: EmailAddress::new("bhavik@example.com").unwrap(),
    /// #     phone_number: None, whatsapp_number: None, linkedin_url: None,
    /// #     instagram_handle: None, country: None, state: None,
    /// #     city: Some("Pune".into()), latitude: None, longitude: None, bio: None,
    /// #     memory_note: None, profession: None, company: None, specialization: None,
    /// #     profile_photo_url: None, then_photo_url: None, attendance: None,
    /// #     rsvp_adults: 2, rsvp_kids: 1, hotel_selection: None,
    /// #     updated_at: chrono::Utc::now(),
    /// # };
    /// let update = ProfileUpdate {
    ///     phone_number: Some("+91 98200 00000".into()),
    ///     roll_number: Some("not a number".into()),
    ///     rsvp_kids: Some("many".into()),
    ///     ..ProfileUpdate::default()
    /// };
    /// let merged = update.apply_to(profile, chrono::Utc::now());
    /// assert_eq!(merged.phone_number.as_deref(), Some("+91 98200 00000"));
    /// assert_eq!(merged.city.as_deref(), Some("Pune"));
    /// assert_eq!(merged.roll_number, Some(12));
    /// assert_eq!(merged.rsvp_adults, 2);
    /// assert_eq!(merged.rsvp_kids, 0);
    /// ```
    pub fn apply_to(self, mut profile: AlumniProfile, now: DateTime<Utc>) -> AlumniProfile {
        if let Some(name) = self
            .full_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
        {
            name.clone_into(&mut profile.full_name);
        }
        if let Some(email) = self.email {
            profile.email = email;
        }
        profile.roll_number = parse_count(self.roll_number.as_deref()).or(profile.roll_number);

        merge_text(&mut profile.phone_number, self.phone_number);
        merge_text(&mut profile.whatsapp_number, self.whatsapp_number);
        merge_text(&mut profile.linkedin_url, self.linkedin_url);
        merge_text(&mut profile.instagram_handle, self.instagram_handle);
        merge_text(&mut profile.country, self.country);
        merge_text(&mut profile.state, self.state);
        merge_text(&mut profile.city, self.city);
        merge_text(&mut profile.bio, self.bio);
        merge_text(&mut profile.memory_note, self.memory_note);
        merge_text(&mut profile.profession, self.profession);
        merge_text(&mut profile.company, self.company);
        merge_text(&mut profile.specialization, self.specialization);
        merge_text(&mut profile.profile_photo_url, self.profile_photo_url);
        merge_text(&mut profile.then_photo_url, self.then_photo_url);

        if self.latitude.is_some() {
            profile.latitude = self.latitude;
        }
        if self.longitude.is_some() {
            profile.longitude = self.longitude;
        }
        if self.attendance.is_some() {
            profile.attendance = self.attendance;
        }
        if let Some(raw) = self.rsvp_adults {
            profile.rsvp_adults = head_count(&raw);
        }
        if let Some(raw) = self.rsvp_kids {
            profile.rsvp_kids = head_count(&raw);
        }
        if let Some(hotel) = self.hotel_selection {
            profile.hotel_selection = hotel;
        }
        profile.updated_at = now;
        profile
    }
}

fn merge_text(slot: &mut Option<String>, submitted: Option<String>) {
    if let Some(value) = submitted {
        let trimmed = value.trim();
        *slot = (!trimmed.is_empty()).then(|| trimmed.to_owned());
    }
}

fn parse_count(raw: Option<&str>) -> Option<i32> {
    raw.and_then(|value| value.trim().parse::<i32>().ok())
}

/// A submitted count that does not parse, or is negative, becomes zero.
fn head_count(raw: &str) -> i32 {
    parse_count(Some(raw)).unwrap_or(0).max(0)
}
