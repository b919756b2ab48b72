//! Conversions between Diesel rows and domain aggregates.
//!
//! Stored values are re-validated on the way out; a failure means the row
//! was written by something other than this crate and is reported as a
//! query error by the caller.

use chrono::{DateTime, Utc};

use crate::domain::{
    AlumniId, AlumniProfile, Attendance, ClaimToken, ClaimTokenHash, EmailAddress, Event,
    EventDraft, EventId, Hotel, HotelDraft, HotelId, Memory, MemoryDraft, MemoryId,
    PasswordHash, Role, User, UserId,
};

use super::models::{
    AlumniChangeset, AlumniRow, ClaimTokenRow, EventRow, HotelChangeset, HotelRow, MemoryRow,
    NewClaimTokenRow, NewHotelRow, UserRow,
};

pub(super) fn user_from_row(row: UserRow) -> Result<User, String> {
    let email = EmailAddress::new(&row.email)
        .map_err(|err| format!("invalid email stored for user {}: {err}", row.id))?;
    let role: Role = row
        .role
        .parse()
        .map_err(|err| format!("invalid role stored for user {}: {err}", row.id))?;
    Ok(User {
        id: UserId::from_uuid(row.id),
        email,
        full_name: row.full_name,
        password_hash: row.password_hash.map(PasswordHash::new),
        role,
        created_at: row.created_at,
    })
}

pub(super) fn profile_from_row(row: AlumniRow) -> Result<AlumniProfile, String> {
    let email = EmailAddress::new(&row.email)
        .map_err(|err| format!("invalid email stored for profile {}: {err}", row.id))?;
    let attendance = row
        .attendance
        .as_deref()
        .map(str::parse::<Attendance>)
        .transpose()
        .map_err(|err| format!("invalid attendance stored for profile {}: {err}", row.id))?;
    Ok(AlumniProfile {
        id: AlumniId::new(row.id),
        owner: row.owner_id.map(UserId::from_uuid),
        roll_number: row.roll_number,
        full_name: row.full_name,
        email,
        phone_number: row.phone_number,
        whatsapp_number: row.whatsapp_number,
        linkedin_url: row.linkedin_url,
        instagram_handle: row.instagram_handle,
        country: row.country,
        state: row.state,
        city: row.city,
        latitude: row.latitude,
        longitude: row.longitude,
        bio: row.bio,
        memory_note: row.memory_note,
        profession: row.profession,
        company: row.company,
        specialization: row.specialization,
        profile_photo_url: row.profile_photo_url,
        then_photo_url: row.then_photo_url,
        attendance,
        rsvp_adults: row.rsvp_adults,
        rsvp_kids: row.rsvp_kids,
        hotel_selection: row.hotel_id.map(HotelId::new),
        updated_at: row.updated_at,
    })
}

pub(super) fn profile_changeset(profile: &AlumniProfile) -> AlumniChangeset<'_> {
    AlumniChangeset {
        owner_id: profile.owner.map(|owner| *owner.as_uuid()),
        roll_number: profile.roll_number,
        full_name: &profile.full_name,
        email: profile.email.as_ref(),
        phone_number: profile.phone_number.as_deref(),
        whatsapp_number: profile.whatsapp_number.as_deref(),
        linkedin_url: profile.linkedin_url.as_deref(),
        instagram_handle: profile.instagram_handle.as_deref(),
        country: profile.country.as_deref(),
        state: profile.state.as_deref(),
        city: profile.city.as_deref(),
        latitude: profile.latitude,
        longitude: profile.longitude,
        bio: profile.bio.as_deref(),
        memory_note: profile.memory_note.as_deref(),
        profession: profile.profession.as_deref(),
        company: profile.company.as_deref(),
        specialization: profile.specialization.as_deref(),
        profile_photo_url: profile.profile_photo_url.as_deref(),
        then_photo_url: profile.then_photo_url.as_deref(),
        attendance: profile.attendance.map(Attendance::as_str),
        rsvp_adults: profile.rsvp_adults,
        rsvp_kids: profile.rsvp_kids,
        hotel_id: profile.hotel_selection.map(HotelId::get),
        updated_at: profile.updated_at,
    }
}

pub(super) fn token_from_row(row: ClaimTokenRow) -> ClaimToken {
    ClaimToken {
        hash: ClaimTokenHash::from_stored(row.token_hash),
        alumni_id: AlumniId::new(row.alumni_id),
        used: row.used,
        expires_at: row.expires_at,
        created_at: row.created_at,
    }
}

pub(super) fn token_to_row(token: &ClaimToken) -> NewClaimTokenRow<'_> {
    NewClaimTokenRow {
        token_hash: token.hash.as_str(),
        alumni_id: token.alumni_id.get(),
        used: token.used,
        expires_at: token.expires_at,
        created_at: token.created_at,
    }
}

pub(super) fn hotel_from_row(row: HotelRow) -> Hotel {
    Hotel {
        id: HotelId::new(row.id),
        draft: HotelDraft {
            name: row.name,
            address: row.address,
            price_range: row.price_range,
            website_url: row.website_url,
            contact: row.contact,
            distance_note: row.distance_note,
        },
        created_at: row.created_at,
    }
}

pub(super) fn new_hotel_row(draft: &HotelDraft, now: DateTime<Utc>) -> NewHotelRow<'_> {
    NewHotelRow {
        name: &draft.name,
        address: draft.address.as_deref(),
        price_range: draft.price_range.as_deref(),
        website_url: draft.website_url.as_deref(),
        contact: draft.contact.as_deref(),
        distance_note: draft.distance_note.as_deref(),
        created_at: now,
    }
}

pub(super) fn hotel_changeset(draft: &HotelDraft) -> HotelChangeset<'_> {
    HotelChangeset {
        name: &draft.name,
        address: draft.address.as_deref(),
        price_range: draft.price_range.as_deref(),
        website_url: draft.website_url.as_deref(),
        contact: draft.contact.as_deref(),
        distance_note: draft.distance_note.as_deref(),
    }
}

pub(super) fn event_from_row(row: EventRow) -> Event {
    Event {
        id: EventId::new(row.id),
        draft: EventDraft {
            title: row.title,
            description: row.description,
            location: row.location,
            starts_at: row.starts_at,
        },
        created_by: UserId::from_uuid(row.created_by),
        created_at: row.created_at,
    }
}

pub(super) fn memory_from_row(row: MemoryRow) -> Memory {
    Memory {
        id: MemoryId::new(row.id),
        author: UserId::from_uuid(row.author_id),
        draft: MemoryDraft {
            image_url: row.image_url,
            caption: row.caption,
        },
        created_at: row.created_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{fixed_now, profile};
    use rstest::rstest;
    use uuid::Uuid;

    fn user_row(role: &str) -> UserRow {
        UserRow {
            id: Uuid::new_v4(),
            email: "a@example.com".into(),
            full_name: None,
            password_hash: None,
            role: role.into(),
            created_at: fixed_now(),
        }
    }

    #[rstest]
    fn user_rows_parse_roles() {
        let user = user_from_row(user_row("alumni")).expect("valid row");
        assert_eq!(user.role, Role::Alumni);
    }

    #[rstest]
    fn unknown_stored_role_is_reported() {
        let err = user_from_row(user_row("superuser")).expect_err("invalid role");
        assert!(err.contains("invalid role"));
    }

    #[rstest]
    fn changeset_writes_null_for_cleared_fields() {
        let mut source = profile(3, "Anita Rao", "anita@example.com");
        source.attendance = Some(Attendance::NotAttending);
        source.hotel_selection = Some(HotelId::new(9));

        let changeset = profile_changeset(&source);

        assert_eq!(changeset.attendance, Some("not_attending"));
        assert_eq!(changeset.hotel_id, Some(9));
        assert_eq!(changeset.city, None);
        assert_eq!(changeset.owner_id, None);
    }
}
