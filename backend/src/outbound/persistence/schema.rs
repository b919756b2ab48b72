//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `migrations/` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Accounts. Email is unique and stored lower-cased.
    users (id) {
        id -> Uuid,
        email -> Varchar,
        full_name -> Nullable<Varchar>,
        password_hash -> Nullable<Text>,
        role -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Batch directory profiles. `owner_id` is null until claimed.
    alumni (id) {
        id -> Int8,
        owner_id -> Nullable<Uuid>,
        roll_number -> Nullable<Int4>,
        full_name -> Varchar,
        email -> Varchar,
        phone_number -> Nullable<Text>,
        whatsapp_number -> Nullable<Text>,
        linkedin_url -> Nullable<Text>,
        instagram_handle -> Nullable<Text>,
        country -> Nullable<Text>,
        state -> Nullable<Text>,
        city -> Nullable<Text>,
        latitude -> Nullable<Float8>,
        longitude -> Nullable<Float8>,
        bio -> Nullable<Text>,
        memory_note -> Nullable<Text>,
        profession -> Nullable<Text>,
        company -> Nullable<Text>,
        specialization -> Nullable<Text>,
        profile_photo_url -> Nullable<Text>,
        then_photo_url -> Nullable<Text>,
        attendance -> Nullable<Varchar>,
        rsvp_adults -> Int4,
        rsvp_kids -> Int4,
        hotel_id -> Nullable<Int8>,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Single-use claim tokens, keyed by SHA-256 hex digest.
    claim_tokens (token_hash) {
        token_hash -> Varchar,
        alumni_id -> Int8,
        used -> Bool,
        expires_at -> Timestamptz,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    hotels (id) {
        id -> Int8,
        name -> Text,
        address -> Nullable<Text>,
        price_range -> Nullable<Text>,
        website_url -> Nullable<Text>,
        contact -> Nullable<Text>,
        distance_note -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    events (id) {
        id -> Int8,
        title -> Text,
        description -> Nullable<Text>,
        location -> Nullable<Text>,
        starts_at -> Nullable<Timestamptz>,
        created_by -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    event_attendees (event_id, user_id) {
        event_id -> Int8,
        user_id -> Uuid,
        joined_at -> Timestamptz,
    }
}

diesel::table! {
    memories (id) {
        id -> Int8,
        author_id -> Uuid,
        image_url -> Text,
        caption -> Nullable<Varchar>,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(alumni -> hotels (hotel_id));
diesel::joinable!(claim_tokens -> alumni (alumni_id));
diesel::joinable!(event_attendees -> events (event_id));
diesel::joinable!(memories -> users (author_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    alumni,
    claim_tokens,
    hotels,
    events,
    event_attendees,
    memories,
);
