//! Translation of driven-port failures into domain errors.
//!
//! Connection failures become `service_unavailable`; query failures become
//! `internal_error`, whose message the HTTP adapter redacts. Constraint
//! violations that a caller can fix map to `conflict` or `invalid_request`.

use serde_json::json;
use tracing::error;

use super::Error;
use super::ports::{
    AlumniRepositoryError, ClaimTokenRepositoryError, CredentialHashError, EventRepositoryError,
    HotelRepositoryError, MemoryRepositoryError, UserPersistenceError,
};

fn unavailable(store: &str, message: &str) -> Error {
    error!(store, %message, "repository connection failed");
    Error::service_unavailable(format!("{store} repository unavailable: {message}"))
}

fn internal(store: &str, message: &str) -> Error {
    error!(store, %message, "repository query failed");
    Error::internal(format!("{store} repository error: {message}"))
}

fn email_conflict(email: &str) -> Error {
    Error::conflict(format!("{email} is already registered")).with_details(json!({
        "field": "email",
        "code": "email_taken",
    }))
}

/// Claim token refusal; `reason` is `invalid`, `used` or `expired`.
pub(crate) fn token_rejected(reason: &str) -> Error {
    let message = match reason {
        "used" => "claim token has already been used",
        "expired" => "claim token has expired",
        _ => "claim token is invalid or expired",
    };
    Error::invalid_request(message).with_details(json!({ "field": "claimToken", "reason": reason }))
}

pub(crate) fn map_user_error(err: UserPersistenceError) -> Error {
    match err {
        UserPersistenceError::Connection { message } => unavailable("user", &message),
        UserPersistenceError::Query { message } => internal("user", &message),
        UserPersistenceError::DuplicateEmail { email } => email_conflict(&email),
    }
}

pub(crate) fn map_alumni_error(err: AlumniRepositoryError) -> Error {
    match err {
        AlumniRepositoryError::Connection { message } => unavailable("alumni", &message),
        AlumniRepositoryError::Query { message } => internal("alumni", &message),
        AlumniRepositoryError::EmailTaken { email } => email_conflict(&email),
        AlumniRepositoryError::UnknownHotel { hotel_id } => Error::invalid_request(format!(
            "hotel {hotel_id} does not exist"
        ))
        .with_details(json!({ "field": "hotelSelectionId", "code": "unknown_hotel" })),
    }
}

pub(crate) fn map_claim_token_error(err: ClaimTokenRepositoryError) -> Error {
    match err {
        ClaimTokenRepositoryError::Connection { message } => unavailable("claim token", &message),
        ClaimTokenRepositoryError::Query { message } => internal("claim token", &message),
        ClaimTokenRepositoryError::Missing => token_rejected("invalid"),
        ClaimTokenRepositoryError::Used => token_rejected("used"),
        ClaimTokenRepositoryError::Expired => token_rejected("expired"),
        ClaimTokenRepositoryError::EmailTaken { email } => email_conflict(&email),
        ClaimTokenRepositoryError::ProfileClaimed { alumni_id } => {
            Error::conflict("profile already claimed by someone else")
                .with_details(json!({ "alumniId": alumni_id, "code": "already_claimed" }))
        }
    }
}

pub(crate) fn map_hotel_error(err: HotelRepositoryError) -> Error {
    match err {
        HotelRepositoryError::Connection { message } => unavailable("hotel", &message),
        HotelRepositoryError::Query { message } => internal("hotel", &message),
    }
}

pub(crate) fn map_event_error(err: EventRepositoryError) -> Error {
    match err {
        EventRepositoryError::Connection { message } => unavailable("event", &message),
        EventRepositoryError::Query { message } => internal("event", &message),
        EventRepositoryError::UnknownEvent { event_id } => {
            Error::not_found(format!("event {event_id} not found"))
        }
    }
}

pub(crate) fn map_memory_error(err: MemoryRepositoryError) -> Error {
    match err {
        MemoryRepositoryError::Connection { message } => unavailable("memory", &message),
        MemoryRepositoryError::Query { message } => internal("memory", &message),
    }
}

pub(crate) fn map_hash_error(err: CredentialHashError) -> Error {
    error!(error = %err, "credential hashing failed");
    Error::internal(err.to_string())
}
