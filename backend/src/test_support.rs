//! Test doubles and builders shared by unit tests (in `src/`) and
//! integration tests (in `tests/`).
//!
//! Compiled for `cfg(test)` and when the `test-support` feature is enabled.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;

use crate::domain::ports::{ClaimTokenGenerator, CredentialHashError, CredentialHasher};
use crate::domain::{
    AlumniId, AlumniProfile, ClaimTokenValue, EmailAddress, PasswordHash, Role, User, UserId,
};

/// Instant used by fixtures: 2025-01-01T00:00:00Z.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_else(|| panic!("fixture timestamp is unambiguous"))
}

/// Clock whose time only moves when told to.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn advance(&self, delta: TimeDelta) {
        *self.lock_clock() += delta;
    }

    fn lock_clock(&self) -> std::sync::MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Default for MutableClock {
    fn default() -> Self {
        Self::new(fixed_now())
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// Reversible "hasher" that keeps tests fast.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainCredentialHasher;

impl CredentialHasher for PlainCredentialHasher {
    fn hash(&self, password: &str) -> Result<PasswordHash, CredentialHashError> {
        Ok(PasswordHash::new(format!("plain${password}")))
    }

    fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, CredentialHashError> {
        hash.as_str()
            .strip_prefix("plain$")
            .map(|stored| stored == password)
            .ok_or_else(|| CredentialHashError::malformed_hash("missing plain$ prefix"))
    }
}

/// Deterministic token source: `token-1`, `token-2`, ...
#[derive(Debug, Default)]
pub struct SequenceTokenGenerator(AtomicUsize);

impl ClaimTokenGenerator for SequenceTokenGenerator {
    fn generate(&self) -> ClaimTokenValue {
        let next = self.0.fetch_add(1, Ordering::SeqCst) + 1;
        ClaimTokenValue::new(format!("token-{next}"))
            .unwrap_or_else(|err| panic!("generated token is valid: {err}"))
    }
}

/// Build an account with a random id created at [`fixed_now`].
pub fn user(email: &str, full_name: Option<&str>, role: Role) -> User {
    User {
        id: UserId::random(),
        email: parse_email(email),
        full_name: full_name.map(str::to_owned),
        password_hash: None,
        role,
        created_at: fixed_now(),
    }
}

/// Build an unclaimed profile with empty optional fields.
pub fn profile(id: i64, full_name: &str, email: &str) -> AlumniProfile {
    AlumniProfile {
        id: AlumniId::new(id),
        owner: None,
        roll_number: None,
        full_name: full_name.to_owned(),
        email: parse_email(email),
        phone_number: None,
        whatsapp_number: None,
        linkedin_url: None,
        instagram_handle: None,
        country: None,
        state: None,
        city: None,
        latitude: None,
        longitude: None,
        bio: None,
        memory_note: None,
        profession: None,
        company: None,
        specialization: None,
        profile_photo_url: None,
        then_photo_url: None,
        attendance: None,
        rsvp_adults: 0,
        rsvp_kids: 0,
        hotel_selection: None,
        updated_at: fixed_now(),
    }
}

fn parse_email(raw: &str) -> EmailAddress {
    EmailAddress::new(raw).unwrap_or_else(|err| panic!("fixture email {raw} is valid: {err}"))
}
