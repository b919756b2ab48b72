//! In-process store implementing every repository port.
//!
//! Used when no database is configured (local development) and by the
//! end-to-end HTTP tests. All tables share one mutex, so multi-step writes
//! such as token redemption are atomic with respect to other requests.
//! Nothing is awaited while the lock is held.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{
    AlumniRepository, AlumniRepositoryError, ClaimTokenRepository, ClaimTokenRepositoryError,
    EventRepository, EventRepositoryError, HotelRepository, HotelRepositoryError,
    MemoryRepository, MemoryRepositoryError, TokenRedemption, UserPersistenceError, UserRepository,
};
use crate::domain::{
    AlumniId, AlumniProfile, ClaimToken, ClaimTokenHash, DirectoryEntry, EmailAddress, Event,
    EventDraft, EventId, EventSummary, Hotel, HotelDraft, HotelId, HotelWithGuests, Memory,
    MemoryDraft, MemoryId, Role, RosterEntry, TokenStatus, UnclaimedProfile, User, UserId,
};

const POISONED: &str = "in-memory store lock poisoned";

#[derive(Debug, Default)]
struct StoreState {
    users: Vec<User>,
    profiles: BTreeMap<i64, AlumniProfile>,
    tokens: HashMap<String, ClaimToken>,
    hotels: BTreeMap<i64, Hotel>,
    events: BTreeMap<i64, Event>,
    attendees: HashSet<(i64, UserId)>,
    memories: BTreeMap<i64, Memory>,
    last_id: i64,
}

impl StoreState {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn profile_email_taken(&self, email: &EmailAddress, except: AlumniId) -> bool {
        self.profiles
            .values()
            .any(|profile| profile.id != except && &profile.email == email)
    }

    fn user_email_taken(&self, email: &EmailAddress) -> bool {
        self.users.iter().any(|user| &user.email == email)
    }
}

/// Mutex-guarded store shared by all repository ports.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<StoreState>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock<E>(&self, poisoned: impl FnOnce(&'static str) -> E) -> Result<MutexGuard<'_, StoreState>, E> {
        self.state.lock().map_err(|_| poisoned(POISONED))
    }

    /// Insert a profile as-is, keeping its identifier. Intended for seeding
    /// fixtures.
    pub fn put_profile(&self, profile: AlumniProfile) -> Result<(), AlumniRepositoryError> {
        let mut state = self.lock(AlumniRepositoryError::query)?;
        state.last_id = state.last_id.max(profile.id.get());
        state.profiles.insert(profile.id.get(), profile);
        Ok(())
    }

    /// Insert a hotel with the given identifier. Intended for seeding
    /// fixtures.
    pub fn put_hotel(&self, hotel: Hotel) -> Result<(), HotelRepositoryError> {
        let mut state = self.lock(HotelRepositoryError::query)?;
        state.last_id = state.last_id.max(hotel.id.get());
        state.hotels.insert(hotel.id.get(), hotel);
        Ok(())
    }

    /// Number of stored claim tokens.
    pub fn token_count(&self) -> Result<usize, ClaimTokenRepositoryError> {
        Ok(self.lock(ClaimTokenRepositoryError::query)?.tokens.len())
    }

    /// Number of stored accounts.
    pub fn user_count(&self) -> Result<usize, UserPersistenceError> {
        Ok(self.lock(UserPersistenceError::query)?.users.len())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut state = self.lock(UserPersistenceError::query)?;
        if state.user_email_taken(&user.email) {
            return Err(UserPersistenceError::duplicate_email(user.email.as_ref()));
        }
        state.users.push(user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let state = self.lock(UserPersistenceError::query)?;
        Ok(state.users.iter().find(|user| user.id == id).cloned())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserPersistenceError> {
        let state = self.lock(UserPersistenceError::query)?;
        Ok(state.users.iter().find(|user| &user.email == email).cloned())
    }

    async fn list_named(&self) -> Result<Vec<User>, UserPersistenceError> {
        let state = self.lock(UserPersistenceError::query)?;
        let mut named: Vec<User> = state
            .users
            .iter()
            .filter(|user| user.full_name.is_some())
            .cloned()
            .collect();
        named.sort_by_key(|user| user.created_at);
        Ok(named)
    }

    async fn replace_role(
        &self,
        id: UserId,
        expected: Role,
        role: Role,
    ) -> Result<bool, UserPersistenceError> {
        let mut state = self.lock(UserPersistenceError::query)?;
        let Some(user) = state.users.iter_mut().find(|user| user.id == id) else {
            return Ok(false);
        };
        if user.role != expected {
            return Ok(false);
        }
        user.role = role;
        Ok(true)
    }
}

fn name_matches(profile: &AlumniProfile, fragment: Option<&str>) -> bool {
    fragment.is_none_or(|needle| profile.full_name.to_lowercase().contains(needle))
}

#[async_trait]
impl AlumniRepository for InMemoryStore {
    async fn find_by_id(&self, id: AlumniId) -> Result<Option<AlumniProfile>, AlumniRepositoryError> {
        let state = self.lock(AlumniRepositoryError::query)?;
        Ok(state.profiles.get(&id.get()).cloned())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<AlumniProfile>, AlumniRepositoryError> {
        let state = self.lock(AlumniRepositoryError::query)?;
        Ok(state
            .profiles
            .values()
            .find(|profile| &profile.email == email)
            .cloned())
    }

    async fn find_by_owner(
        &self,
        owner: UserId,
    ) -> Result<Option<AlumniProfile>, AlumniRepositoryError> {
        let state = self.lock(AlumniRepositoryError::query)?;
        Ok(state
            .profiles
            .values()
            .find(|profile| profile.owner == Some(owner))
            .cloned())
    }

    async fn search_unclaimed(
        &self,
        name_fragment: Option<String>,
        limit: i64,
    ) -> Result<Vec<UnclaimedProfile>, AlumniRepositoryError> {
        let needle = name_fragment.map(|raw| raw.to_lowercase());
        let state = self.lock(AlumniRepositoryError::query)?;
        let mut found: Vec<UnclaimedProfile> = state
            .profiles
            .values()
            .filter(|profile| !profile.is_claimed() && name_matches(profile, needle.as_deref()))
            .map(UnclaimedProfile::from)
            .collect();
        found.sort_by(|a, b| a.full_name.cmp(&b.full_name));
        found.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(found)
    }

    async fn list_directory(&self) -> Result<Vec<DirectoryEntry>, AlumniRepositoryError> {
        let state = self.lock(AlumniRepositoryError::query)?;
        let mut entries: Vec<DirectoryEntry> =
            state.profiles.values().map(DirectoryEntry::from).collect();
        entries.sort_by(|a, b| a.full_name.cmp(&b.full_name));
        Ok(entries)
    }

    async fn save_if_owner(
        &self,
        expected_owner: Option<UserId>,
        profile: &AlumniProfile,
    ) -> Result<bool, AlumniRepositoryError> {
        let mut state = self.lock(AlumniRepositoryError::query)?;
        let current_owner = match state.profiles.get(&profile.id.get()) {
            Some(stored) => stored.owner,
            None => return Ok(false),
        };
        if current_owner != expected_owner {
            return Ok(false);
        }
        if state.profile_email_taken(&profile.email, profile.id) {
            return Err(AlumniRepositoryError::email_taken(profile.email.as_ref()));
        }
        if let Some(hotel) = profile.hotel_selection {
            if !state.hotels.contains_key(&hotel.get()) {
                return Err(AlumniRepositoryError::unknown_hotel(hotel.get()));
            }
        }
        state.profiles.insert(profile.id.get(), profile.clone());
        Ok(true)
    }

    async fn link_if_unclaimed(
        &self,
        id: AlumniId,
        owner: UserId,
        now: DateTime<Utc>,
    ) -> Result<bool, AlumniRepositoryError> {
        let mut state = self.lock(AlumniRepositoryError::query)?;
        match state.profiles.get_mut(&id.get()) {
            Some(profile) if profile.owner.is_none() => {
                profile.owner = Some(owner);
                profile.updated_at = now;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn import_roster(
        &self,
        entries: &[RosterEntry],
        now: DateTime<Utc>,
    ) -> Result<usize, AlumniRepositoryError> {
        let mut state = self.lock(AlumniRepositoryError::query)?;
        let mut inserted = 0;
        for entry in entries {
            if state.profiles.values().any(|p| p.email == entry.email) {
                continue;
            }
            let id = AlumniId::new(state.next_id());
            state.profiles.insert(id.get(), roster_profile(id, entry, now));
            inserted += 1;
        }
        Ok(inserted)
    }
}

fn roster_profile(id: AlumniId, entry: &RosterEntry, now: DateTime<Utc>) -> AlumniProfile {
    AlumniProfile {
        id,
        owner: None,
        roll_number: entry.roll_number,
        full_name: entry.full_name.trim().to_owned(),
        email: entry.email.clone(),
        phone_number: None,
        whatsapp_number: None,
        linkedin_url: None,
        instagram_handle: None,
        country: entry.country.clone(),
        state: entry.state.clone(),
        city: entry.city.clone(),
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
        updated_at: now,
    }
}

#[async_trait]
impl ClaimTokenRepository for InMemoryStore {
    async fn insert(
        &self,
        token: &ClaimToken,
        revoke_previous: bool,
    ) -> Result<(), ClaimTokenRepositoryError> {
        let mut state = self.lock(ClaimTokenRepositoryError::query)?;
        if revoke_previous {
            state
                .tokens
                .values_mut()
                .filter(|stored| stored.alumni_id == token.alumni_id)
                .for_each(|stored| stored.used = true);
        }
        state
            .tokens
            .insert(token.hash.as_str().to_owned(), token.clone());
        Ok(())
    }

    async fn find_by_hash(
        &self,
        hash: &ClaimTokenHash,
    ) -> Result<Option<ClaimToken>, ClaimTokenRepositoryError> {
        let state = self.lock(ClaimTokenRepositoryError::query)?;
        Ok(state.tokens.get(hash.as_str()).cloned())
    }

    async fn redeem(
        &self,
        redemption: &TokenRedemption,
    ) -> Result<AlumniId, ClaimTokenRepositoryError> {
        let TokenRedemption { hash, user, now } = redemption;
        let mut state = self.lock(ClaimTokenRepositoryError::query)?;

        let alumni_id = match state.tokens.get(hash.as_str()) {
            None => return Err(ClaimTokenRepositoryError::missing()),
            Some(token) => match token.status_at(*now) {
                TokenStatus::Valid => token.alumni_id,
                TokenStatus::Used => return Err(ClaimTokenRepositoryError::used()),
                TokenStatus::Expired => return Err(ClaimTokenRepositoryError::expired()),
            },
        };
        if state.user_email_taken(&user.email) || state.profile_email_taken(&user.email, alumni_id) {
            return Err(ClaimTokenRepositoryError::email_taken(user.email.as_ref()));
        }
        match state.profiles.get(&alumni_id.get()) {
            Some(profile) if profile.owner.is_none() => {}
            Some(_) => return Err(ClaimTokenRepositoryError::profile_claimed(alumni_id.get())),
            None => {
                return Err(ClaimTokenRepositoryError::query(format!(
                    "claim token references missing profile {alumni_id}"
                )));
            }
        }

        if let Some(token) = state.tokens.get_mut(hash.as_str()) {
            token.used = true;
        }
        state.users.push(user.clone());
        if let Some(profile) = state.profiles.get_mut(&alumni_id.get()) {
            profile.owner = Some(user.id);
            profile.email = user.email.clone();
            if let Some(name) = &user.full_name {
                profile.full_name.clone_from(name);
            }
            profile.updated_at = *now;
        }
        Ok(alumni_id)
    }
}

#[async_trait]
impl HotelRepository for InMemoryStore {
    async fn list_with_guest_counts(&self) -> Result<Vec<HotelWithGuests>, HotelRepositoryError> {
        let state = self.lock(HotelRepositoryError::query)?;
        let mut hotels: Vec<HotelWithGuests> = state
            .hotels
            .values()
            .map(|hotel| HotelWithGuests {
                guest_count: state
                    .profiles
                    .values()
                    .filter(|profile| profile.hotel_selection == Some(hotel.id))
                    .count()
                    .try_into()
                    .unwrap_or(i64::MAX),
                hotel: hotel.clone(),
            })
            .collect();
        hotels.sort_by(|a, b| a.hotel.draft.name.cmp(&b.hotel.draft.name));
        Ok(hotels)
    }

    async fn create(
        &self,
        draft: &HotelDraft,
        now: DateTime<Utc>,
    ) -> Result<Hotel, HotelRepositoryError> {
        let mut state = self.lock(HotelRepositoryError::query)?;
        let hotel = Hotel {
            id: HotelId::new(state.next_id()),
            draft: draft.clone(),
            created_at: now,
        };
        state.hotels.insert(hotel.id.get(), hotel.clone());
        Ok(hotel)
    }

    async fn update(
        &self,
        id: HotelId,
        draft: &HotelDraft,
    ) -> Result<Option<Hotel>, HotelRepositoryError> {
        let mut state = self.lock(HotelRepositoryError::query)?;
        Ok(state.hotels.get_mut(&id.get()).map(|hotel| {
            hotel.draft = draft.clone();
            hotel.clone()
        }))
    }
}

#[async_trait]
impl EventRepository for InMemoryStore {
    async fn list_with_counts(&self) -> Result<Vec<EventSummary>, EventRepositoryError> {
        let state = self.lock(EventRepositoryError::query)?;
        let mut events: Vec<EventSummary> = state
            .events
            .values()
            .map(|event| EventSummary {
                attendee_count: state
                    .attendees
                    .iter()
                    .filter(|(event_id, _)| *event_id == event.id.get())
                    .count()
                    .try_into()
                    .unwrap_or(i64::MAX),
                event: event.clone(),
            })
            .collect();
        events.sort_by_key(|summary| {
            (
                summary.event.draft.starts_at.is_none(),
                summary.event.draft.starts_at,
                summary.event.id.get(),
            )
        });
        Ok(events)
    }

    async fn create(
        &self,
        draft: &EventDraft,
        created_by: UserId,
        now: DateTime<Utc>,
    ) -> Result<Event, EventRepositoryError> {
        let mut state = self.lock(EventRepositoryError::query)?;
        let event = Event {
            id: EventId::new(state.next_id()),
            draft: draft.clone(),
            created_by,
            created_at: now,
        };
        state.events.insert(event.id.get(), event.clone());
        Ok(event)
    }

    async fn join(
        &self,
        event: EventId,
        user: UserId,
        _now: DateTime<Utc>,
    ) -> Result<(), EventRepositoryError> {
        let mut state = self.lock(EventRepositoryError::query)?;
        if !state.events.contains_key(&event.get()) {
            return Err(EventRepositoryError::unknown_event(event.get()));
        }
        state.attendees.insert((event.get(), user));
        Ok(())
    }

    async fn leave(&self, event: EventId, user: UserId) -> Result<bool, EventRepositoryError> {
        let mut state = self.lock(EventRepositoryError::query)?;
        if !state.events.contains_key(&event.get()) {
            return Err(EventRepositoryError::unknown_event(event.get()));
        }
        Ok(state.attendees.remove(&(event.get(), user)))
    }
}

#[async_trait]
impl MemoryRepository for InMemoryStore {
    async fn list_recent(&self, limit: i64) -> Result<Vec<Memory>, MemoryRepositoryError> {
        let state = self.lock(MemoryRepositoryError::query)?;
        let mut memories: Vec<Memory> = state.memories.values().cloned().collect();
        memories.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.get().cmp(&a.id.get()))
        });
        memories.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(memories)
    }

    async fn create(
        &self,
        author: UserId,
        draft: &MemoryDraft,
        now: DateTime<Utc>,
    ) -> Result<Memory, MemoryRepositoryError> {
        let mut state = self.lock(MemoryRepositoryError::query)?;
        let memory = Memory {
            id: MemoryId::new(state.next_id()),
            author,
            draft: draft.clone(),
            created_at: now,
        };
        state.memories.insert(memory.id.get(), memory.clone());
        Ok(memory)
    }

    async fn find_by_id(&self, id: MemoryId) -> Result<Option<Memory>, MemoryRepositoryError> {
        let state = self.lock(MemoryRepositoryError::query)?;
        Ok(state.memories.get(&id.get()).cloned())
    }

    async fn delete(&self, id: MemoryId) -> Result<bool, MemoryRepositoryError> {
        let mut state = self.lock(MemoryRepositoryError::query)?;
        Ok(state.memories.remove(&id.get()).is_some())
    }
}

#[cfg(test)]
mod tests;
