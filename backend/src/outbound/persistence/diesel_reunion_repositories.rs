//! PostgreSQL-backed hotel, event and memory repositories.
//!
//! These three tables share the same simple CRUD shape, so their adapters
//! live together.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{
    EventRepository, EventRepositoryError, HotelRepository, HotelRepositoryError,
    MemoryRepository, MemoryRepositoryError,
};
use crate::domain::{
    Event, EventDraft, EventId, EventSummary, Hotel, HotelDraft, HotelId, HotelWithGuests,
    Memory, MemoryDraft, MemoryId, UserId,
};

use super::diesel_error_mapping::{DieselFailure, classify, pool_message};
use super::models::{EventRow, HotelRow, MemoryRow, NewAttendeeRow, NewEventRow, NewMemoryRow};
use super::pool::DbPool;
use super::row_mapping::{
    event_from_row, hotel_changeset, hotel_from_row, memory_from_row, new_hotel_row,
};
use super::schema::{alumni, event_attendees, events, hotels, memories};

macro_rules! basic_error_mapping {
    ($error:ident) => {
        |error: diesel::result::Error| match classify(error) {
            DieselFailure::Connection(message) => $error::connection(message),
            DieselFailure::UniqueViolation { .. } => $error::query("duplicate key"),
            DieselFailure::ForeignKeyViolation { .. } => $error::query("foreign key violation"),
            DieselFailure::Query(message) => $error::query(message),
        }
    };
}

/// Diesel-backed implementation of the [`HotelRepository`] port.
#[derive(Clone)]
pub struct DieselHotelRepository {
    pool: DbPool,
}

impl DieselHotelRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HotelRepository for DieselHotelRepository {
    async fn list_with_guest_counts(&self) -> Result<Vec<HotelWithGuests>, HotelRepositoryError> {
        let map_err = basic_error_mapping!(HotelRepositoryError);
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| HotelRepositoryError::connection(pool_message(err)))?;
        let rows: Vec<HotelRow> = hotels::table
            .order_by((hotels::name.asc(), hotels::id.asc()))
            .select(HotelRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_err)?;
        let counts: HashMap<i64, i64> = alumni::table
            .filter(alumni::hotel_id.is_not_null())
            .group_by(alumni::hotel_id)
            .select((alumni::hotel_id, count_star()))
            .load::<(Option<i64>, i64)>(&mut conn)
            .await
            .map_err(map_err)?
            .into_iter()
            .filter_map(|(hotel, count)| hotel.map(|id| (id, count)))
            .collect();
        Ok(rows
            .into_iter()
            .map(|row| {
                let guest_count = counts.get(&row.id).copied().unwrap_or(0);
                HotelWithGuests {
                    hotel: hotel_from_row(row),
                    guest_count,
                }
            })
            .collect())
    }

    async fn create(
        &self,
        draft: &HotelDraft,
        now: DateTime<Utc>,
    ) -> Result<Hotel, HotelRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| HotelRepositoryError::connection(pool_message(err)))?;
        let row: HotelRow = diesel::insert_into(hotels::table)
            .values(new_hotel_row(draft, now))
            .returning(HotelRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(basic_error_mapping!(HotelRepositoryError))?;
        Ok(hotel_from_row(row))
    }

    async fn update(
        &self,
        id: HotelId,
        draft: &HotelDraft,
    ) -> Result<Option<Hotel>, HotelRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| HotelRepositoryError::connection(pool_message(err)))?;
        let row: Option<HotelRow> = diesel::update(hotels::table.filter(hotels::id.eq(id.get())))
            .set(hotel_changeset(draft))
            .returning(HotelRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(basic_error_mapping!(HotelRepositoryError))?;
        Ok(row.map(hotel_from_row))
    }
}

/// Diesel-backed implementation of the [`EventRepository`] port.
#[derive(Clone)]
pub struct DieselEventRepository {
    pool: DbPool,
}

impl DieselEventRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_event_write_error(error: diesel::result::Error, event: EventId) -> EventRepositoryError {
    match classify(error) {
        DieselFailure::ForeignKeyViolation { constraint }
            if constraint.as_deref().is_none_or(|name| name.contains("event_id")) =>
        {
            EventRepositoryError::unknown_event(event.get())
        }
        DieselFailure::Connection(message) => EventRepositoryError::connection(message),
        DieselFailure::UniqueViolation { .. } => EventRepositoryError::query("duplicate key"),
        DieselFailure::ForeignKeyViolation { .. } => {
            EventRepositoryError::query("foreign key violation")
        }
        DieselFailure::Query(message) => EventRepositoryError::query(message),
    }
}

#[async_trait]
impl EventRepository for DieselEventRepository {
    async fn list_with_counts(&self) -> Result<Vec<EventSummary>, EventRepositoryError> {
        let map_err = basic_error_mapping!(EventRepositoryError);
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| EventRepositoryError::connection(pool_message(err)))?;
        let rows: Vec<EventRow> = events::table
            .order_by((events::starts_at.asc().nulls_last(), events::id.asc()))
            .select(EventRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_err)?;
        let counts: HashMap<i64, i64> = event_attendees::table
            .group_by(event_attendees::event_id)
            .select((event_attendees::event_id, count_star()))
            .load::<(i64, i64)>(&mut conn)
            .await
            .map_err(map_err)?
            .into_iter()
            .collect();
        Ok(rows
            .into_iter()
            .map(|row| {
                let attendee_count = counts.get(&row.id).copied().unwrap_or(0);
                EventSummary {
                    event: event_from_row(row),
                    attendee_count,
                }
            })
            .collect())
    }

    async fn create(
        &self,
        draft: &EventDraft,
        created_by: UserId,
        now: DateTime<Utc>,
    ) -> Result<Event, EventRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| EventRepositoryError::connection(pool_message(err)))?;
        let row: EventRow = diesel::insert_into(events::table)
            .values(NewEventRow {
                title: &draft.title,
                description: draft.description.as_deref(),
                location: draft.location.as_deref(),
                starts_at: draft.starts_at,
                created_by: *created_by.as_uuid(),
                created_at: now,
            })
            .returning(EventRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(basic_error_mapping!(EventRepositoryError))?;
        Ok(event_from_row(row))
    }

    async fn join(
        &self,
        event: EventId,
        user: UserId,
        now: DateTime<Utc>,
    ) -> Result<(), EventRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| EventRepositoryError::connection(pool_message(err)))?;
        diesel::insert_into(event_attendees::table)
            .values(NewAttendeeRow {
                event_id: event.get(),
                user_id: *user.as_uuid(),
                joined_at: now,
            })
            .on_conflict_do_nothing()
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_event_write_error(err, event))
    }

    async fn leave(&self, event: EventId, user: UserId) -> Result<bool, EventRepositoryError> {
        let map_err = basic_error_mapping!(EventRepositoryError);
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| EventRepositoryError::connection(pool_message(err)))?;
        let exists: Option<i64> = events::table
            .filter(events::id.eq(event.get()))
            .select(events::id)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_err)?;
        if exists.is_none() {
            return Err(EventRepositoryError::unknown_event(event.get()));
        }
        let removed = diesel::delete(
            event_attendees::table
                .filter(event_attendees::event_id.eq(event.get()))
                .filter(event_attendees::user_id.eq(user.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_err)?;
        Ok(removed > 0)
    }
}

/// Diesel-backed implementation of the [`MemoryRepository`] port.
#[derive(Clone)]
pub struct DieselMemoryRepository {
    pool: DbPool,
}

impl DieselMemoryRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MemoryRepository for DieselMemoryRepository {
    async fn list_recent(&self, limit: i64) -> Result<Vec<Memory>, MemoryRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| MemoryRepositoryError::connection(pool_message(err)))?;
        let rows: Vec<MemoryRow> = memories::table
            .order_by((memories::created_at.desc(), memories::id.desc()))
            .limit(limit)
            .select(MemoryRow::as_select())
            .load(&mut conn)
            .await
            .map_err(basic_error_mapping!(MemoryRepositoryError))?;
        Ok(rows.into_iter().map(memory_from_row).collect())
    }

    async fn create(
        &self,
        author: UserId,
        draft: &MemoryDraft,
        now: DateTime<Utc>,
    ) -> Result<Memory, MemoryRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| MemoryRepositoryError::connection(pool_message(err)))?;
        let row: MemoryRow = diesel::insert_into(memories::table)
            .values(NewMemoryRow {
                author_id: *author.as_uuid(),
                image_url: &draft.image_url,
                caption: draft.caption.as_deref(),
                created_at: now,
            })
            .returning(MemoryRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(basic_error_mapping!(MemoryRepositoryError))?;
        Ok(memory_from_row(row))
    }

    async fn find_by_id(&self, id: MemoryId) -> Result<Option<Memory>, MemoryRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| MemoryRepositoryError::connection(pool_message(err)))?;
        let row: Option<MemoryRow> = memories::table
            .filter(memories::id.eq(id.get()))
            .select(MemoryRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(basic_error_mapping!(MemoryRepositoryError))?;
        Ok(row.map(memory_from_row))
    }

    async fn delete(&self, id: MemoryId) -> Result<bool, MemoryRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| MemoryRepositoryError::connection(pool_message(err)))?;
        let removed = diesel::delete(memories::table.filter(memories::id.eq(id.get())))
            .execute(&mut conn)
            .await
            .map_err(basic_error_mapping!(MemoryRepositoryError))?;
        Ok(removed > 0)
    }
}
