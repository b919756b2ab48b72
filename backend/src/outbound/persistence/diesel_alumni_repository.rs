//! PostgreSQL-backed `AlumniRepository` implementation using Diesel ORM.
//!
//! Ownership changes are guarded in SQL: `save_if_owner` and
//! `link_if_unclaimed` filter on the current `owner_id`, so a concurrent
//! claim shows up as zero updated rows rather than a lost update.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::sql_types::Bool;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{AlumniRepository, AlumniRepositoryError};
use crate::domain::{
    AlumniId, AlumniProfile, DirectoryEntry, EmailAddress, RosterEntry, UnclaimedProfile, UserId,
};

use super::diesel_error_mapping::{DieselFailure, classify, is_email_constraint, pool_message};
use super::models::{AlumniRow, NewRosterRow};
use super::pool::{DbPool, PoolError};
use super::row_mapping::{profile_changeset, profile_from_row};
use super::schema::alumni;

/// Diesel-backed implementation of the [`AlumniRepository`] port.
#[derive(Clone)]
pub struct DieselAlumniRepository {
    pool: DbPool,
}

impl DieselAlumniRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> AlumniRepositoryError {
    AlumniRepositoryError::connection(pool_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> AlumniRepositoryError {
    map_write_error(error, None)
}

fn map_write_error(
    error: diesel::result::Error,
    profile: Option<&AlumniProfile>,
) -> AlumniRepositoryError {
    match (classify(error), profile) {
        (DieselFailure::Connection(message), _) => AlumniRepositoryError::connection(message),
        (DieselFailure::UniqueViolation { constraint }, Some(profile))
            if is_email_constraint(constraint.as_deref()) =>
        {
            AlumniRepositoryError::email_taken(profile.email.as_ref())
        }
        (DieselFailure::ForeignKeyViolation { constraint }, Some(profile))
            if constraint.as_deref().is_none_or(|name| name.contains("hotel")) =>
        {
            AlumniRepositoryError::unknown_hotel(profile.hotel_selection.map_or(0, |id| id.get()))
        }
        (DieselFailure::UniqueViolation { .. }, _) => AlumniRepositoryError::query("duplicate key"),
        (DieselFailure::ForeignKeyViolation { .. }, _) => {
            AlumniRepositoryError::query("foreign key violation")
        }
        (DieselFailure::Query(message), _) => AlumniRepositoryError::query(message),
    }
}

fn to_domain(row: AlumniRow) -> Result<AlumniProfile, AlumniRepositoryError> {
    profile_from_row(row).map_err(AlumniRepositoryError::query)
}

/// `ILIKE` pattern matching `fragment` anywhere, with wildcards escaped.
fn contains_pattern(fragment: &str) -> String {
    let escaped = fragment
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

type AlumniPredicate = Box<dyn BoxableExpression<alumni::table, Pg, SqlType = Bool>>;

impl DieselAlumniRepository {
    async fn first_matching(
        &self,
        predicate: AlumniPredicate,
    ) -> Result<Option<AlumniProfile>, AlumniRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<AlumniRow> = alumni::table
            .into_boxed()
            .filter(predicate)
            .order_by(alumni::id.asc())
            .select(AlumniRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(to_domain).transpose()
    }
}

#[async_trait]
impl AlumniRepository for DieselAlumniRepository {
    async fn find_by_id(&self, id: AlumniId) -> Result<Option<AlumniProfile>, AlumniRepositoryError> {
        self.first_matching(Box::new(alumni::id.eq(id.get()))).await
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<AlumniProfile>, AlumniRepositoryError> {
        self.first_matching(Box::new(alumni::email.eq(email.as_ref().to_owned())))
            .await
    }

    async fn find_by_owner(
        &self,
        owner: UserId,
    ) -> Result<Option<AlumniProfile>, AlumniRepositoryError> {
        self.first_matching(Box::new(alumni::owner_id.assume_not_null().eq(*owner.as_uuid())))
            .await
    }

    async fn search_unclaimed(
        &self,
        name_fragment: Option<String>,
        limit: i64,
    ) -> Result<Vec<UnclaimedProfile>, AlumniRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = alumni::table
            .filter(alumni::owner_id.is_null())
            .into_boxed();
        if let Some(fragment) = name_fragment {
            query = query.filter(alumni::full_name.ilike(contains_pattern(&fragment)));
        }
        let rows: Vec<AlumniRow> = query
            .order_by((alumni::full_name.asc(), alumni::id.asc()))
            .limit(limit)
            .select(AlumniRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter()
            .map(|row| to_domain(row).map(|profile| UnclaimedProfile::from(&profile)))
            .collect()
    }

    async fn list_directory(&self) -> Result<Vec<DirectoryEntry>, AlumniRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<AlumniRow> = alumni::table
            .order_by((alumni::full_name.asc(), alumni::id.asc()))
            .select(AlumniRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter()
            .map(|row| to_domain(row).map(|profile| DirectoryEntry::from(&profile)))
            .collect()
    }

    async fn save_if_owner(
        &self,
        expected_owner: Option<UserId>,
        profile: &AlumniProfile,
    ) -> Result<bool, AlumniRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = profile_changeset(profile);
        let target = alumni::table.filter(alumni::id.eq(profile.id.get()));
        let updated = match expected_owner {
            Some(owner) => {
                diesel::update(target.filter(alumni::owner_id.eq(*owner.as_uuid())))
                    .set(&changes)
                    .execute(&mut conn)
                    .await
            }
            None => {
                diesel::update(target.filter(alumni::owner_id.is_null()))
                    .set(&changes)
                    .execute(&mut conn)
                    .await
            }
        }
        .map_err(|err| map_write_error(err, Some(profile)))?;
        Ok(updated == 1)
    }

    async fn link_if_unclaimed(
        &self,
        id: AlumniId,
        owner: UserId,
        now: DateTime<Utc>,
    ) -> Result<bool, AlumniRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(
            alumni::table
                .filter(alumni::id.eq(id.get()))
                .filter(alumni::owner_id.is_null()),
        )
        .set((
            alumni::owner_id.eq(Some(*owner.as_uuid())),
            alumni::updated_at.eq(now),
        ))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(updated == 1)
    }

    async fn import_roster(
        &self,
        entries: &[RosterEntry],
        now: DateTime<Utc>,
    ) -> Result<usize, AlumniRepositoryError> {
        if entries.is_empty() {
            return Ok(0);
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<NewRosterRow<'_>> = entries
            .iter()
            .map(|entry| NewRosterRow {
                full_name: entry.full_name.trim(),
                email: entry.email.as_ref(),
                roll_number: entry.roll_number,
                city: entry.city.as_deref(),
                state: entry.state.as_deref(),
                country: entry.country.as_deref(),
                updated_at: now,
            })
            .collect();
        diesel::insert_into(alumni::table)
            .values(&rows)
            .on_conflict(alumni::email)
            .do_nothing()
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)
    }
}
