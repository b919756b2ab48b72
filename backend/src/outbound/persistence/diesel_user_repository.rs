//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{EmailAddress, Role, User, UserId};

use super::diesel_error_mapping::{DieselFailure, classify, is_email_constraint, pool_message};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::row_mapping::user_from_row;
use super::schema::users;

/// Diesel-backed implementation of the [`UserRepository`] port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    UserPersistenceError::connection(pool_message(error))
}

fn map_diesel_error(error: diesel::result::Error, email: Option<&EmailAddress>) -> UserPersistenceError {
    match classify(error) {
        DieselFailure::Connection(message) => UserPersistenceError::connection(message),
        DieselFailure::UniqueViolation { constraint }
            if is_email_constraint(constraint.as_deref()) =>
        {
            UserPersistenceError::duplicate_email(email.map(ToString::to_string).unwrap_or_default())
        }
        DieselFailure::UniqueViolation { .. } => UserPersistenceError::query("duplicate key"),
        DieselFailure::ForeignKeyViolation { .. } => {
            UserPersistenceError::query("foreign key violation")
        }
        DieselFailure::Query(message) => UserPersistenceError::query(message),
    }
}

fn query_error(error: diesel::result::Error) -> UserPersistenceError {
    map_diesel_error(error, None)
}

fn to_domain(row: UserRow) -> Result<User, UserPersistenceError> {
    user_from_row(row).map_err(UserPersistenceError::query)
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewUserRow {
            id: *user.id.as_uuid(),
            email: user.email.as_ref(),
            full_name: user.full_name.as_deref(),
            password_hash: user.password_hash.as_ref().map(|hash| hash.as_str()),
            role: user.role.as_str(),
            created_at: user.created_at,
        };
        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_diesel_error(err, Some(&user.email)))
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .filter(users::id.eq(id.as_uuid()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(query_error)?;
        row.map(to_domain).transpose()
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(query_error)?;
        row.map(to_domain).transpose()
    }

    async fn list_named(&self) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<UserRow> = users::table
            .filter(users::full_name.is_not_null())
            .order_by((users::created_at.asc(), users::id.asc()))
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(query_error)?;
        rows.into_iter().map(to_domain).collect()
    }

    async fn replace_role(
        &self,
        id: UserId,
        expected: Role,
        role: Role,
    ) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(
            users::table
                .filter(users::id.eq(id.as_uuid()))
                .filter(users::role.eq(expected.as_str())),
        )
        .set(users::role.eq(role.as_str()))
        .execute(&mut conn)
        .await
        .map_err(query_error)?;
        Ok(updated == 1)
    }
}
