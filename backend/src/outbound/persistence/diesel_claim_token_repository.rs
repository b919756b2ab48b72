//! PostgreSQL-backed `ClaimTokenRepository` implementation using Diesel ORM.
//!
//! Redemption runs in one transaction: the token row is consumed with a
//! conditional update first, so two registrations racing on the same token
//! serialise on that row and the loser sees zero updated rows.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, RunQueryDsl};

use crate::domain::ports::{ClaimTokenRepository, ClaimTokenRepositoryError, TokenRedemption};
use crate::domain::{AlumniId, ClaimToken, ClaimTokenHash, TokenStatus};

use super::diesel_error_mapping::{DieselFailure, classify, is_email_constraint, pool_message};
use super::models::{ClaimTokenRow, NewUserRow};
use super::pool::{DbPool, PoolError};
use super::row_mapping::{token_from_row, token_to_row};
use super::schema::{alumni, claim_tokens, users};

/// Diesel-backed implementation of the [`ClaimTokenRepository`] port.
#[derive(Clone)]
pub struct DieselClaimTokenRepository {
    pool: DbPool,
}

impl DieselClaimTokenRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Failure inside the redemption transaction. Domain outcomes roll the
/// transaction back just like database errors do.
#[derive(Debug)]
enum RedeemFailure {
    Database(diesel::result::Error),
    Rejected(ClaimTokenRepositoryError),
}

impl From<diesel::result::Error> for RedeemFailure {
    fn from(error: diesel::result::Error) -> Self {
        Self::Database(error)
    }
}

fn map_pool_error(error: PoolError) -> ClaimTokenRepositoryError {
    ClaimTokenRepositoryError::connection(pool_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> ClaimTokenRepositoryError {
    map_redeem_error(error, None)
}

fn map_redeem_error(
    error: diesel::result::Error,
    email: Option<&str>,
) -> ClaimTokenRepositoryError {
    match (classify(error), email) {
        (DieselFailure::Connection(message), _) => ClaimTokenRepositoryError::connection(message),
        (DieselFailure::UniqueViolation { constraint }, Some(email))
            if is_email_constraint(constraint.as_deref()) =>
        {
            ClaimTokenRepositoryError::email_taken(email)
        }
        (DieselFailure::UniqueViolation { .. }, _) => {
            ClaimTokenRepositoryError::query("duplicate key")
        }
        (DieselFailure::ForeignKeyViolation { .. }, _) => {
            ClaimTokenRepositoryError::query("foreign key violation")
        }
        (DieselFailure::Query(message), _) => ClaimTokenRepositoryError::query(message),
    }
}

/// Why a token row could not be consumed at `now`.
fn refusal(current: Option<ClaimTokenRow>, now: DateTime<Utc>) -> ClaimTokenRepositoryError {
    match current.map(|row| token_from_row(row).status_at(now)) {
        None => ClaimTokenRepositoryError::missing(),
        Some(TokenStatus::Expired) => ClaimTokenRepositoryError::expired(),
        Some(TokenStatus::Used | TokenStatus::Valid) => ClaimTokenRepositoryError::used(),
    }
}

#[async_trait]
impl ClaimTokenRepository for DieselClaimTokenRepository {
    async fn insert(
        &self,
        token: &ClaimToken,
        revoke_previous: bool,
    ) -> Result<(), ClaimTokenRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = token_to_row(token);
        conn.transaction(|conn| {
            async move {
                if revoke_previous {
                    diesel::update(
                        claim_tokens::table
                            .filter(claim_tokens::alumni_id.eq(row.alumni_id))
                            .filter(claim_tokens::used.eq(false)),
                    )
                    .set(claim_tokens::used.eq(true))
                    .execute(conn)
                    .await?;
                }
                diesel::insert_into(claim_tokens::table)
                    .values(&row)
                    .execute(conn)
                    .await?;
                Ok::<_, diesel::result::Error>(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn find_by_hash(
        &self,
        hash: &ClaimTokenHash,
    ) -> Result<Option<ClaimToken>, ClaimTokenRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ClaimTokenRow> = claim_tokens::table
            .filter(claim_tokens::token_hash.eq(hash.as_str()))
            .select(ClaimTokenRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(token_from_row))
    }

    async fn redeem(
        &self,
        redemption: &TokenRedemption,
    ) -> Result<AlumniId, ClaimTokenRepositoryError> {
        let TokenRedemption { hash, user, now } = redemption;
        let now = *now;
        let email = user.email.as_ref();
        let new_user = NewUserRow {
            id: *user.id.as_uuid(),
            email,
            full_name: user.full_name.as_deref(),
            password_hash: user.password_hash.as_ref().map(|hash| hash.as_str()),
            role: user.role.as_str(),
            created_at: user.created_at,
        };
        let owner = *user.id.as_uuid();
        let full_name = user.full_name.as_deref();

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let result = conn
            .transaction(|conn| {
                async move {
                    let consumed: Option<i64> = diesel::update(
                        claim_tokens::table
                            .filter(claim_tokens::token_hash.eq(hash.as_str()))
                            .filter(claim_tokens::used.eq(false))
                            .filter(claim_tokens::expires_at.gt(now)),
                    )
                    .set(claim_tokens::used.eq(true))
                    .returning(claim_tokens::alumni_id)
                    .get_result(conn)
                    .await
                    .optional()?;
                    let Some(alumni_id) = consumed else {
                        let current: Option<ClaimTokenRow> = claim_tokens::table
                            .filter(claim_tokens::token_hash.eq(hash.as_str()))
                            .select(ClaimTokenRow::as_select())
                            .first(conn)
                            .await
                            .optional()?;
                        return Err(RedeemFailure::Rejected(refusal(current, now)));
                    };

                    diesel::insert_into(users::table)
                        .values(&new_user)
                        .execute(conn)
                        .await?;

                    let unowned = alumni::table
                        .filter(alumni::id.eq(alumni_id))
                        .filter(alumni::owner_id.is_null());
                    let linked = match full_name {
                        Some(name) => {
                            diesel::update(unowned)
                                .set((
                                    alumni::owner_id.eq(Some(owner)),
                                    alumni::email.eq(email),
                                    alumni::full_name.eq(name),
                                    alumni::updated_at.eq(now),
                                ))
                                .execute(conn)
                                .await?
                        }
                        None => {
                            diesel::update(unowned)
                                .set((
                                    alumni::owner_id.eq(Some(owner)),
                                    alumni::email.eq(email),
                                    alumni::updated_at.eq(now),
                                ))
                                .execute(conn)
                                .await?
                        }
                    };
                    if linked != 1 {
                        return Err(RedeemFailure::Rejected(
                            ClaimTokenRepositoryError::profile_claimed(alumni_id),
                        ));
                    }
                    Ok(AlumniId::new(alumni_id))
                }
                .scope_boxed()
            })
            .await;

        result.map_err(|failure| match failure {
            RedeemFailure::Rejected(err) => err,
            RedeemFailure::Database(err) => map_redeem_error(err, Some(email)),
        })
    }
}
