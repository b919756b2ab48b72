//! Shared classification of pool and Diesel failures.
//!
//! Each repository turns a [`DieselFailure`] into its own port error; only
//! the constraint-specific variants differ between tables.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Coarse outcome of a failed Diesel operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum DieselFailure {
    Connection(&'static str),
    UniqueViolation { constraint: Option<String> },
    ForeignKeyViolation { constraint: Option<String> },
    Query(&'static str),
}

/// Extract a readable message from a pool error.
pub(super) fn pool_message(error: PoolError) -> String {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    }
}

/// Classify a Diesel error and emit debug context.
pub(super) fn classify(error: DieselError) -> DieselFailure {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => DieselFailure::Query("record not found"),
        DieselError::QueryBuilderError(_) => DieselFailure::Query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            DieselFailure::Connection("database connection error")
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            DieselFailure::UniqueViolation {
                constraint: info.constraint_name().map(str::to_owned),
            }
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
            DieselFailure::ForeignKeyViolation {
                constraint: info.constraint_name().map(str::to_owned),
            }
        }
        _ => DieselFailure::Query("database error"),
    }
}

/// Whether a constraint name refers to an email uniqueness index.
pub(super) fn is_email_constraint(constraint: Option<&str>) -> bool {
    constraint.is_none_or(|name| name.contains("email"))
}
