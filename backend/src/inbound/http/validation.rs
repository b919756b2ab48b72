//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every helper produces an `invalid_request` error whose details carry the
//! offending `field` and a machine-readable `code`.

use chrono::{DateTime, Utc};
use serde_json::json;

use crate::domain::{
    Error, LoginValidationError, MemoryValidationError, RegistrationValidationError,
    UserValidationError,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidEmail,
    EmptyPassword,
    PasswordTooShort,
    TooLong,
    InvalidToken,
    InvalidUrl,
    InvalidTimestamp,
    InvalidValue,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidEmail => "invalid_email",
            ErrorCode::EmptyPassword => "empty_password",
            ErrorCode::PasswordTooShort => "password_too_short",
            ErrorCode::TooLong => "too_long",
            ErrorCode::InvalidToken => "invalid_token",
            ErrorCode::InvalidUrl => "invalid_url",
            ErrorCode::InvalidTimestamp => "invalid_timestamp",
            ErrorCode::InvalidValue => "invalid_value",
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

pub(crate) fn field_error(field: FieldName, code: ErrorCode, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let name = field.as_str();
    field_error(field, ErrorCode::MissingField, format!("missing required field: {name}"))
}

pub(crate) fn parse_optional_rfc3339_timestamp(
    value: Option<String>,
    field: FieldName,
) -> Result<Option<DateTime<Utc>>, Error> {
    value
        .filter(|raw| !raw.trim().is_empty())
        .map(|raw| {
            DateTime::parse_from_rfc3339(raw.trim())
                .map(|timestamp| timestamp.with_timezone(&Utc))
                .map_err(|_| {
                    let name = field.as_str();
                    Error::invalid_request(format!("{name} must be an RFC 3339 timestamp"))
                        .with_details(json!({
                            "field": name,
                            "value": raw,
                            "code": ErrorCode::InvalidTimestamp.as_str(),
                        }))
                })
        })
        .transpose()
}

fn user_error_code(err: &UserValidationError) -> ErrorCode {
    match err {
        UserValidationError::EmptyEmail => ErrorCode::MissingField,
        UserValidationError::EmailTooLong { .. } | UserValidationError::FullNameTooLong { .. } => {
            ErrorCode::TooLong
        }
        UserValidationError::InvalidEmail => ErrorCode::InvalidEmail,
        UserValidationError::InvalidId | UserValidationError::UnknownRole(_) => {
            ErrorCode::InvalidValue
        }
    }
}

pub(crate) fn user_validation_error(err: UserValidationError) -> Error {
    let field = match err {
        UserValidationError::FullNameTooLong { .. } => FieldName::new("fullName"),
        _ => FieldName::new("email"),
    };
    field_error(field, user_error_code(&err), err.to_string())
}

pub(crate) fn login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::Email(inner) => user_validation_error(inner),
        LoginValidationError::EmptyPassword => field_error(
            FieldName::new("password"),
            ErrorCode::EmptyPassword,
            err.to_string(),
        ),
    }
}

pub(crate) fn registration_validation_error(err: RegistrationValidationError) -> Error {
    let field = FieldName::new(err.field());
    match err {
        RegistrationValidationError::User(inner) => user_validation_error(inner),
        RegistrationValidationError::PasswordTooShort { .. } => {
            field_error(field, ErrorCode::PasswordTooShort, err.to_string())
        }
        RegistrationValidationError::ClaimToken(_) => {
            field_error(field, ErrorCode::InvalidToken, err.to_string())
        }
    }
}

pub(crate) fn memory_validation_error(err: MemoryValidationError) -> Error {
    match err {
        MemoryValidationError::InvalidImageUrl => field_error(
            FieldName::new("imageUrl"),
            ErrorCode::InvalidUrl,
            err.to_string(),
        ),
        MemoryValidationError::CaptionTooLong { .. } => {
            field_error(FieldName::new("caption"), ErrorCode::TooLong, err.to_string())
        }
    }
}
