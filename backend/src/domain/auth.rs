//! Authentication inputs: login credentials, registrations and identities
//! asserted by the trusted identity proxy.
//!
//! Constructors validate raw strings so handlers hand services nothing but
//! well-formed values.

use zeroize::Zeroizing;

use super::claim_token::{ClaimTokenValidationError, ClaimTokenValue};
use super::user::{EmailAddress, UserValidationError, normalise_full_name};

/// Minimum accepted password length, in characters.
pub const PASSWORD_MIN: usize = 8;

/// Validation failures for login payloads.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    #[error(transparent)]
    Email(#[from] UserValidationError),
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Validated login credentials.
///
/// The password keeps caller-provided whitespace and is zeroed on drop.
///
/// # Examples
/// ```
/// use backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("Ada@Example.com", "hunter22").unwrap();
/// assert_eq!(creds.email().as_ref(), "ada@example.com");
/// assert_eq!(creds.password(), "hunter22");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let email = EmailAddress::new(email)?;
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Normalised account email.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validation failures for registration payloads.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationValidationError {
    #[error(transparent)]
    User(#[from] UserValidationError),
    #[error("password must be at least {min} characters")]
    PasswordTooShort { min: usize },
    #[error(transparent)]
    ClaimToken(#[from] ClaimTokenValidationError),
}

impl RegistrationValidationError {
    /// Request field the failure refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::User(UserValidationError::FullNameTooLong { .. }) => "fullName",
            Self::User(_) => "email",
            Self::PasswordTooShort { .. } => "password",
            Self::ClaimToken(_) => "claimToken",
        }
    }
}

/// Validated sign-up request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    email: EmailAddress,
    password: Zeroizing<String>,
    full_name: Option<String>,
    claim_token: Option<ClaimTokenValue>,
}

impl Registration {
    /// Validate raw sign-up fields. A blank claim token counts as absent.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::{Registration, RegistrationValidationError};
    ///
    /// let err = Registration::try_from_parts("a@b.co", "short", None, None).unwrap_err();
    /// assert_eq!(err, RegistrationValidationError::PasswordTooShort { min: 8 });
    /// ```
    pub fn try_from_parts(
        email: &str,
        password: &str,
        full_name: Option<&str>,
        claim_token: Option<&str>,
    ) -> Result<Self, RegistrationValidationError> {
        let email = EmailAddress::new(email)?;
        if password.chars().count() < PASSWORD_MIN {
            return Err(RegistrationValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }
        let full_name = normalise_full_name(full_name)?;
        let claim_token = claim_token
            .filter(|raw| !raw.trim().is_empty())
            .map(ClaimTokenValue::new)
            .transpose()?;
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
            full_name,
            claim_token,
        })
    }

    /// Normalised account email.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Chosen password.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    /// Optional display name.
    pub fn full_name(&self) -> Option<&str> {
        self.full_name.as_deref()
    }

    /// Claim token presented with the registration, if any.
    pub fn claim_token(&self) -> Option<&ClaimTokenValue> {
        self.claim_token.as_ref()
    }
}

/// Identity asserted by the trusted identity proxy after an external sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalIdentity {
    pub email: EmailAddress,
    pub full_name: Option<String>,
    pub provider: String,
    pub subject: String,
}

impl ExternalIdentity {
    /// Validate the proxy's assertion.
    pub fn try_from_parts(
        email: &str,
        full_name: Option<&str>,
        provider: &str,
        subject: &str,
    ) -> Result<Self, UserValidationError> {
        Ok(Self {
            email: EmailAddress::new(email)?,
            full_name: normalise_full_name(full_name)?,
            provider: provider.trim().to_owned(),
            subject: subject.trim().to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw")]
    #[case("not-an-email", "pw")]
    fn login_rejects_bad_email(#[case] email: &str, #[case] password: &str) {
        let err = LoginCredentials::try_from_parts(email, password).expect_err("must fail");
        assert!(matches!(err, LoginValidationError::Email(_)));
    }

    #[rstest]
    fn login_rejects_empty_password() {
        let err = LoginCredentials::try_from_parts("a@b.co", "").expect_err("must fail");
        assert_eq!(err, LoginValidationError::EmptyPassword);
    }

    #[rstest]
    #[case("bad", "longenough", None, "email")]
    #[case("a@b.co", "1234567", None, "password")]
    #[case("a@b.co", "longenough", Some("   "), "ok")]
    fn registration_reports_offending_field(
        #[case] email: &str,
        #[case] password: &str,
        #[case] token: Option<&str>,
        #[case] expected: &str,
    ) {
        let outcome = Registration::try_from_parts(email, password, Some("Ada"), token);
        match outcome {
            Ok(registration) => {
                assert_eq!(expected, "ok");
                assert!(registration.claim_token().is_none());
            }
            Err(err) => assert_eq!(err.field(), expected),
        }
    }

    #[rstest]
    fn registration_keeps_token_and_trims_name() {
        let registration =
            Registration::try_from_parts("A@B.co", "longenough", Some(" Ada "), Some("tok"))
                .expect("valid registration");
        assert_eq!(registration.email().as_ref(), "a@b.co");
        assert_eq!(registration.full_name(), Some("Ada"));
        assert_eq!(registration.claim_token().map(ClaimTokenValue::as_str), Some("tok"));
    }

    #[rstest]
    fn registration_rejects_overlong_name() {
        let name = "n".repeat(crate::domain::user::FULL_NAME_MAX + 1);
        let err = Registration::try_from_parts("a@b.co", "longenough", Some(&name), None)
            .expect_err("must fail");
        assert_eq!(err.field(), "fullName");
    }
}
