//! Account handlers: registration, password login, identity-proxy sign-in,
//! logout and the current session.
//!
//! ```text
//! POST /api/v1/auth/register {"email":"a@b.co","password":"…","claimToken":"…"}
//! POST /api/v1/auth/login {"email":"a@b.co","password":"…"}
//! POST /api/v1/auth/external {"email":"a@b.co","provider":"google","subject":"123"}
//! POST /api/v1/auth/logout
//! GET /api/v1/auth/session
//! ```

use actix_web::{HttpRequest, HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::warn;
use utoipa::ToSchema;

use crate::domain::{Error, ExternalIdentity, LoginCredentials, Registration, SessionClaims};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::SessionBody;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, login_validation_error, missing_field_error, registration_validation_error,
    user_validation_error,
};

/// Header the identity proxy uses to authenticate itself.
pub const IDENTITY_PROXY_SECRET_HEADER: &str = "x-identity-proxy-secret";

/// Registration body. A `claimToken` redeems a claim link in the same step.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub claim_token: Option<String>,
}

/// Registration outcome.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredBody {
    pub user_id: String,
    pub alumni_id: Option<i64>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Identity asserted by the trusted proxy.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ExternalSignInRequest {
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    pub provider: String,
    pub subject: String,
}

impl TryFrom<RegisterRequest> for Registration {
    type Error = Error;

    fn try_from(value: RegisterRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(
            &value.email,
            &value.password,
            value.full_name.as_deref(),
            value.claim_token.as_deref(),
        )
        .map_err(registration_validation_error)
    }
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = Error;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.password).map_err(login_validation_error)
    }
}

impl TryFrom<ExternalSignInRequest> for ExternalIdentity {
    type Error = Error;

    fn try_from(value: ExternalSignInRequest) -> Result<Self, Self::Error> {
        if value.provider.trim().is_empty() {
            return Err(missing_field_error(FieldName::new("provider")));
        }
        if value.subject.trim().is_empty() {
            return Err(missing_field_error(FieldName::new("subject")));
        }
        Self::try_from_parts(
            &value.email,
            value.full_name.as_deref(),
            &value.provider,
            &value.subject,
        )
        .map_err(user_validation_error)
    }
}

fn start_session(session: &SessionContext, claims: &SessionClaims) -> ApiResult<SessionBody> {
    session.persist_claims(claims)?;
    Ok(SessionBody::from(*claims))
}

/// Create an account, optionally redeeming a claim token.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = RegisteredBody,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Validation failure or unusable claim token", body = ErrorSchema),
        (status = 409, description = "Email already registered", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let registration = Registration::try_from(payload.into_inner())?;
    let claims = state.accounts.register(registration).await?;
    session.persist_claims(&claims)?;
    Ok(HttpResponse::Created().json(RegisteredBody {
        user_id: claims.user_id.to_string(),
        alumni_id: claims.alumni_id.map(|id| id.get()),
    }))
}

/// Authenticate with email and password.
///
/// Unknown accounts and wrong passwords produce the same `401`.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = SessionBody,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<SessionBody>> {
    let credentials = LoginCredentials::try_from(payload.into_inner())?;
    let claims = state.accounts.login(credentials).await?;
    start_session(&session, &claims).map(web::Json)
}

fn digests_match(presented: &str, expected: &str) -> bool {
    Sha256::digest(presented.as_bytes()) == Sha256::digest(expected.as_bytes())
}

/// Sign in with an identity vouched for by the identity proxy.
///
/// Responds `404` when no proxy secret is configured.
#[utoipa::path(
    post,
    path = "/api/v1/auth/external",
    request_body = ExternalSignInRequest,
    params(
        ("x-identity-proxy-secret" = String, Header, description = "Shared proxy secret")
    ),
    responses(
        (status = 200, description = "Signed in", body = SessionBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Proxy secret mismatch", body = ErrorSchema),
        (status = 404, description = "External sign-in disabled", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "externalSignIn",
    security([])
)]
#[post("/auth/external")]
pub async fn external_sign_in(
    state: web::Data<HttpState>,
    session: SessionContext,
    request: HttpRequest,
    payload: web::Json<ExternalSignInRequest>,
) -> ApiResult<web::Json<SessionBody>> {
    let Some(expected) = state.identity_proxy_secret() else {
        return Err(Error::not_found("not found"));
    };
    let presented = request
        .headers()
        .get(IDENTITY_PROXY_SECRET_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    if !digests_match(presented, expected) {
        warn!("identity proxy secret mismatch");
        return Err(Error::unauthorized("identity proxy not recognised"));
    }
    let identity = ExternalIdentity::try_from(payload.into_inner())?;
    let claims = state.accounts.sign_in_external(identity).await?;
    start_session(&session, &claims).map(web::Json)
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    responses((status = 204, description = "Session cleared")),
    tags = ["auth"],
    operation_id = "logout"
)]
#[post("/auth/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.clear();
    HttpResponse::NoContent().finish()
}

/// Report the caller's session claims.
#[utoipa::path(
    get,
    path = "/api/v1/auth/session",
    responses(
        (status = 200, description = "Current session", body = SessionBody),
        (status = 401, description = "Not signed in", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "currentSession"
)]
#[get("/auth/session")]
pub async fn current_session(session: SessionContext) -> ApiResult<web::Json<SessionBody>> {
    let claims = session.require_claims()?;
    Ok(web::Json(SessionBody::from(claims)))
}

#[cfg(test)]
mod tests;
