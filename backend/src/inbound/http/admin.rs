//! Organiser-only claim token handlers.
//!
//! ```text
//! POST /api/v1/admin/claim-tokens {"alumniId":12}
//! GET /api/v1/admin/claim-tokens
//! ```

use actix_web::{HttpResponse, get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{AlumniId, IssuedClaimToken};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::ClaimableProfileBody;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, missing_field_error};

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct IssueClaimTokenRequest {
    #[serde(default)]
    pub alumni_id: Option<i64>,
}

/// Freshly minted token. The raw value is never retrievable again.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IssuedClaimTokenBody {
    pub token: String,
    pub claim_url: String,
    pub expires_at: DateTime<Utc>,
}

impl From<IssuedClaimToken> for IssuedClaimTokenBody {
    fn from(issued: IssuedClaimToken) -> Self {
        Self {
            token: issued.token.as_str().to_owned(),
            claim_url: issued.claim_url,
            expires_at: issued.expires_at,
        }
    }
}

/// Mint a claim link for an unclaimed profile.
#[utoipa::path(
    post,
    path = "/api/v1/admin/claim-tokens",
    request_body = IssueClaimTokenRequest,
    responses(
        (status = 201, description = "Token issued", body = IssuedClaimTokenBody),
        (status = 400, description = "Missing alumniId or profile already claimed", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 403, description = "Admin role required", body = ErrorSchema),
        (status = 404, description = "Profile not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "issueClaimToken"
)]
#[post("/admin/claim-tokens")]
pub async fn issue_claim_token(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<IssueClaimTokenRequest>,
) -> ApiResult<HttpResponse> {
    let claims = session.require_claims()?;
    let alumni_id = payload
        .alumni_id
        .map(AlumniId::new)
        .ok_or_else(|| missing_field_error(FieldName::new("alumniId")))?;
    let issued = state.claims.issue_token(&claims, alumni_id).await?;
    Ok(HttpResponse::Created().json(IssuedClaimTokenBody::from(issued)))
}

/// Profiles that can still receive a claim link.
#[utoipa::path(
    get,
    path = "/api/v1/admin/claim-tokens",
    responses(
        (status = 200, description = "Unclaimed profiles", body = [ClaimableProfileBody]),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 403, description = "Admin role required", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "listClaimableProfiles"
)]
#[get("/admin/claim-tokens")]
pub async fn list_claimable_profiles(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<ClaimableProfileBody>>> {
    let claims = session.require_claims()?;
    let profiles = state.claims_query.unclaimed_for_tokens(&claims).await?;
    Ok(web::Json(
        profiles.into_iter().map(ClaimableProfileBody::from).collect(),
    ))
}
