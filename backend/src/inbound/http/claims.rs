//! Profile claim handlers.
//!
//! ```text
//! POST /api/v1/claim {"alumniId":12,"city":"Pune","rsvpAdults":"2"}
//! GET /api/v1/claim/{token}
//! ```

use std::str::FromStr;

use actix_web::{get, post, web};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use crate::domain::claim_service::profile_validation_error;
use crate::domain::ports::{ClaimLinkStatus, ClaimPreview, DirectClaim};
use crate::domain::{
    AlumniId, Attendance, ClaimTokenValue, EmailAddress, Error, HotelId, ProfileUpdate,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::SuccessBody;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    ErrorCode, FieldName, field_error, missing_field_error, user_validation_error,
};

/// Counts arrive from HTML forms as strings and from scripts as numbers.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
#[serde(untagged)]
pub enum LooseCount {
    Number(i64),
    Text(String),
}

impl LooseCount {
    fn into_text(self) -> String {
        match self {
            Self::Number(value) => value.to_string(),
            Self::Text(value) => value,
        }
    }
}

/// Keep "absent" (`None`) apart from an explicit `null` (`Some(None)`).
fn explicit_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Direct claim body. Omitted fields keep their stored values; blank text
/// clears a field; `hotelSelectionId: null` clears the hotel choice.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ClaimRequest {
    #[serde(default)]
    pub alumni_id: Option<i64>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub roll_number: Option<LooseCount>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub whatsapp_number: Option<String>,
    #[serde(default)]
    pub linkedin_url: Option<String>,
    #[serde(default)]
    pub instagram_handle: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub memory_note: Option<String>,
    #[serde(default)]
    pub profession: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub specialization: Option<String>,
    #[serde(default)]
    pub profile_photo_url: Option<String>,
    #[serde(default)]
    pub then_photo_url: Option<String>,
    /// One of `attending`, `maybe` or `not_attending`.
    #[serde(default)]
    pub is_attending: Option<String>,
    #[serde(default)]
    pub rsvp_adults: Option<LooseCount>,
    #[serde(default)]
    pub rsvp_kids: Option<LooseCount>,
    #[serde(
        default,
        deserialize_with = "explicit_null",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<i64>, nullable)]
    pub hotel_selection_id: Option<Option<i64>>,
}

impl TryFrom<ClaimRequest> for DirectClaim {
    type Error = Error;

    fn try_from(value: ClaimRequest) -> Result<Self, Self::Error> {
        let alumni_id = value
            .alumni_id
            .map(AlumniId::new)
            .ok_or_else(|| missing_field_error(FieldName::new("alumniId")))?;
        let email = value
            .email
            .filter(|raw| !raw.trim().is_empty())
            .map(EmailAddress::new)
            .transpose()
            .map_err(user_validation_error)?;
        let attendance = value
            .is_attending
            .filter(|raw| !raw.trim().is_empty())
            .map(|raw| Attendance::from_str(&raw))
            .transpose()
            .map_err(profile_validation_error)?;
        let update = ProfileUpdate {
            full_name: value.full_name,
            email,
            roll_number: value.roll_number.map(LooseCount::into_text),
            phone_number: value.phone_number,
            whatsapp_number: value.whatsapp_number,
            linkedin_url: value.linkedin_url,
            instagram_handle: value.instagram_handle,
            country: value.country,
            state: value.state,
            city: value.city,
            latitude: value.latitude,
            longitude: value.longitude,
            bio: value.bio,
            memory_note: value.memory_note,
            profession: value.profession,
            company: value.company,
            specialization: value.specialization,
            profile_photo_url: value.profile_photo_url,
            then_photo_url: value.then_photo_url,
            attendance,
            rsvp_adults: value.rsvp_adults.map(LooseCount::into_text),
            rsvp_kids: value.rsvp_kids.map(LooseCount::into_text),
            hotel_selection: value
                .hotel_selection_id
                .map(|selection| selection.map(HotelId::new)),
        };
        Ok(Self { alumni_id, update })
    }
}

/// Claim a directory profile for the signed-in account and apply the
/// submitted profile fields.
#[utoipa::path(
    post,
    path = "/api/v1/claim",
    request_body = ClaimRequest,
    responses(
        (status = 200, description = "Profile claimed or updated", body = SuccessBody),
        (status = 400, description = "Missing alumniId or invalid field", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 404, description = "Profile not found", body = ErrorSchema),
        (status = 409, description = "Profile claimed by someone else", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["claims"],
    operation_id = "claimProfile"
)]
#[post("/claim")]
pub async fn claim_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ClaimRequest>,
) -> ApiResult<web::Json<SuccessBody>> {
    let claims = session.require_claims()?;
    let claim = DirectClaim::try_from(payload.into_inner())?;
    state.claims.claim_profile(claims.user_id, claim).await?;
    let refreshed = state.accounts.refresh(claims.user_id).await?;
    session.persist_claims(&refreshed)?;
    Ok(web::Json(SuccessBody::ok()))
}

/// Profile summary shown on a valid claim link.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClaimLinkProfileBody {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub roll_number: Option<i32>,
    pub city: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClaimPreviewBody {
    #[schema(value_type = String, example = "valid")]
    pub status: ClaimLinkStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<ClaimLinkProfileBody>,
}

impl From<ClaimPreview> for ClaimPreviewBody {
    fn from(preview: ClaimPreview) -> Self {
        Self {
            status: preview.status,
            profile: preview.profile.map(|profile| ClaimLinkProfileBody {
                id: profile.id.get(),
                full_name: profile.full_name,
                email: profile.email.to_string(),
                roll_number: profile.roll_number,
                city: profile.city,
            }),
        }
    }
}

/// Inspect a claim link without consuming it.
#[utoipa::path(
    get,
    path = "/api/v1/claim/{token}",
    params(("token" = String, Path, description = "Raw claim token")),
    responses(
        (status = 200, description = "Claim link status", body = ClaimPreviewBody),
        (status = 400, description = "Malformed token", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["claims"],
    operation_id = "previewClaimLink",
    security([])
)]
#[get("/claim/{token}")]
pub async fn preview_claim_link(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<ClaimPreviewBody>> {
    let token = ClaimTokenValue::new(path.into_inner()).map_err(|err| {
        field_error(FieldName::new("token"), ErrorCode::InvalidToken, err.to_string())
    })?;
    let preview = state.claims_query.preview(token).await?;
    Ok(web::Json(ClaimPreviewBody::from(preview)))
}
