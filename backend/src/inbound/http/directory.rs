//! Alumni directory handlers.
//!
//! ```text
//! GET /api/v1/alumni/unclaimed?search=bha
//! GET /api/v1/alumni
//! GET /api/v1/alumni/me
//! GET /api/v1/alumni/{id}
//! ```

use actix_web::{get, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::AlumniId;
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{AlumniProfileBody, DirectoryEntryBody, UnclaimedProfileBody};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UnclaimedSearchQuery {
    /// Case-insensitive fragment of the full name.
    pub search: Option<String>,
}

/// Public search over profiles nobody has claimed yet.
#[utoipa::path(
    get,
    path = "/api/v1/alumni/unclaimed",
    params(UnclaimedSearchQuery),
    responses(
        (status = 200, description = "Matching unclaimed profiles", body = [UnclaimedProfileBody]),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["directory"],
    operation_id = "searchUnclaimed",
    security([])
)]
#[get("/alumni/unclaimed")]
pub async fn search_unclaimed(
    state: web::Data<HttpState>,
    query: web::Query<UnclaimedSearchQuery>,
) -> ApiResult<web::Json<Vec<UnclaimedProfileBody>>> {
    let hits = state
        .directory
        .search_unclaimed(query.into_inner().search)
        .await?;
    Ok(web::Json(hits.into_iter().map(UnclaimedProfileBody::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/v1/alumni",
    responses(
        (status = 200, description = "Directory with map data", body = [DirectoryEntryBody]),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["directory"],
    operation_id = "listAlumni"
)]
#[get("/alumni")]
pub async fn list_alumni(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<DirectoryEntryBody>>> {
    let claims = session.require_claims()?;
    let entries = state.directory.list(&claims).await?;
    Ok(web::Json(entries.into_iter().map(DirectoryEntryBody::from).collect()))
}

/// The caller's own linked profile.
#[utoipa::path(
    get,
    path = "/api/v1/alumni/me",
    responses(
        (status = 200, description = "Linked profile", body = AlumniProfileBody),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 404, description = "No profile linked", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["directory"],
    operation_id = "ownProfile"
)]
#[get("/alumni/me")]
pub async fn own_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<AlumniProfileBody>> {
    let claims = session.require_claims()?;
    let profile = state.directory.own_profile(&claims).await?;
    Ok(web::Json(AlumniProfileBody::from(profile)))
}

/// Member detail page. Only linked alumni and admins may look.
#[utoipa::path(
    get,
    path = "/api/v1/alumni/{id}",
    params(("id" = i64, Path, description = "Alumni profile id")),
    responses(
        (status = 200, description = "Profile detail", body = AlumniProfileBody),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 403, description = "No linked profile", body = ErrorSchema),
        (status = 404, description = "Profile not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["directory"],
    operation_id = "alumniProfile"
)]
#[get("/alumni/{id}")]
pub async fn alumni_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<web::Json<AlumniProfileBody>> {
    let claims = session.require_claims()?;
    let profile = state
        .directory
        .profile(&claims, AlumniId::new(path.into_inner()))
        .await?;
    Ok(web::Json(AlumniProfileBody::from(profile)))
}
