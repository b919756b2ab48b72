//! Reunion event handlers.
//!
//! ```text
//! GET /api/v1/events
//! POST /api/v1/admin/events {"title":"Gala dinner","startsAt":"2025-12-20T19:00:00Z"}
//! POST /api/v1/events/{id}/attendance
//! DELETE /api/v1/events/{id}/attendance
//! ```

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, EventDraft, EventId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::EventBody;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_optional_rfc3339_timestamp};

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EventRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    /// RFC 3339 start time.
    #[serde(default)]
    #[schema(example = "2025-12-20T19:00:00Z")]
    pub starts_at: Option<String>,
}

impl TryFrom<EventRequest> for EventDraft {
    type Error = Error;

    fn try_from(value: EventRequest) -> Result<Self, Self::Error> {
        let starts_at =
            parse_optional_rfc3339_timestamp(value.starts_at, FieldName::new("startsAt"))?;
        Ok(Self {
            title: value.title,
            description: value.description.filter(|text| !text.trim().is_empty()),
            location: value.location.filter(|text| !text.trim().is_empty()),
            starts_at,
        })
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/events",
    responses(
        (status = 200, description = "Events with attendee counts", body = [EventBody]),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["events"],
    operation_id = "listEvents",
    security([])
)]
#[get("/events")]
pub async fn list_events(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<EventBody>>> {
    let events = state.events.list().await?;
    Ok(web::Json(events.into_iter().map(EventBody::from).collect()))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/events",
    request_body = EventRequest,
    responses(
        (status = 201, description = "Event created", body = EventBody),
        (status = 400, description = "Blank title or bad timestamp", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 403, description = "Admin role required", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["events"],
    operation_id = "createEvent"
)]
#[post("/admin/events")]
pub async fn create_event(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<EventRequest>,
) -> ApiResult<HttpResponse> {
    let claims = session.require_claims()?;
    let draft = EventDraft::try_from(payload.into_inner())?;
    let event = state.events.create(&claims, draft).await?;
    Ok(HttpResponse::Created().json(EventBody::from(event)))
}

/// Mark the caller as attending. Joining twice is a no-op.
#[utoipa::path(
    post,
    path = "/api/v1/events/{id}/attendance",
    params(("id" = i64, Path, description = "Event id")),
    responses(
        (status = 204, description = "Attending"),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 404, description = "Event not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["events"],
    operation_id = "joinEvent"
)]
#[post("/events/{id}/attendance")]
pub async fn join_event(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let claims = session.require_claims()?;
    state
        .events
        .join(&claims, EventId::new(path.into_inner()))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[utoipa::path(
    delete,
    path = "/api/v1/events/{id}/attendance",
    params(("id" = i64, Path, description = "Event id")),
    responses(
        (status = 204, description = "No longer attending"),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["events"],
    operation_id = "leaveEvent"
)]
#[delete("/events/{id}/attendance")]
pub async fn leave_event(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let claims = session.require_claims()?;
    state
        .events
        .leave(&claims, EventId::new(path.into_inner()))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
