//! Partner hotel handlers.
//!
//! ```text
//! GET /api/v1/hotels
//! POST /api/v1/admin/hotels {"name":"Lakeview Inn"}
//! PUT /api/v1/admin/hotels/{id} {"name":"Lakeview Inn","priceRange":"₹₹"}
//! ```

use actix_web::{HttpResponse, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{HotelDraft, HotelId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::HotelBody;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HotelRequest {
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub price_range: Option<String>,
    #[serde(default)]
    pub website_url: Option<String>,
    #[serde(default)]
    pub contact: Option<String>,
    #[serde(default)]
    pub distance_note: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_owned())
        .filter(|raw| !raw.is_empty())
}

impl From<HotelRequest> for HotelDraft {
    fn from(value: HotelRequest) -> Self {
        Self {
            name: value.name,
            address: non_blank(value.address),
            price_range: non_blank(value.price_range),
            website_url: non_blank(value.website_url),
            contact: non_blank(value.contact),
            distance_note: non_blank(value.distance_note),
        }
    }
}

/// Hotels with the number of guests who picked each.
#[utoipa::path(
    get,
    path = "/api/v1/hotels",
    responses(
        (status = 200, description = "Hotels", body = [HotelBody]),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["hotels"],
    operation_id = "listHotels",
    security([])
)]
#[get("/hotels")]
pub async fn list_hotels(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<HotelBody>>> {
    let hotels = state.hotels.list().await?;
    Ok(web::Json(hotels.into_iter().map(HotelBody::from).collect()))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/hotels",
    request_body = HotelRequest,
    responses(
        (status = 201, description = "Hotel created", body = HotelBody),
        (status = 400, description = "Blank name", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 403, description = "Admin role required", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["hotels"],
    operation_id = "createHotel"
)]
#[post("/admin/hotels")]
pub async fn create_hotel(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<HotelRequest>,
) -> ApiResult<HttpResponse> {
    let claims = session.require_claims()?;
    let hotel = state
        .hotels
        .create(&claims, HotelDraft::from(payload.into_inner()))
        .await?;
    Ok(HttpResponse::Created().json(HotelBody::from(hotel)))
}

#[utoipa::path(
    put,
    path = "/api/v1/admin/hotels/{id}",
    params(("id" = i64, Path, description = "Hotel id")),
    request_body = HotelRequest,
    responses(
        (status = 200, description = "Hotel updated", body = HotelBody),
        (status = 400, description = "Blank name", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 403, description = "Admin role required", body = ErrorSchema),
        (status = 404, description = "Hotel not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["hotels"],
    operation_id = "updateHotel"
)]
#[put("/admin/hotels/{id}")]
pub async fn update_hotel(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
    payload: web::Json<HotelRequest>,
) -> ApiResult<web::Json<HotelBody>> {
    let claims = session.require_claims()?;
    let hotel = state
        .hotels
        .update(
            &claims,
            HotelId::new(path.into_inner()),
            HotelDraft::from(payload.into_inner()),
        )
        .await?;
    Ok(web::Json(HotelBody::from(hotel)))
}
