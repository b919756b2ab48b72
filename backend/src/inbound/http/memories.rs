//! Memory wall handlers.
//!
//! ```text
//! GET /api/v1/memories
//! POST /api/v1/memories {"imageUrl":"https://img.example.com/1.jpg","caption":"2005 sports day"}
//! DELETE /api/v1/memories/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{MemoryDraft, MemoryId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::MemoryBody;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::memory_validation_error;

/// Photos are hosted elsewhere; only the URL is stored.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MemoryRequest {
    pub image_url: String,
    #[serde(default)]
    pub caption: Option<String>,
}

/// Newest memories first.
#[utoipa::path(
    get,
    path = "/api/v1/memories",
    responses(
        (status = 200, description = "Memory wall", body = [MemoryBody]),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["memories"],
    operation_id = "listMemories",
    security([])
)]
#[get("/memories")]
pub async fn list_memories(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<MemoryBody>>> {
    let memories = state.memories.list().await?;
    Ok(web::Json(memories.into_iter().map(MemoryBody::from).collect()))
}

#[utoipa::path(
    post,
    path = "/api/v1/memories",
    request_body = MemoryRequest,
    responses(
        (status = 201, description = "Memory posted", body = MemoryBody),
        (status = 400, description = "Invalid URL or caption", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["memories"],
    operation_id = "postMemory"
)]
#[post("/memories")]
pub async fn post_memory(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<MemoryRequest>,
) -> ApiResult<HttpResponse> {
    let claims = session.require_claims()?;
    let MemoryRequest { image_url, caption } = payload.into_inner();
    let draft =
        MemoryDraft::new(&image_url, caption.as_deref()).map_err(memory_validation_error)?;
    let memory = state.memories.post(&claims, draft).await?;
    Ok(HttpResponse::Created().json(MemoryBody::from(memory)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/memories/{id}",
    params(("id" = i64, Path, description = "Memory id")),
    responses(
        (status = 204, description = "Memory deleted"),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 403, description = "Not the author", body = ErrorSchema),
        (status = 404, description = "Memory not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["memories"],
    operation_id = "deleteMemory"
)]
#[delete("/memories/{id}")]
pub async fn delete_memory(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let claims = session.require_claims()?;
    state
        .memories
        .delete(&claims, MemoryId::new(path.into_inner()))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
