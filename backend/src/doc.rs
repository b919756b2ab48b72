//! OpenAPI documentation for the REST API.
//!
//! Domain types stay free of utoipa; the document is built from the inbound
//! DTOs and the schema wrappers in [`crate::inbound::http::schemas`]. Swagger
//! UI serves it in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::admin::{IssueClaimTokenRequest, IssuedClaimTokenBody};
use crate::inbound::http::auth::{
    ExternalSignInRequest, LoginRequest, RegisterRequest, RegisteredBody,
};
use crate::inbound::http::claims::{
    ClaimLinkProfileBody, ClaimPreviewBody, ClaimRequest, LooseCount,
};
use crate::inbound::http::dto::{
    AlumniProfileBody, ClaimableProfileBody, DirectoryEntryBody, EventBody, HotelBody, MemoryBody,
    SessionBody, SuccessBody, UnclaimedProfileBody,
};
use crate::inbound::http::events::EventRequest;
use crate::inbound::http::hotels::HotelRequest;
use crate::inbound::http::memories::MemoryRequest;
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/auth/login or /api/v1/auth/register.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Reunion backend API",
        description = "Alumni directory, profile claims and reunion logistics."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::external_sign_in,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::current_session,
        crate::inbound::http::claims::claim_profile,
        crate::inbound::http::claims::preview_claim_link,
        crate::inbound::http::admin::issue_claim_token,
        crate::inbound::http::admin::list_claimable_profiles,
        crate::inbound::http::directory::search_unclaimed,
        crate::inbound::http::directory::list_alumni,
        crate::inbound::http::directory::own_profile,
        crate::inbound::http::directory::alumni_profile,
        crate::inbound::http::hotels::list_hotels,
        crate::inbound::http::hotels::create_hotel,
        crate::inbound::http::hotels::update_hotel,
        crate::inbound::http::events::list_events,
        crate::inbound::http::events::create_event,
        crate::inbound::http::events::join_event,
        crate::inbound::http::events::leave_event,
        crate::inbound::http::memories::list_memories,
        crate::inbound::http::memories::post_memory,
        crate::inbound::http::memories::delete_memory,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        RegisterRequest,
        RegisteredBody,
        LoginRequest,
        ExternalSignInRequest,
        SessionBody,
        ClaimRequest,
        LooseCount,
        ClaimPreviewBody,
        ClaimLinkProfileBody,
        IssueClaimTokenRequest,
        IssuedClaimTokenBody,
        ClaimableProfileBody,
        UnclaimedProfileBody,
        DirectoryEntryBody,
        AlumniProfileBody,
        HotelRequest,
        HotelBody,
        EventRequest,
        EventBody,
        MemoryRequest,
        MemoryBody,
        SuccessBody,
    )),
    tags(
        (name = "auth", description = "Accounts and sessions"),
        (name = "claims", description = "Linking accounts to directory profiles"),
        (name = "admin", description = "Organiser tools"),
        (name = "directory", description = "Alumni directory"),
        (name = "hotels", description = "Partner hotels"),
        (name = "events", description = "Reunion schedule"),
        (name = "memories", description = "Memory wall"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
