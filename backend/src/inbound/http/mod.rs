//! HTTP inbound adapter exposing REST endpoints.

use actix_web::web;

pub mod admin;
pub mod auth;
pub mod claims;
pub mod directory;
pub mod dto;
pub mod error;
pub mod events;
pub mod health;
pub mod hotels;
pub mod memories;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

pub use error::ApiResult;

/// Register every `/api/v1` handler on `cfg`.
///
/// `/alumni/me` is registered ahead of `/alumni/{id}` so it never reaches
/// the id extractor.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(auth::register)
        .service(auth::login)
        .service(auth::external_sign_in)
        .service(auth::logout)
        .service(auth::current_session)
        .service(claims::claim_profile)
        .service(claims::preview_claim_link)
        .service(admin::issue_claim_token)
        .service(admin::list_claimable_profiles)
        .service(directory::search_unclaimed)
        .service(directory::list_alumni)
        .service(directory::own_profile)
        .service(directory::alumni_profile)
        .service(hotels::list_hotels)
        .service(hotels::create_hotel)
        .service(hotels::update_hotel)
        .service(events::list_events)
        .service(events::create_event)
        .service(events::join_event)
        .service(events::leave_event)
        .service(memories::list_memories)
        .service(memories::post_memory)
        .service(memories::delete_memory);
}
