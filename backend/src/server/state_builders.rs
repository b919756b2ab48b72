//! Builders wiring repositories and domain services into HTTP state.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};

use backend::domain::ports::{
    AlumniRepository, ClaimTokenRepository, EventRepository, HotelRepository, MemoryRepository,
    UserRepository,
};
use backend::domain::{
    AccountPorts, AccountService, ClaimPorts, ClaimService, DirectoryService, EventService,
    HotelService, MemoryService,
};
use backend::inbound::http::state::{HttpState, HttpStatePorts};
use backend::outbound::persistence::{
    DieselAlumniRepository, DieselClaimTokenRepository, DieselEventRepository,
    DieselHotelRepository, DieselMemoryRepository, DieselUserRepository,
};
use backend::outbound::security::{Argon2CredentialHasher, RandomClaimTokenGenerator};

use super::ServerConfig;
use super::config::Storage;

/// Driven ports for one storage backend.
#[derive(Clone)]
pub(crate) struct Repositories {
    pub(crate) users: Arc<dyn UserRepository>,
    pub(crate) alumni: Arc<dyn AlumniRepository>,
    pub(crate) tokens: Arc<dyn ClaimTokenRepository>,
    pub(crate) hotels: Arc<dyn HotelRepository>,
    pub(crate) events: Arc<dyn EventRepository>,
    pub(crate) memories: Arc<dyn MemoryRepository>,
}

impl Repositories {
    pub(crate) fn for_storage(storage: &Storage) -> Self {
        match storage {
            Storage::Postgres(pool) => Self {
                users: Arc::new(DieselUserRepository::new(pool.clone())),
                alumni: Arc::new(DieselAlumniRepository::new(pool.clone())),
                tokens: Arc::new(DieselClaimTokenRepository::new(pool.clone())),
                hotels: Arc::new(DieselHotelRepository::new(pool.clone())),
                events: Arc::new(DieselEventRepository::new(pool.clone())),
                memories: Arc::new(DieselMemoryRepository::new(pool.clone())),
            },
            Storage::Memory(store) => Self {
                users: store.clone(),
                alumni: store.clone(),
                tokens: store.clone(),
                hotels: store.clone(),
                events: store.clone(),
                memories: store.clone(),
            },
        }
    }
}

/// Wire every domain service over `repos` and wrap the result for Actix.
pub(crate) fn build_http_state(config: &ServerConfig, repos: Repositories) -> web::Data<HttpState> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let Repositories {
        users,
        alumni,
        tokens,
        hotels,
        events,
        memories,
    } = repos;

    let claims = Arc::new(ClaimService::new(
        ClaimPorts {
            users: users.clone(),
            alumni: alumni.clone(),
            tokens: tokens.clone(),
            generator: Arc::new(RandomClaimTokenGenerator),
            clock: clock.clone(),
        },
        config.claim_settings.clone(),
    ));
    let accounts = Arc::new(AccountService::new(AccountPorts {
        users,
        alumni: alumni.clone(),
        tokens,
        hasher: Arc::new(Argon2CredentialHasher),
        clock: clock.clone(),
    }));

    let state = HttpState::new(HttpStatePorts {
        claims: claims.clone(),
        claims_query: claims,
        accounts,
        directory: Arc::new(DirectoryService::new(alumni)),
        hotels: Arc::new(HotelService::new(hotels, clock.clone())),
        events: Arc::new(EventService::new(events, clock.clone())),
        memories: Arc::new(MemoryService::new(memories, clock)),
    })
    .with_identity_proxy_secret(config.identity_proxy_secret.clone());
    web::Data::new(state)
}
