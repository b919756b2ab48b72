//! In-process harness for end-to-end HTTP tests.
//!
//! Integration tests compile as separate crates under `backend/tests/`, so the
//! app is assembled here from library pieces: real domain services over the
//! in-memory store, a fixed clock and deterministic claim tokens.

use std::sync::Arc;

use actix_http::Request;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{App, test, web};
use backend::Trace;
use backend::domain::ports::{CredentialHasher, UserRepository};
use backend::domain::{
    AccountPorts, AccountService, ClaimPorts, ClaimService, ClaimSettings, DirectoryService,
    EventService, HotelService, MemoryService, NameMatchPolicy, Role,
};
use backend::inbound::http::configure_api;
use backend::inbound::http::state::{HttpState, HttpStatePorts};
use backend::outbound::memory::InMemoryStore;
use backend::test_support::{MutableClock, PlainCredentialHasher, SequenceTokenGenerator, user};
use chrono::TimeDelta;
use mockable::Clock;
use serde_json::Value;

pub const ADMIN_EMAIL: &str = "organiser@reunion.example";
pub const ADMIN_PASSWORD: &str = "organiser-pass";
pub const PUBLIC_BASE_URL: &str = "https://reunion.example";

/// Shared store and clock behind one app instance.
pub struct Harness {
    pub store: Arc<InMemoryStore>,
    pub clock: Arc<MutableClock>,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            store: Arc::new(InMemoryStore::new()),
            clock: Arc::new(MutableClock::default()),
        }
    }

    /// Insert an admin account that can log in with [`ADMIN_PASSWORD`].
    pub async fn seed_admin(&self) {
        let mut admin = user(ADMIN_EMAIL, Some("Reunion Organiser"), Role::Admin);
        admin.password_hash = Some(
            PlainCredentialHasher
                .hash(ADMIN_PASSWORD)
                .expect("plain hash"),
        );
        self.store.insert(&admin).await.expect("seed admin");
    }

    pub fn state(&self) -> web::Data<HttpState> {
        let clock: Arc<dyn Clock> = self.clock.clone();
        let claims = Arc::new(ClaimService::new(
            ClaimPorts {
                users: self.store.clone(),
                alumni: self.store.clone(),
                tokens: self.store.clone(),
                generator: Arc::new(SequenceTokenGenerator::default()),
                clock: clock.clone(),
            },
            ClaimSettings {
                token_ttl: TimeDelta::days(7),
                public_base_url: PUBLIC_BASE_URL.to_owned(),
                revoke_previous: false,
                name_match: NameMatchPolicy::FirstMatch,
            },
        ));
        let accounts = Arc::new(AccountService::new(AccountPorts {
            users: self.store.clone(),
            alumni: self.store.clone(),
            tokens: self.store.clone(),
            hasher: Arc::new(PlainCredentialHasher),
            clock: clock.clone(),
        }));
        web::Data::new(HttpState::new(HttpStatePorts {
            claims: claims.clone(),
            claims_query: claims,
            accounts,
            directory: Arc::new(DirectoryService::new(self.store.clone())),
            hotels: Arc::new(HotelService::new(self.store.clone(), clock.clone())),
            events: Arc::new(EventService::new(self.store.clone(), clock.clone())),
            memories: Arc::new(MemoryService::new(self.store.clone(), clock)),
        }))
    }

    pub async fn app(
        &self,
    ) -> impl Service<Request, Response = ServiceResponse, Error = actix_web::Error> {
        let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
            .cookie_name("session".to_owned())
            .cookie_secure(false)
            .build();
        test::init_service(
            App::new()
                .app_data(self.state())
                .wrap(Trace)
                .service(web::scope("/api/v1").wrap(session).configure(configure_api)),
        )
        .await
    }
}

/// Outcome of one request: status, body and any refreshed session cookie.
pub struct Reply {
    pub status: u16,
    pub body: Value,
    pub cookie: Option<Cookie<'static>>,
}

pub async fn send<S>(app: &S, request: test::TestRequest, cookie: Option<&Cookie<'static>>) -> Reply
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let request = match cookie {
        Some(cookie) => request.cookie(cookie.clone()),
        None => request,
    };
    let res = test::call_service(app, request.to_request()).await;
    let status = res.status().as_u16();
    let cookie = res
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned);
    let bytes = test::read_body(res).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("JSON body")
    };
    Reply {
        status,
        body,
        cookie,
    }
}

pub async fn post_json<S>(
    app: &S,
    uri: &str,
    payload: Value,
    cookie: Option<&Cookie<'static>>,
) -> Reply
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    send(
        app,
        test::TestRequest::post().uri(uri).set_json(payload),
        cookie,
    )
    .await
}

pub async fn get<S>(app: &S, uri: &str, cookie: Option<&Cookie<'static>>) -> Reply
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    send(app, test::TestRequest::get().uri(uri), cookie).await
}

/// Log in with a password and return the session cookie.
pub async fn login<S>(app: &S, email: &str, password: &str) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let reply = post_json(
        app,
        "/api/v1/auth/login",
        serde_json::json!({ "email": email, "password": password }),
        None,
    )
    .await;
    assert_eq!(reply.status, 200, "login failed: {}", reply.body);
    reply.cookie.expect("login sets a session cookie")
}
