//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_http::Request;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpResponse, web};
use serde_json::Value;

use crate::domain::ports::{
    MockAccountCommand, MockClaimCommand, MockClaimQuery, MockDirectoryQuery, MockEventCalendar,
    MockHotelCatalogue, MockMemoryWall,
};
use crate::domain::{AlumniId, Error, Role, SessionClaims, UserId};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::{HttpState, HttpStatePorts};

pub(crate) const ADMIN_ID: &str = "11111111-1111-4111-8111-111111111111";
pub(crate) const MEMBER_ID: &str = "22222222-2222-4222-8222-222222222222";
pub(crate) const VISITOR_ID: &str = "33333333-3333-4333-8333-333333333333";

/// Build a session middleware configured for tests.
///
/// Generates a fresh key per invocation, names the cookie `session` and
/// disables the `Secure` flag for plain HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Extract the session cookie set by a response.
pub(crate) fn session_cookie<B>(response: &ServiceResponse<B>) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie set")
}

pub(crate) fn admin_claims() -> SessionClaims {
    SessionClaims {
        user_id: UserId::new(ADMIN_ID).expect("fixture id"),
        role: Role::Admin,
        alumni_id: None,
    }
}

pub(crate) fn member_claims() -> SessionClaims {
    SessionClaims {
        user_id: UserId::new(MEMBER_ID).expect("fixture id"),
        role: Role::Alumni,
        alumni_id: Some(AlumniId::new(7)),
    }
}

/// Route that signs the caller in with the given claims; mount it at
/// `/test/login` and call it before the handler under test.
pub(crate) fn login_route(claims: SessionClaims) -> actix_web::Route {
    web::post().to(move |session: SessionContext| async move {
        session.persist_claims(&claims)?;
        Ok::<_, Error>(HttpResponse::NoContent().finish())
    })
}

/// Parse a JSON response body.
pub(crate) async fn json_body(response: ServiceResponse) -> Value {
    let body = actix_web::test::read_body(response).await;
    serde_json::from_slice(&body).expect("JSON body")
}

pub(crate) fn visitor_claims() -> SessionClaims {
    SessionClaims {
        user_id: UserId::new(VISITOR_ID).expect("fixture id"),
        role: Role::Standard,
        alumni_id: None,
    }
}

/// Mocked driving ports; unconfigured mocks panic when called.
#[derive(Default)]
pub(crate) struct MockPorts {
    pub claims: MockClaimCommand,
    pub claims_query: MockClaimQuery,
    pub accounts: MockAccountCommand,
    pub directory: MockDirectoryQuery,
    pub hotels: MockHotelCatalogue,
    pub events: MockEventCalendar,
    pub memories: MockMemoryWall,
}

impl MockPorts {
    pub(crate) fn into_state(self) -> HttpState {
        HttpState::new(HttpStatePorts {
            claims: Arc::new(self.claims),
            claims_query: Arc::new(self.claims_query),
            accounts: Arc::new(self.accounts),
            directory: Arc::new(self.directory),
            hotels: Arc::new(self.hotels),
            events: Arc::new(self.events),
            memories: Arc::new(self.memories),
        })
    }
}

/// App with the handlers registered by `configure` under `/api/v1`, plus
/// `/test/login/{admin|member|visitor}` routes that sign the caller in.
pub(crate) fn test_app<F>(
    state: HttpState,
    configure: F,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    F: FnOnce(&mut web::ServiceConfig),
{
    App::new()
        .app_data(web::Data::new(state))
        .wrap(test_session_middleware())
        .route("/test/login/admin", login_route(admin_claims()))
        .route("/test/login/member", login_route(member_claims()))
        .route("/test/login/visitor", login_route(visitor_claims()))
        .service(web::scope("/api/v1").configure(configure))
}

/// Sign in through one of the `/test/login/*` routes and return the cookie.
pub(crate) async fn sign_in<S, B>(app: &S, who: &str) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
{
    let request = actix_web::test::TestRequest::post()
        .uri(&format!("/test/login/{who}"))
        .to_request();
    let response = actix_web::test::call_service(app, request).await;
    session_cookie(&response)
}
