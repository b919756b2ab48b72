//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::{ServerConfig, Storage};

pub(crate) use state_builders::Repositories;
use state_builders::build_http_state;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use backend::Trace;
#[cfg(debug_assertions)]
use backend::doc::ApiDoc;
use backend::inbound::http::configure_api;
use backend::inbound::http::health::{HealthState, live, ready};
use backend::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        key,
        cookie_secure,
        same_site,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(
            PersistentSession::default().session_ttl(actix_web::cookie::time::Duration::hours(2)),
        )
        .build();

    let api = web::scope("/api/v1").wrap(session).configure(configure_api);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails, or when the
/// `metrics` feature is enabled without Prometheus middleware configured.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = build_http_state(&config, Repositories::for_storage(&config.storage));
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        storage: _,
        claim_settings: _,
        identity_proxy_secret: _,
        #[cfg(feature = "metrics")]
        prometheus,
    } = config;

    #[cfg(feature = "metrics")]
    let prometheus = prometheus.ok_or_else(|| {
        std::io::Error::other("metrics feature enabled but no Prometheus middleware configured")
    })?;

    let server = HttpServer::new(move || {
        let app = build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
        });

        #[cfg(feature = "metrics")]
        let app = app.wrap(prometheus.clone());

        app
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use rstest::rstest;

    fn dependencies() -> AppDependencies {
        let config = ServerConfig::new(
            Key::generate(),
            false,
            SameSite::Lax,
            ([127, 0, 0, 1], 0).into(),
            backend::settings::AppSettings::default()
                .claim_settings()
                .expect("default claim settings"),
        );
        let http_state = build_http_state(&config, Repositories::for_storage(&config.storage));
        AppDependencies {
            health_state: web::Data::new(HealthState::new()),
            http_state,
            key: config.key,
            cookie_secure: config.cookie_secure,
            same_site: config.same_site,
        }
    }

    #[rstest]
    #[actix_web::test]
    async fn public_routes_are_mounted_under_api_prefix() {
        let app = test::init_service(build_app(dependencies())).await;

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/v1/hotels").to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
    }

    #[rstest]
    #[actix_web::test]
    async fn liveness_probe_is_outside_api_scope() {
        let app = test::init_service(build_app(dependencies())).await;

        let res =
            test::call_service(&app, test::TestRequest::get().uri("/health/live").to_request())
                .await;

        assert_eq!(res.status(), StatusCode::OK);
    }

    #[rstest]
    #[actix_web::test]
    async fn responses_carry_trace_id() {
        let app = test::init_service(build_app(dependencies())).await;

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/v1/events").to_request(),
        )
        .await;

        assert!(res.headers().contains_key(backend::domain::TRACE_ID_HEADER));
    }
}
