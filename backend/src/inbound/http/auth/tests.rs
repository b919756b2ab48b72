//! Handler tests for account endpoints.

use super::*;
use crate::domain::{AlumniId, Role, UserId};
use crate::inbound::http::test_utils::{
    MEMBER_ID, MockPorts, json_body, member_claims, session_cookie, sign_in, test_app,
    visitor_claims,
};
use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::json;

const PROXY_SECRET: &str = "proxy-secret";

fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(register)
        .service(login)
        .service(external_sign_in)
        .service(logout)
        .service(current_session);
}

#[rstest]
#[actix_web::test]
async fn register_sets_cookie_and_reports_linked_profile() {
    let mut ports = MockPorts::default();
    ports
        .accounts
        .expect_register()
        .withf(|registration| {
            registration.email().as_ref() == "bhavik@example.com"
                && registration.claim_token().map(|token| token.as_str()) == Some("token-1")
        })
        .times(1)
        .return_once(|_| Ok(member_claims()));
    let app = actix_test::init_service(test_app(ports.into_state(), routes)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/auth/register")
            .set_json(json!({
                "email": "Bhavik@Example.com",
                "password": "correct horse",
                "claimToken": "token-1"
            }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::CREATED);
    let cookie = session_cookie(&res);
    assert!(!cookie.value().is_empty());
    let body = json_body(res).await;
    assert_eq!(body, json!({"userId": MEMBER_ID, "alumniId": 7}));
}

#[rstest]
#[actix_web::test]
async fn short_password_is_rejected_before_the_service() {
    let app = actix_test::init_service(test_app(MockPorts::default().into_state(), routes)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/auth/register")
            .set_json(json!({"email": "a@example.com", "password": "short"}))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = json_body(res).await;
    assert_eq!(body["details"]["field"], "password");
    assert_eq!(body["details"]["code"], "password_too_short");
}

#[rstest]
#[actix_web::test]
async fn login_returns_claims_and_session() {
    let mut ports = MockPorts::default();
    ports
        .accounts
        .expect_login()
        .withf(|credentials| credentials.password() == "correct horse")
        .times(1)
        .return_once(|_| Ok(visitor_claims()));
    let app = actix_test::init_service(test_app(ports.into_state(), routes)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(json!({"email": "guest@example.com", "password": "correct horse"}))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let cookie = session_cookie(&res);
    let body = json_body(res).await;
    assert_eq!(body["role"], "standard");
    assert_eq!(body["alumniId"], serde_json::Value::Null);

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/auth/session")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[rstest]
#[actix_web::test]
async fn failed_login_is_unauthorised() {
    let mut ports = MockPorts::default();
    ports
        .accounts
        .expect_login()
        .return_once(|_| Err(Error::unauthorized("invalid email or password")));
    let app = actix_test::init_service(test_app(ports.into_state(), routes)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(json!({"email": "guest@example.com", "password": "wrong"}))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

fn external_request(secret: Option<&str>) -> actix_test::TestRequest {
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/auth/external")
        .set_json(json!({
            "email": "bhavik@example.com",
            "fullName": "Bhavik Parmar",
            "provider": "google",
            "subject": "1234"
        }));
    match secret {
        Some(value) => request.insert_header((IDENTITY_PROXY_SECRET_HEADER, value)),
        None => request,
    }
}

#[rstest]
#[actix_web::test]
async fn external_sign_in_is_hidden_without_a_secret() {
    let app = actix_test::init_service(test_app(MockPorts::default().into_state(), routes)).await;

    let res = actix_test::call_service(&app, external_request(Some(PROXY_SECRET)).to_request()).await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[rstest]
#[case::missing(None)]
#[case::wrong(Some("guess"))]
#[actix_web::test]
async fn external_sign_in_rejects_unknown_proxies(#[case] secret: Option<&'static str>) {
    let state = MockPorts::default()
        .into_state()
        .with_identity_proxy_secret(Some(PROXY_SECRET.to_owned()));
    let app = actix_test::init_service(test_app(state, routes)).await;

    let res = actix_test::call_service(&app, external_request(secret).to_request()).await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[actix_web::test]
async fn external_sign_in_provisions_through_the_service() {
    let mut ports = MockPorts::default();
    ports
        .accounts
        .expect_sign_in_external()
        .withf(|identity| identity.provider == "google" && identity.subject == "1234")
        .times(1)
        .return_once(|_| {
            Ok(SessionClaims {
                user_id: UserId::new(MEMBER_ID).expect("fixture id"),
                role: Role::Alumni,
                alumni_id: Some(AlumniId::new(3)),
            })
        });
    let state = ports
        .into_state()
        .with_identity_proxy_secret(Some(PROXY_SECRET.to_owned()));
    let app = actix_test::init_service(test_app(state, routes)).await;

    let res = actix_test::call_service(&app, external_request(Some(PROXY_SECRET)).to_request()).await;

    assert_eq!(res.status(), StatusCode::OK);
    let body = json_body(res).await;
    assert_eq!(body["alumniId"], 3);
    assert_eq!(body["role"], "alumni");
}

#[rstest]
fn blank_provider_is_a_missing_field() {
    let err = ExternalIdentity::try_from(ExternalSignInRequest {
        email: "bhavik@example.com".into(),
        full_name: None,
        provider: " ".into(),
        subject: "1234".into(),
    })
    .expect_err("blank provider");
    assert_eq!(err.details().and_then(|d| d.get("field")), Some(&json!("provider")));
}

#[rstest]
#[actix_web::test]
async fn session_endpoint_reflects_sign_in_and_logout() {
    let app = actix_test::init_service(test_app(MockPorts::default().into_state(), routes)).await;
    let cookie = sign_in(&app, "member").await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/auth/session")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = json_body(res).await;
    assert_eq!(body, json!({"userId": MEMBER_ID, "role": "alumni", "alumniId": 7}));

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/auth/logout")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    let cleared = session_cookie(&res);

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/auth/session")
            .cookie(cleared)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}
