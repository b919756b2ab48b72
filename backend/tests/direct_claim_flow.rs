//! End-to-end direct claims and the public unclaimed search.

#[allow(dead_code)]
mod support;

use backend::test_support::profile;
use rstest::rstest;
use serde_json::{Value, json};
use support::{Harness, get, post_json};

fn seeded() -> Harness {
    let harness = Harness::new();
    for (id, name, email) in [
        (12, "Bhavik Parmar", "bhavik@roster.example"),
        (13, "Bhavna Iyer", "bhavna@roster.example"),
        (14, "Anita Rao", "anita@roster.example"),
    ] {
        harness
            .store
            .put_profile(profile(id, name, email))
            .expect("seed profile");
    }
    harness
}

fn names(body: &Value) -> Vec<&str> {
    body.as_array()
        .expect("array body")
        .iter()
        .filter_map(|hit| hit["fullName"].as_str())
        .collect()
}

#[rstest]
#[actix_web::test]
async fn visitor_claims_a_profile_and_becomes_alumni() {
    let harness = seeded();
    let app = harness.app().await;
    let registered = post_json(
        &app,
        "/api/v1/auth/register",
        json!({ "email": "bhavik.p@mail.example", "password": "reunion-2025", "fullName": "Bhavik P" }),
        None,
    )
    .await;
    assert_eq!(registered.status, 201, "{}", registered.body);
    assert_eq!(registered.body["alumniId"], Value::Null);
    let visitor = registered.cookie.expect("session");

    let claimed = post_json(
        &app,
        "/api/v1/claim",
        json!({
            "alumniId": 12,
            "email": "bhavik.p@mail.example",
            "city": "Pune",
            "isAttending": "yes",
            "rsvpAdults": "2",
            "rsvpKids": 1
        }),
        Some(&visitor),
    )
    .await;
    assert_eq!(claimed.status, 200, "{}", claimed.body);
    let member = claimed.cookie.unwrap_or(visitor);

    let session = get(&app, "/api/v1/auth/session", Some(&member)).await;
    assert_eq!(session.body["role"], "alumni");
    assert_eq!(session.body["alumniId"], 12);

    let own = get(&app, "/api/v1/alumni/me", Some(&member)).await;
    assert_eq!(own.body["email"], "bhavik.p@mail.example");
    assert_eq!(own.body["city"], "Pune");
    assert_eq!(own.body["isAttending"], "attending");
    assert_eq!(own.body["rsvpAdults"], 2);
    assert_eq!(own.body["rsvpKids"], 1);
}

#[rstest]
#[actix_web::test]
async fn second_claimant_gets_a_conflict() {
    let harness = seeded();
    let app = harness.app().await;
    let first = post_json(
        &app,
        "/api/v1/auth/register",
        json!({ "email": "first@mail.example", "password": "reunion-2025" }),
        None,
    )
    .await
    .cookie
    .expect("session");
    let second = post_json(
        &app,
        "/api/v1/auth/register",
        json!({ "email": "second@mail.example", "password": "reunion-2025" }),
        None,
    )
    .await
    .cookie
    .expect("session");

    let won = post_json(
        &app,
        "/api/v1/claim",
        json!({ "alumniId": 13, "email": "first@mail.example" }),
        Some(&first),
    )
    .await;
    assert_eq!(won.status, 200, "{}", won.body);

    let lost = post_json(
        &app,
        "/api/v1/claim",
        json!({ "alumniId": 13, "email": "second@mail.example" }),
        Some(&second),
    )
    .await;
    assert_eq!(lost.status, 409);
    assert_eq!(lost.body["code"], "conflict");
    assert_eq!(lost.body["details"]["code"], "already_claimed");
    assert!(lost.body["traceId"].is_string());
}

#[rstest]
#[actix_web::test]
async fn registering_with_a_roster_email_links_the_profile() {
    let harness = seeded();
    let app = harness.app().await;

    let registered = post_json(
        &app,
        "/api/v1/auth/register",
        json!({ "email": "Anita@Roster.example", "password": "reunion-2025" }),
        None,
    )
    .await;

    assert_eq!(registered.status, 201, "{}", registered.body);
    assert_eq!(registered.body["alumniId"], 14);
}

#[rstest]
#[case("bha", vec!["Bhavik Parmar", "Bhavna Iyer"])]
#[case("BHAVIK", vec!["Bhavik Parmar"])]
#[case("zzz", vec![])]
#[actix_web::test]
async fn public_search_matches_name_fragments(#[case] fragment: &str, #[case] expected: Vec<&str>) {
    let harness = seeded();
    let app = harness.app().await;

    let reply = get(&app, &format!("/api/v1/alumni/unclaimed?search={fragment}"), None).await;

    assert_eq!(reply.status, 200);
    let mut found = names(&reply.body);
    found.sort_unstable();
    assert_eq!(found, expected);
    for hit in reply.body.as_array().expect("array body") {
        assert!(hit.get("email").is_none(), "search must not leak emails");
    }
}

#[rstest]
#[actix_web::test]
async fn claimed_profiles_leave_the_public_search() {
    let harness = seeded();
    let app = harness.app().await;
    let visitor = post_json(
        &app,
        "/api/v1/auth/register",
        json!({ "email": "claimer@mail.example", "password": "reunion-2025" }),
        None,
    )
    .await
    .cookie
    .expect("session");
    post_json(
        &app,
        "/api/v1/claim",
        json!({ "alumniId": 12, "email": "claimer@mail.example" }),
        Some(&visitor),
    )
    .await;

    let reply = get(&app, "/api/v1/alumni/unclaimed?search=bha", None).await;

    assert_eq!(names(&reply.body), vec!["Bhavna Iyer"]);
}

#[rstest]
#[actix_web::test]
async fn resubmitted_claim_keeps_fields_it_omits() {
    let harness = seeded();
    let app = harness.app().await;
    let visitor = post_json(
        &app,
        "/api/v1/auth/register",
        json!({ "email": "bhavik@roster.example", "password": "reunion-2025" }),
        None,
    )
    .await
    .cookie
    .expect("session");
    let first = post_json(
        &app,
        "/api/v1/claim",
        json!({
            "alumniId": 12,
            "phoneNumber": "+91 1",
            "city": "Pune",
            "rsvpAdults": 2,
            "rsvpKids": 1
        }),
        Some(&visitor),
    )
    .await;
    assert_eq!(first.status, 200, "{}", first.body);
    let member = first.cookie.unwrap_or(visitor);

    let second = post_json(
        &app,
        "/api/v1/claim",
        json!({ "alumniId": 12, "specialization": "Cardiology" }),
        Some(&member),
    )
    .await;
    assert_eq!(second.status, 200, "{}", second.body);

    let own = get(&app, "/api/v1/alumni/me", Some(&member)).await;
    assert_eq!(own.body["specialization"], "Cardiology");
    assert_eq!(own.body["phoneNumber"], "+91 1");
    assert_eq!(own.body["city"], "Pune");
    assert_eq!(own.body["rsvpAdults"], 2);
    assert_eq!(own.body["rsvpKids"], 1);
}
