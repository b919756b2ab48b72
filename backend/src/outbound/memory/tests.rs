//! Behavioural tests for the in-memory store.

use super::*;
use crate::domain::ClaimTokenValue;
use crate::test_support::{fixed_now, profile, user};
use chrono::TimeDelta;
use rstest::{fixture, rstest};

#[fixture]
fn store() -> InMemoryStore {
    let store = InMemoryStore::new();
    store
        .put_profile(profile(1, "Bhavik Parmar", "bhavik@roster.example"))
        .expect("seed profile");
    store
        .put_profile(profile(2, "Anita Rao", "anita@roster.example"))
        .expect("seed profile");
    store
}

fn token_for(id: i64, raw: &str, ttl: TimeDelta) -> ClaimToken {
    ClaimToken {
        hash: ClaimTokenValue::new(raw).expect("valid token").digest(),
        alumni_id: AlumniId::new(id),
        used: false,
        expires_at: fixed_now() + ttl,
        created_at: fixed_now(),
    }
}

fn redemption(raw: &str, email: &str) -> TokenRedemption {
    TokenRedemption {
        hash: ClaimTokenValue::new(raw).expect("valid token").digest(),
        user: user(email, Some("Bhavik P"), Role::Alumni),
        now: fixed_now(),
    }
}

#[rstest]
#[tokio::test]
async fn duplicate_user_email_is_rejected(store: InMemoryStore) {
    let first = user("dup@example.com", None, Role::Standard);
    let second = user("dup@example.com", None, Role::Standard);
    UserRepository::insert(&store, &first).await.expect("first insert");

    let err = UserRepository::insert(&store, &second)
        .await
        .expect_err("duplicate must fail");

    assert_eq!(err, UserPersistenceError::duplicate_email("dup@example.com"));
}

#[rstest]
#[tokio::test]
async fn search_unclaimed_filters_by_fragment_and_skips_owned(store: InMemoryStore) {
    let owner = UserId::random();
    assert!(store
        .link_if_unclaimed(AlumniId::new(2), owner, fixed_now())
        .await
        .expect("link"));

    let all = store.search_unclaimed(None, 10).await.expect("search");
    let by_name = store
        .search_unclaimed(Some("PARM".into()), 10)
        .await
        .expect("search");

    assert_eq!(all.len(), 1);
    assert_eq!(by_name.first().map(|p| p.id), Some(AlumniId::new(1)));
}

#[rstest]
#[tokio::test]
async fn save_if_owner_refuses_stale_owner(store: InMemoryStore) {
    let mut edited = profile(1, "Bhavik Parmar", "bhavik@roster.example");
    edited.owner = Some(UserId::random());
    assert!(store.save_if_owner(None, &edited).await.expect("first save"));

    let mut rival = edited.clone();
    rival.owner = Some(UserId::random());
    let saved = store.save_if_owner(None, &rival).await.expect("second save");

    assert!(!saved);
    let stored = AlumniRepository::find_by_id(&store, AlumniId::new(1))
        .await
        .expect("lookup")
        .expect("profile present");
    assert_eq!(stored.owner, edited.owner);
}

#[rstest]
#[tokio::test]
async fn save_if_owner_rejects_unknown_hotel(store: InMemoryStore) {
    let mut edited = profile(1, "Bhavik Parmar", "bhavik@roster.example");
    edited.hotel_selection = Some(HotelId::new(999));

    let err = store
        .save_if_owner(None, &edited)
        .await
        .expect_err("unknown hotel");

    assert_eq!(err, AlumniRepositoryError::unknown_hotel(999));
}

#[rstest]
#[tokio::test]
async fn import_roster_skips_known_emails(store: InMemoryStore) {
    let entries: Vec<RosterEntry> = serde_json::from_value(serde_json::json!([
        { "fullName": "Anita Rao", "email": "anita@roster.example" },
        { "fullName": "Chetan Shah", "email": "chetan@roster.example", "rollNumber": 7 }
    ]))
    .expect("roster parses");

    let inserted = store.import_roster(&entries, fixed_now()).await.expect("import");

    assert_eq!(inserted, 1);
    let chetan = AlumniRepository::find_by_email(
        &store,
        &EmailAddress::new("chetan@roster.example").expect("email"),
    )
    .await
    .expect("lookup")
    .expect("imported");
    assert_eq!(chetan.roll_number, Some(7));
    assert!(chetan.id.get() > 2);
}

#[rstest]
#[tokio::test]
async fn redeem_links_profile_and_consumes_token(store: InMemoryStore) {
    ClaimTokenRepository::insert(&store, &token_for(1, "tok", TimeDelta::days(1)), true)
        .await
        .expect("insert token");
    let request = redemption("tok", "bhavik@new.example");

    let alumni_id = store.redeem(&request).await.expect("redeem");

    assert_eq!(alumni_id, AlumniId::new(1));
    let linked = AlumniRepository::find_by_id(&store, alumni_id)
        .await
        .expect("lookup")
        .expect("profile");
    assert_eq!(linked.owner, Some(request.user.id));
    assert_eq!(linked.email.as_ref(), "bhavik@new.example");
    assert_eq!(linked.full_name, "Bhavik P");
    let token = store
        .find_by_hash(&request.hash)
        .await
        .expect("lookup")
        .expect("token");
    assert!(token.used);
}

#[rstest]
#[tokio::test]
async fn second_redemption_writes_nothing(store: InMemoryStore) {
    ClaimTokenRepository::insert(&store, &token_for(1, "tok", TimeDelta::days(1)), false)
        .await
        .expect("insert token");
    store
        .redeem(&redemption("tok", "first@example.com"))
        .await
        .expect("first redeem");

    let err = store
        .redeem(&redemption("tok", "second@example.com"))
        .await
        .expect_err("token spent");

    assert_eq!(err, ClaimTokenRepositoryError::used());
    assert_eq!(store.user_count().expect("count"), 1);
}

#[rstest]
#[tokio::test]
async fn unknown_token_is_refused_as_missing(store: InMemoryStore) {
    let err = store
        .redeem(&redemption("never-issued", "who@example.com"))
        .await
        .expect_err("no such token");

    assert_eq!(err, ClaimTokenRepositoryError::missing());
}

#[rstest]
#[tokio::test]
async fn expired_token_is_refused_as_expired(store: InMemoryStore) {
    ClaimTokenRepository::insert(&store, &token_for(1, "old", TimeDelta::zero()), false)
        .await
        .expect("insert token");

    let err = store
        .redeem(&redemption("old", "late@example.com"))
        .await
        .expect_err("expired");

    assert_eq!(err, ClaimTokenRepositoryError::expired());
    assert_eq!(store.user_count().expect("count"), 0);
}

#[rstest]
#[tokio::test]
async fn redeem_refuses_profile_claimed_meanwhile(store: InMemoryStore) {
    ClaimTokenRepository::insert(&store, &token_for(1, "tok", TimeDelta::days(1)), false)
        .await
        .expect("insert token");
    store
        .link_if_unclaimed(AlumniId::new(1), UserId::random(), fixed_now())
        .await
        .expect("link");

    let err = store
        .redeem(&redemption("tok", "late@example.com"))
        .await
        .expect_err("profile taken");

    assert_eq!(err, ClaimTokenRepositoryError::profile_claimed(1));
    let token = store
        .find_by_hash(&ClaimTokenValue::new("tok").expect("token").digest())
        .await
        .expect("lookup")
        .expect("token");
    assert!(!token.used);
}

#[rstest]
#[tokio::test]
async fn revoke_previous_marks_older_tokens_used(store: InMemoryStore) {
    ClaimTokenRepository::insert(&store, &token_for(1, "first", TimeDelta::days(1)), true)
        .await
        .expect("insert first");
    ClaimTokenRepository::insert(&store, &token_for(1, "second", TimeDelta::days(1)), true)
        .await
        .expect("insert second");

    let first = store
        .find_by_hash(&ClaimTokenValue::new("first").expect("token").digest())
        .await
        .expect("lookup")
        .expect("token");

    assert!(first.used);
    assert_eq!(store.token_count().expect("count"), 2);
}

#[rstest]
#[tokio::test]
async fn hotel_guest_counts_follow_selections(store: InMemoryStore) {
    let draft = HotelDraft {
        name: "Lakeview".into(),
        address: None,
        price_range: None,
        website_url: None,
        contact: None,
        distance_note: None,
    };
    let hotel = HotelRepository::create(&store, &draft, fixed_now())
        .await
        .expect("create hotel");
    let mut edited = profile(1, "Bhavik Parmar", "bhavik@roster.example");
    edited.hotel_selection = Some(hotel.id);
    store.save_if_owner(None, &edited).await.expect("save");

    let listed = store.list_with_guest_counts().await.expect("list");

    assert_eq!(listed.len(), 1);
    assert_eq!(listed.first().map(|h| h.guest_count), Some(1));
}

#[rstest]
#[tokio::test]
async fn event_attendance_is_a_set(store: InMemoryStore) {
    let draft = EventDraft {
        title: "Dinner".into(),
        description: None,
        location: None,
        starts_at: None,
    };
    let attendee = UserId::random();
    let event = EventRepository::create(&store, &draft, attendee, fixed_now())
        .await
        .expect("create event");
    store.join(event.id, attendee, fixed_now()).await.expect("join");
    store.join(event.id, attendee, fixed_now()).await.expect("rejoin");

    let listed = store.list_with_counts().await.expect("list");
    assert_eq!(listed.first().map(|e| e.attendee_count), Some(1));
    assert!(store.leave(event.id, attendee).await.expect("leave"));
    assert!(!store.leave(event.id, attendee).await.expect("leave again"));

    let err = store
        .join(EventId::new(404), attendee, fixed_now())
        .await
        .expect_err("unknown event");
    assert_eq!(err, EventRepositoryError::unknown_event(404));
}

#[rstest]
#[tokio::test]
async fn memories_list_newest_first(store: InMemoryStore) {
    let author = UserId::random();
    let draft = MemoryDraft::new("https://img.example/1.jpg", None).expect("draft");
    let older = MemoryRepository::create(&store, author, &draft, fixed_now())
        .await
        .expect("create");
    let newer = MemoryRepository::create(&store, author, &draft, fixed_now() + TimeDelta::hours(1))
        .await
        .expect("create");

    let listed = store.list_recent(10).await.expect("list");

    assert_eq!(
        listed.iter().map(|m| m.id).collect::<Vec<_>>(),
        vec![newer.id, older.id]
    );
    assert!(MemoryRepository::delete(&store, older.id).await.expect("delete"));
}
