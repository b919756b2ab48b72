//! Tests for role promotion and session claim derivation.

use super::*;
use crate::domain::ports::{MockAlumniRepository, MockUserRepository};
use crate::domain::ErrorCode;
use crate::test_support::{profile, user};
use mockall::predicate::eq;
use rstest::rstest;

fn gate(users: MockUserRepository, alumni: MockAlumniRepository) -> RoleGate {
    RoleGate::new(Arc::new(users), Arc::new(alumni))
}

#[rstest]
#[tokio::test]
async fn promote_raises_standard_to_alumni() {
    let account = user("a@example.com", None, Role::Standard);
    let id = account.id;
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .with(eq(id))
        .times(1)
        .return_once(move |_| Ok(Some(account)));
    users
        .expect_replace_role()
        .with(eq(id), eq(Role::Standard), eq(Role::Alumni))
        .times(1)
        .return_once(|_, _, _| Ok(true));

    let role = gate(users, MockAlumniRepository::new())
        .promote(id, Role::Alumni)
        .await
        .expect("promotion succeeds");
    assert_eq!(role, Role::Alumni);
}

#[rstest]
#[tokio::test]
async fn promote_never_demotes_admin() {
    let account = user("admin@example.com", None, Role::Admin);
    let id = account.id;
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(account)));
    users.expect_replace_role().times(0);

    let role = gate(users, MockAlumniRepository::new())
        .promote(id, Role::Alumni)
        .await
        .expect("no-op succeeds");
    assert_eq!(role, Role::Admin);
}

#[rstest]
#[tokio::test]
async fn promote_retries_after_concurrent_change() {
    let standard = user("a@example.com", None, Role::Standard);
    let id = standard.id;
    let mut already_alumni = standard.clone();
    already_alumni.role = Role::Alumni;
    let mut users = MockUserRepository::new();
    let mut seq = mockall::Sequence::new();
    users
        .expect_find_by_id()
        .times(1)
        .in_sequence(&mut seq)
        .return_once(move |_| Ok(Some(standard)));
    users
        .expect_replace_role()
        .times(1)
        .in_sequence(&mut seq)
        .return_once(|_, _, _| Ok(false));
    users
        .expect_find_by_id()
        .times(1)
        .in_sequence(&mut seq)
        .return_once(move |_| Ok(Some(already_alumni)));

    let role = gate(users, MockAlumniRepository::new())
        .promote(id, Role::Alumni)
        .await
        .expect("second attempt observes promotion");
    assert_eq!(role, Role::Alumni);
}

#[rstest]
#[tokio::test]
async fn promote_unknown_user_is_not_found() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_id().return_once(|_| Ok(None));
    let err = gate(users, MockAlumniRepository::new())
        .promote(UserId::random(), Role::Alumni)
        .await
        .expect_err("missing user");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn claims_prefer_owned_profile() {
    let account = user("a@example.com", None, Role::Alumni);
    let mut owned = profile(5, "A", "other@example.com");
    owned.owner = Some(account.id);
    let mut alumni = MockAlumniRepository::new();
    alumni
        .expect_find_by_owner()
        .return_once(move |_| Ok(Some(owned)));
    alumni.expect_find_by_email().times(0);

    let claims = gate(MockUserRepository::new(), alumni)
        .claims_for(&account)
        .await
        .expect("claims");
    assert_eq!(claims.alumni_id, Some(AlumniId::new(5)));
    assert_eq!(claims.role, Role::Alumni);
}

#[rstest]
#[case(None, Some(AlumniId::new(9)))]
#[case(Some(UserId::random()), None)]
#[tokio::test]
async fn claims_fall_back_to_email_profile_not_owned_by_others(
    #[case] owner: Option<UserId>,
    #[case] expected: Option<AlumniId>,
) {
    let account = user("a@example.com", None, Role::Standard);
    let mut by_email = profile(9, "A", "a@example.com");
    by_email.owner = owner;
    let mut alumni = MockAlumniRepository::new();
    alumni.expect_find_by_owner().return_once(|_| Ok(None));
    alumni
        .expect_find_by_email()
        .return_once(move |_| Ok(Some(by_email)));

    let claims = gate(MockUserRepository::new(), alumni)
        .claims_for(&account)
        .await
        .expect("claims");
    assert_eq!(claims.alumni_id, expected);
}

#[rstest]
#[case(Role::Standard, None, false)]
#[case(Role::Standard, Some(AlumniId::new(1)), true)]
#[case(Role::Admin, None, true)]
fn member_view_gate(#[case] role: Role, #[case] alumni_id: Option<AlumniId>, #[case] allowed: bool) {
    let claims = SessionClaims {
        user_id: UserId::random(),
        role,
        alumni_id,
    };
    assert_eq!(claims.can_view_members(), allowed);
}
