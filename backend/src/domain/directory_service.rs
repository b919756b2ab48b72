//! Read access to the alumni directory, gated by session claims.

use std::sync::Arc;

use async_trait::async_trait;

use super::ports::{AlumniRepository, DirectoryQuery};
use super::{
    AlumniId, AlumniProfile, DirectoryEntry, Error, SessionClaims, UnclaimedProfile,
    map_alumni_error,
};

/// Cap on public search results.
const SEARCH_LIMIT: i64 = 50;

/// Implements [`DirectoryQuery`].
#[derive(Clone)]
pub struct DirectoryService {
    alumni: Arc<dyn AlumniRepository>,
}

impl DirectoryService {
    pub fn new(alumni: Arc<dyn AlumniRepository>) -> Self {
        Self { alumni }
    }

    async fn load(&self, id: AlumniId) -> Result<AlumniProfile, Error> {
        self.alumni
            .find_by_id(id)
            .await
            .map_err(map_alumni_error)?
            .ok_or_else(|| Error::not_found(format!("alumni profile {id} not found")))
    }
}

#[async_trait]
impl DirectoryQuery for DirectoryService {
    async fn search_unclaimed(
        &self,
        search: Option<String>,
    ) -> Result<Vec<UnclaimedProfile>, Error> {
        let fragment = search
            .map(|raw| raw.trim().to_owned())
            .filter(|raw| !raw.is_empty());
        self.alumni
            .search_unclaimed(fragment, SEARCH_LIMIT)
            .await
            .map_err(map_alumni_error)
    }

    async fn list(&self, _actor: &SessionClaims) -> Result<Vec<DirectoryEntry>, Error> {
        self.alumni.list_directory().await.map_err(map_alumni_error)
    }

    async fn profile(&self, actor: &SessionClaims, id: AlumniId) -> Result<AlumniProfile, Error> {
        if !actor.can_view_members() {
            return Err(Error::forbidden(
                "link your alumni profile to view member details",
            ));
        }
        self.load(id).await
    }

    async fn own_profile(&self, actor: &SessionClaims) -> Result<AlumniProfile, Error> {
        let id = actor
            .alumni_id
            .ok_or_else(|| Error::not_found("no alumni profile is linked to this account"))?;
        self.load(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockAlumniRepository;
    use crate::domain::{ErrorCode, Role, UserId};
    use crate::test_support::profile;
    use mockall::predicate::eq;
    use rstest::rstest;

    fn claims(role: Role, alumni_id: Option<i64>) -> SessionClaims {
        SessionClaims {
            user_id: UserId::random(),
            role,
            alumni_id: alumni_id.map(AlumniId::new),
        }
    }

    #[rstest]
    #[case(Some("  Bha ".to_owned()), Some("Bha".to_owned()))]
    #[case(Some("   ".to_owned()), None)]
    #[case(None, None)]
    #[tokio::test]
    async fn search_trims_fragment(#[case] raw: Option<String>, #[case] expected: Option<String>) {
        let mut repo = MockAlumniRepository::new();
        repo.expect_search_unclaimed()
            .with(eq(expected), eq(SEARCH_LIMIT))
            .times(1)
            .return_once(|_, _| Ok(Vec::new()));
        let service = DirectoryService::new(Arc::new(repo));
        service.search_unclaimed(raw).await.expect("search succeeds");
    }

    #[rstest]
    #[tokio::test]
    async fn unlinked_standard_user_cannot_view_members() {
        let mut repo = MockAlumniRepository::new();
        repo.expect_find_by_id().times(0);
        let service = DirectoryService::new(Arc::new(repo));
        let err = service
            .profile(&claims(Role::Standard, None), AlumniId::new(3))
            .await
            .expect_err("gate rejects");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[rstest]
    #[case(Role::Alumni, Some(1))]
    #[case(Role::Admin, None)]
    #[tokio::test]
    async fn linked_alumni_and_admins_view_members(#[case] role: Role, #[case] alumni_id: Option<i64>) {
        let mut repo = MockAlumniRepository::new();
        repo.expect_find_by_id()
            .with(eq(AlumniId::new(3)))
            .return_once(|_| Ok(Some(profile(3, "C", "c@example.com"))));
        let service = DirectoryService::new(Arc::new(repo));
        let found = service
            .profile(&claims(role, alumni_id), AlumniId::new(3))
            .await
            .expect("visible");
        assert_eq!(found.id, AlumniId::new(3));
    }

    #[rstest]
    #[tokio::test]
    async fn own_profile_requires_link() {
        let service = DirectoryService::new(Arc::new(MockAlumniRepository::new()));
        let err = service
            .own_profile(&claims(Role::Standard, None))
            .await
            .expect_err("no link");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
