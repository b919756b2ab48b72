//! The memory wall: hosted photos posted by signed-in members.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use super::ports::{MemoryRepository, MemoryWall};
use super::{Error, Memory, MemoryDraft, MemoryId, Role, SessionClaims, map_memory_error};

const WALL_LIMIT: i64 = 200;

/// Implements [`MemoryWall`].
#[derive(Clone)]
pub struct MemoryService {
    memories: Arc<dyn MemoryRepository>,
    clock: Arc<dyn Clock>,
}

impl MemoryService {
    pub fn new(memories: Arc<dyn MemoryRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { memories, clock }
    }
}

#[async_trait]
impl MemoryWall for MemoryService {
    async fn list(&self) -> Result<Vec<Memory>, Error> {
        self.memories
            .list_recent(WALL_LIMIT)
            .await
            .map_err(map_memory_error)
    }

    async fn post(&self, actor: &SessionClaims, draft: MemoryDraft) -> Result<Memory, Error> {
        self.memories
            .create(actor.user_id, &draft, self.clock.utc())
            .await
            .map_err(map_memory_error)
    }

    async fn delete(&self, actor: &SessionClaims, id: MemoryId) -> Result<(), Error> {
        let memory = self
            .memories
            .find_by_id(id)
            .await
            .map_err(map_memory_error)?
            .ok_or_else(|| Error::not_found(format!("memory {id} not found")))?;
        if memory.author != actor.user_id && actor.role != Role::Admin {
            return Err(Error::forbidden("only the author or an admin may delete a memory"));
        }
        self.memories.delete(id).await.map_err(map_memory_error)?;
        info!(memory_id = %id, deleted_by = %actor.user_id, "memory deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockMemoryRepository;
    use crate::domain::{ErrorCode, UserId};
    use crate::test_support::{MutableClock, fixed_now};
    use rstest::rstest;

    fn stored(author: UserId) -> Memory {
        Memory {
            id: MemoryId::new(1),
            author,
            draft: MemoryDraft {
                image_url: "https://img.example.com/1.jpg".into(),
                caption: None,
            },
            created_at: fixed_now(),
        }
    }

    #[rstest]
    #[case(Role::Standard, false, ErrorCode::Forbidden)]
    #[case(Role::Admin, true, ErrorCode::Forbidden)]
    #[tokio::test]
    async fn delete_is_limited_to_author_or_admin(
        #[case] role: Role,
        #[case] allowed: bool,
        #[case] rejected_code: ErrorCode,
    ) {
        let author = UserId::random();
        let mut repo = MockMemoryRepository::new();
        repo.expect_find_by_id()
            .return_once(move |_| Ok(Some(stored(author))));
        repo.expect_delete()
            .times(usize::from(allowed))
            .returning(|_| Ok(true));
        let service = MemoryService::new(Arc::new(repo), Arc::new(MutableClock::default()));
        let actor = SessionClaims {
            user_id: UserId::random(),
            role,
            alumni_id: None,
        };

        let outcome = service.delete(&actor, MemoryId::new(1)).await;
        match outcome {
            Ok(()) => assert!(allowed),
            Err(err) => {
                assert!(!allowed);
                assert_eq!(err.code(), rejected_code);
            }
        }
    }

    #[rstest]
    #[tokio::test]
    async fn author_can_delete_own_memory() {
        let author = UserId::random();
        let mut repo = MockMemoryRepository::new();
        repo.expect_find_by_id()
            .return_once(move |_| Ok(Some(stored(author))));
        repo.expect_delete().times(1).return_once(|_| Ok(true));
        let service = MemoryService::new(Arc::new(repo), Arc::new(MutableClock::default()));
        let actor = SessionClaims {
            user_id: author,
            role: Role::Standard,
            alumni_id: None,
        };
        service
            .delete(&actor, MemoryId::new(1))
            .await
            .expect("author may delete");
    }
}
