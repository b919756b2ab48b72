//! Port abstraction for the memory wall.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Memory, MemoryDraft, MemoryId, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by memory adapters.
    pub enum MemoryRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "memory repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "memory repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MemoryRepository: Send + Sync {
    /// Most recent memories first.
    async fn list_recent(&self, limit: i64) -> Result<Vec<Memory>, MemoryRepositoryError>;

    /// Store a new memory.
    async fn create(
        &self,
        author: UserId,
        draft: &MemoryDraft,
        now: DateTime<Utc>,
    ) -> Result<Memory, MemoryRepositoryError>;

    /// Fetch a memory by identifier.
    async fn find_by_id(&self, id: MemoryId) -> Result<Option<Memory>, MemoryRepositoryError>;

    /// Delete a memory. Returns `false` when it did not exist.
    async fn delete(&self, id: MemoryId) -> Result<bool, MemoryRepositoryError>;
}
