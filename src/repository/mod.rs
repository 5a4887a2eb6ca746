//! Repository layer: the document store behind the book service

pub mod books;
pub mod memory;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Book, CreateBook, SearchCriteria, UpdateBook},
};

pub use books::PgBookStore;
pub use memory::MemoryBookStore;

/// Persistence operations the book service relies on.
///
/// Listing methods return records in insertion order so that consecutive
/// pages do not overlap.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Persist a new record; the store assigns its id
    async fn insert(&self, input: CreateBook) -> AppResult<Book>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Book>>;

    /// At most `limit` matching records, starting at offset `skip`
    async fn find_page(
        &self,
        criteria: &SearchCriteria,
        skip: i64,
        limit: i64,
    ) -> AppResult<Vec<Book>>;

    /// Number of records matching `criteria`
    async fn count(&self, criteria: &SearchCriteria) -> AppResult<i64>;

    /// Apply `patch` and return the updated record, `None` if `id` is unknown
    async fn update(&self, id: Uuid, patch: &UpdateBook) -> AppResult<Option<Book>>;

    /// Returns whether a record was removed
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// Connectivity check used by the readiness probe
    async fn ping(&self) -> AppResult<()>;
}
