//! In-process book store.
//!
//! Backs the `memory` storage backend and the test suites. Records live in an
//! insertion-ordered map behind an async lock; nothing is persisted.

use async_trait::async_trait;
use indexmap::IndexMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::BookStore;
use crate::{
    error::AppResult,
    models::{Book, CreateBook, SearchCriteria, UpdateBook},
};

#[derive(Default)]
pub struct MemoryBookStore {
    books: RwLock<IndexMap<Uuid, Book>>,
}

impl MemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookStore for MemoryBookStore {
    async fn insert(&self, input: CreateBook) -> AppResult<Book> {
        let book = Book::from_create(input);
        self.books.write().await.insert(book.id, book.clone());
        Ok(book)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Book>> {
        Ok(self.books.read().await.get(&id).cloned())
    }

    async fn find_page(
        &self,
        criteria: &SearchCriteria,
        skip: i64,
        limit: i64,
    ) -> AppResult<Vec<Book>> {
        let books = self.books.read().await;
        Ok(books
            .values()
            .filter(|b| criteria.matches(b))
            .skip(skip.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn count(&self, criteria: &SearchCriteria) -> AppResult<i64> {
        let books = self.books.read().await;
        Ok(books.values().filter(|b| criteria.matches(b)).count() as i64)
    }

    async fn update(&self, id: Uuid, patch: &UpdateBook) -> AppResult<Option<Book>> {
        let mut books = self.books.write().await;
        Ok(books.get_mut(&id).map(|book| {
            patch.apply_to(book);
            book.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        // shift_remove keeps the remaining records in insertion order
        Ok(self.books.write().await.shift_remove(&id).is_some())
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
