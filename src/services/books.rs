//! Book catalog service

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Book, CreateBook, PaginatedResult, Pagination, SearchCriteria, UpdateBook},
    repository::BookStore,
};

/// Identifiers the store cannot represent are reported as missing records
fn parse_id(id: &str) -> AppResult<Uuid> {
    Uuid::parse_str(id).map_err(|_| AppError::NotFound(id.to_string()))
}

#[derive(Clone)]
pub struct BooksService {
    store: Arc<dyn BookStore>,
}

impl BooksService {
    pub fn new(store: Arc<dyn BookStore>) -> Self {
        Self { store }
    }

    /// Create a new book
    pub async fn create(&self, input: CreateBook) -> AppResult<Book> {
        let book = self.store.insert(input).await?;
        tracing::info!(id = %book.id, title = %book.title, "Book created");
        Ok(book)
    }

    /// List all books, one page at a time
    pub async fn find_all(&self, pagination: Pagination) -> AppResult<PaginatedResult<Book>> {
        self.paginate(&SearchCriteria::default(), pagination).await
    }

    /// Get a book by ID
    pub async fn find_one(&self, id: &str) -> AppResult<Book> {
        let uuid = parse_id(id)?;
        self.store
            .find_by_id(uuid)
            .await?
            .ok_or_else(|| AppError::NotFound(id.to_string()))
    }

    /// Apply a partial update. Unknown ids are never created.
    pub async fn update(&self, id: &str, patch: UpdateBook) -> AppResult<Book> {
        let uuid = parse_id(id)?;
        let book = self
            .store
            .update(uuid, &patch)
            .await?
            .ok_or_else(|| AppError::NotFound(id.to_string()))?;
        tracing::info!(id = %book.id, "Book updated");
        Ok(book)
    }

    /// Permanently delete a book
    pub async fn remove(&self, id: &str) -> AppResult<()> {
        let uuid = parse_id(id)?;
        if !self.store.delete(uuid).await? {
            return Err(AppError::NotFound(id.to_string()));
        }
        tracing::info!(id = %uuid, "Book deleted");
        Ok(())
    }

    /// Search by author and/or genre substring
    pub async fn search(
        &self,
        criteria: &SearchCriteria,
        pagination: Pagination,
    ) -> AppResult<PaginatedResult<Book>> {
        self.paginate(criteria, pagination).await
    }

    /// Check that the store is reachable
    pub async fn ping(&self) -> AppResult<()> {
        self.store.ping().await
    }

    async fn paginate(
        &self,
        criteria: &SearchCriteria,
        pagination: Pagination,
    ) -> AppResult<PaginatedResult<Book>> {
        tracing::debug!(
            author = ?criteria.author,
            genre = ?criteria.genre,
            page = pagination.page,
            limit = pagination.limit,
            "Listing books"
        );

        // The page and the count are independent reads; a failure in either
        // fails the request.
        let (data, total) = tokio::try_join!(
            self.store
                .find_page(criteria, pagination.skip(), pagination.limit),
            self.store.count(criteria),
        )?;

        Ok(PaginatedResult::new(data, total, pagination))
    }
}
