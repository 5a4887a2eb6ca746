//! PostgreSQL-backed book store.

use async_trait::async_trait;
use sqlx::{Pool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::BookStore;
use crate::{
    error::AppResult,
    models::{Book, CreateBook, SearchCriteria, UpdateBook},
};

const BOOK_COLUMNS: &str = "id, title, author, genre, published_year, available";

/// Wrap a user term for an unanchored `ILIKE`, matching `%`, `_` and `\` literally
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn push_criteria(qb: &mut QueryBuilder<'_, Postgres>, criteria: &SearchCriteria) {
    let mut keyword = " WHERE ";
    if let Some(ref author) = criteria.author {
        qb.push(keyword)
            .push("author ILIKE ")
            .push_bind(like_pattern(author))
            .push(r" ESCAPE '\'");
        keyword = " AND ";
    }
    if let Some(ref genre) = criteria.genre {
        qb.push(keyword)
            .push("genre ILIKE ")
            .push_bind(like_pattern(genre))
            .push(r" ESCAPE '\'");
    }
}

fn page_query(criteria: &SearchCriteria, skip: i64, limit: i64) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {BOOK_COLUMNS} FROM books"));
    push_criteria(&mut qb, criteria);
    qb.push(" ORDER BY seq LIMIT ")
        .push_bind(limit)
        .push(" OFFSET ")
        .push_bind(skip);
    qb
}

/// `None` when the patch assigns no column
fn update_query(id: Uuid, patch: &UpdateBook) -> Option<QueryBuilder<'static, Postgres>> {
    let mut qb = QueryBuilder::new("UPDATE books SET ");
    let mut assigned = 0;
    {
        let mut set = qb.separated(", ");
        if let Some(Some(ref title)) = patch.title {
            set.push("title = ").push_bind_unseparated(title.clone());
            assigned += 1;
        }
        if let Some(Some(ref author)) = patch.author {
            set.push("author = ").push_bind_unseparated(author.clone());
            assigned += 1;
        }
        if let Some(ref genre) = patch.genre {
            set.push("genre = ").push_bind_unseparated(genre.clone());
            assigned += 1;
        }
        if let Some(published_year) = patch.published_year {
            set.push("published_year = ")
                .push_bind_unseparated(published_year);
            assigned += 1;
        }
        if let Some(Some(available)) = patch.available {
            set.push("available = ").push_bind_unseparated(available);
            assigned += 1;
        }
    }

    if assigned == 0 {
        return None;
    }

    qb.push(" WHERE id = ")
        .push_bind(id)
        .push(format!(" RETURNING {BOOK_COLUMNS}"));
    Some(qb)
}

#[derive(Clone)]
pub struct PgBookStore {
    pool: Pool<Postgres>,
}

impl PgBookStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookStore for PgBookStore {
    async fn insert(&self, input: CreateBook) -> AppResult<Book> {
        let book = sqlx::query_as::<_, Book>(&format!(
            r#"
            INSERT INTO books (title, author, genre, published_year, available)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {BOOK_COLUMNS}
            "#
        ))
        .bind(input.title)
        .bind(input.author)
        .bind(input.genre)
        .bind(input.published_year)
        .bind(input.available)
        .fetch_one(&self.pool)
        .await?;

        Ok(book)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(book)
    }

    async fn find_page(
        &self,
        criteria: &SearchCriteria,
        skip: i64,
        limit: i64,
    ) -> AppResult<Vec<Book>> {
        let mut qb = page_query(criteria, skip, limit);
        let books = qb.build_query_as::<Book>().fetch_all(&self.pool).await?;
        Ok(books)
    }

    async fn count(&self, criteria: &SearchCriteria) -> AppResult<i64> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM books");
        push_criteria(&mut qb, criteria);

        let total = qb.build_query_scalar::<i64>().fetch_one(&self.pool).await?;
        Ok(total)
    }

    async fn update(&self, id: Uuid, patch: &UpdateBook) -> AppResult<Option<Book>> {
        let Some(mut qb) = update_query(id, patch) else {
            return self.find_by_id(id).await;
        };

        let book = qb
            .build_query_as::<Book>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(book)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
