//! Data models for the book catalog

pub mod book;
pub mod pagination;

pub use book::{Book, CreateBook, SearchCriteria, UpdateBook};
pub use pagination::{PaginatedResult, Pagination, PaginationQuery, SearchQuery};
