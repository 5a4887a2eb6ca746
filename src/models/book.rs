//! Book model and request payloads.

use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

/// Earliest accepted publication year
pub const MIN_PUBLISHED_YEAR: i32 = 1000;

/// A catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Unique identifier, assigned on creation
    pub id: Uuid,
    #[schema(example = "To Kill a Mockingbird")]
    pub title: String,
    #[schema(example = "Harper Lee")]
    pub author: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "Fiction")]
    pub genre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = 1960)]
    pub published_year: Option<i32>,
    pub available: bool,
}

impl Book {
    /// Build a fresh record from a create request with a newly assigned id
    pub fn from_create(input: CreateBook) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: input.title,
            author: input.author,
            genre: input.genre,
            published_year: input.published_year,
            available: input.available,
        }
    }
}

fn default_available() -> bool {
    true
}

/// Create book request
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBook {
    #[schema(example = "To Kill a Mockingbird")]
    pub title: String,
    #[schema(example = "Harper Lee")]
    pub author: String,
    #[schema(example = "Fiction")]
    pub genre: Option<String>,
    /// Between 1000 and the current year
    #[schema(example = 1960, minimum = 1000)]
    pub published_year: Option<i32>,
    #[serde(default = "default_available")]
    #[schema(default = true)]
    pub available: bool,
}

/// Partial update request.
///
/// Each field distinguishes "absent" (outer `None`, leave unchanged) from an
/// explicit JSON `null` (`Some(None)`). A `null` clears `genre` and
/// `publishedYear`; it is rejected for the required fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBook {
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub title: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub author: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>, nullable)]
    pub genre: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<i32>, nullable, minimum = 1000)]
    pub published_year: Option<Option<i32>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<bool>)]
    pub available: Option<Option<bool>>,
}

impl UpdateBook {
    /// True when no field is present in the request
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.genre.is_none()
            && self.published_year.is_none()
            && self.available.is_none()
    }

    /// Merge the present fields into `book`, leaving absent ones untouched.
    /// Assumes the patch has been validated.
    pub fn apply_to(&self, book: &mut Book) {
        if let Some(Some(title)) = &self.title {
            book.title = title.clone();
        }
        if let Some(Some(author)) = &self.author {
            book.author = author.clone();
        }
        if let Some(genre) = &self.genre {
            book.genre = genre.clone();
        }
        if let Some(year) = self.published_year {
            book.published_year = year;
        }
        if let Some(Some(available)) = self.available {
            book.available = available;
        }
    }
}

fn violation(code: &'static str, message: String) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

fn check_required_text(errors: &mut ValidationErrors, field: &'static str, label: &str, value: &str) {
    if value.is_empty() {
        errors.add(field, violation("length", format!("{} must not be empty", label)));
    }
}

fn check_published_year(errors: &mut ValidationErrors, year: i32) {
    let current = Utc::now().year();
    if !(MIN_PUBLISHED_YEAR..=current).contains(&year) {
        errors.add(
            "publishedYear",
            violation(
                "range",
                format!(
                    "Published year must be between {} and {}",
                    MIN_PUBLISHED_YEAR, current
                ),
            ),
        );
    }
}

impl Validate for CreateBook {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        check_required_text(&mut errors, "title", "Title", &self.title);
        check_required_text(&mut errors, "author", "Author", &self.author);
        if let Some(year) = self.published_year {
            check_published_year(&mut errors, year);
        }

        if errors.errors().is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl Validate for UpdateBook {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        match &self.title {
            Some(Some(title)) => check_required_text(&mut errors, "title", "Title", title),
            Some(None) => errors.add("title", violation("required", "Title cannot be null".into())),
            None => {}
        }
        match &self.author {
            Some(Some(author)) => check_required_text(&mut errors, "author", "Author", author),
            Some(None) => errors.add("author", violation("required", "Author cannot be null".into())),
            None => {}
        }
        if let Some(Some(year)) = self.published_year {
            check_published_year(&mut errors, year);
        }
        if let Some(None) = self.available {
            errors.add(
                "available",
                violation("required", "Available cannot be null".into()),
            );
        }

        if errors.errors().is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Author/genre filter used by search. Both terms are case-insensitive,
/// unanchored substrings; when both are set a record must match both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchCriteria {
    pub author: Option<String>,
    pub genre: Option<String>,
}

impl SearchCriteria {
    /// Blank terms count as absent
    pub fn new(author: Option<String>, genre: Option<String>) -> Self {
        Self {
            author: author.filter(|s| !s.is_empty()),
            genre: genre.filter(|s| !s.is_empty()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.author.is_none() && self.genre.is_none()
    }

    /// In-process evaluation of the filter against a record
    pub fn matches(&self, book: &Book) -> bool {
        fn contains(haystack: Option<&str>, needle: &str) -> bool {
            haystack
                .map(|h| h.to_lowercase().contains(&needle.to_lowercase()))
                .unwrap_or(false)
        }

        let author_ok = self
            .author
            .as_deref()
            .map_or(true, |term| contains(Some(&book.author), term));
        let genre_ok = self
            .genre
            .as_deref()
            .map_or(true, |term| contains(book.genre.as_deref(), term));

        author_ok && genre_ok
    }
}
