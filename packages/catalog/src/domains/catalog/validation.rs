//! Input validation for catalog write paths
//!
//! Field limits mirror the database schema; validated here so callers get a
//! structured error instead of a constraint violation.

use chrono::{Datelike, Utc};
use thiserror::Error;

use crate::domains::catalog::models::{Book, Recommendation};

pub const MAX_TITLE_LENGTH: usize = 500;
pub const MAX_AUTHOR_LENGTH: usize = 200;
pub const MAX_DESCRIPTION_LENGTH: usize = 2000;
pub const MAX_NOTES_LENGTH: usize = 1000;
pub const MIN_PUBLICATION_YEAR: i32 = 1000;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("publication year must be between {MIN_PUBLICATION_YEAR} and next year")]
    PublicationYearOutOfRange,

    #[error("ISBN must be 10 or 13 digits")]
    InvalidIsbn,

    #[error("cover image must be an http(s) URL")]
    InvalidCoverUrl,

    #[error("rating must be between 1 and 5")]
    RatingOutOfRange,
}

/// Validate a book before insert or update.
pub fn validate_book(book: &Book) -> Result<(), ValidationError> {
    require_trimmed("title", &book.title, MAX_TITLE_LENGTH)?;
    require_trimmed("author", &book.author, MAX_AUTHOR_LENGTH)?;

    if let Some(year) = book.publication_year {
        let next_year = Utc::now().year() + 1;
        if year < MIN_PUBLICATION_YEAR || year > next_year {
            return Err(ValidationError::PublicationYearOutOfRange);
        }
    }

    if let Some(isbn) = book.isbn.as_deref() {
        if !is_valid_isbn(isbn) {
            return Err(ValidationError::InvalidIsbn);
        }
    }

    if let Some(url) = book.cover_image.as_deref() {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ValidationError::InvalidCoverUrl);
        }
    }

    if let Some(description) = book.description.as_deref() {
        if description.chars().count() > MAX_DESCRIPTION_LENGTH {
            return Err(ValidationError::TooLong {
                field: "description",
                max: MAX_DESCRIPTION_LENGTH,
            });
        }
    }

    Ok(())
}

/// Validate a recommendation before insert or update.
pub fn validate_recommendation(recommendation: &Recommendation) -> Result<(), ValidationError> {
    if let Some(notes) = recommendation.notes.as_deref() {
        if notes.chars().count() > MAX_NOTES_LENGTH {
            return Err(ValidationError::TooLong {
                field: "notes",
                max: MAX_NOTES_LENGTH,
            });
        }
    }

    if let Some(rating) = recommendation.rating {
        if !(1..=5).contains(&rating) {
            return Err(ValidationError::RatingOutOfRange);
        }
    }

    Ok(())
}

fn require_trimmed(
    field: &'static str,
    value: &str,
    max: usize,
) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required { field });
    }
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(())
}

fn is_valid_isbn(isbn: &str) -> bool {
    (isbn.len() == 10 || isbn.len() == 13) && isbn.bytes().all(|b| b.is_ascii_digit())
}
