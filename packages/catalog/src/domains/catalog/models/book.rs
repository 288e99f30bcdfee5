use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Book model - SQL persistence layer
///
/// Metadata fields (isbn, google_books_id, page_count, categories) come from
/// the external book search and are optional; title and author are the only
/// required inputs.
#[derive(sqlx::FromRow, Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub publication_year: Option<i32>,
    pub cover_image: Option<String>,
    pub isbn: Option<String>,
    pub google_books_id: Option<String>,
    pub description: Option<String>,
    pub page_count: Option<i32>,
    pub categories: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
}

impl Book {
    /// All books, ordered by title
    pub async fn find_all(pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM books ORDER BY title")
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }

    /// Find book by ID
    pub async fn find_by_id(id: Uuid, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Insert new book
    pub async fn insert(&self, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO books (
                title,
                author,
                publication_year,
                cover_image,
                isbn,
                google_books_id,
                description,
                page_count,
                categories
             )
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING *",
        )
        .bind(&self.title)
        .bind(&self.author)
        .bind(self.publication_year)
        .bind(&self.cover_image)
        .bind(&self.isbn)
        .bind(&self.google_books_id)
        .bind(&self.description)
        .bind(self.page_count)
        .bind(&self.categories)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Update all editable fields of an existing book
    pub async fn update(&self, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "UPDATE books
             SET title = $2,
                 author = $3,
                 publication_year = $4,
                 cover_image = $5,
                 isbn = $6,
                 google_books_id = $7,
                 description = $8,
                 page_count = $9,
                 categories = $10
             WHERE id = $1
             RETURNING *",
        )
        .bind(self.id)
        .bind(&self.title)
        .bind(&self.author)
        .bind(self.publication_year)
        .bind(&self.cover_image)
        .bind(&self.isbn)
        .bind(&self.google_books_id)
        .bind(&self.description)
        .bind(self.page_count)
        .bind(&self.categories)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Delete book (recommendations cascade in the schema)
    pub async fn delete(id: Uuid, pool: &PgPool) -> Result<()> {
        sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }
}
