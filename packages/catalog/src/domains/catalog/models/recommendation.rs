use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Recommendation model - SQL persistence layer
///
/// One family member recommending one book for one academic year.
#[derive(sqlx::FromRow, Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: Uuid,
    pub book_id: Uuid,
    pub family_member_id: Uuid,
    pub year_id: Uuid,
    pub notes: Option<String>,
    pub rating: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Recommendation with the display fields of its book, member, and year
/// joined in. Matches what the list and year-detail views render.
#[derive(sqlx::FromRow, Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationDetail {
    pub id: Uuid,
    pub book_id: Uuid,
    pub family_member_id: Uuid,
    pub year_id: Uuid,
    pub notes: Option<String>,
    pub rating: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub book_title: String,
    pub book_author: String,
    pub book_cover_image: Option<String>,
    pub member_name: String,
    pub academic_year: String,
}

const DETAIL_SELECT: &str = "SELECT r.id,
            r.book_id,
            r.family_member_id,
            r.year_id,
            r.notes,
            r.rating,
            r.created_at,
            b.title AS book_title,
            b.author AS book_author,
            b.cover_image AS book_cover_image,
            m.name AS member_name,
            y.academic_year
     FROM recommendations r
     JOIN books b ON b.id = r.book_id
     JOIN family_members m ON m.id = r.family_member_id
     JOIN years y ON y.id = r.year_id";

impl Recommendation {
    /// All recommendations, newest first
    pub async fn find_all(pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM recommendations ORDER BY created_at DESC")
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }

    /// Recommendations for one academic year, newest first
    pub async fn find_by_year(year_id: Uuid, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM recommendations WHERE year_id = $1 ORDER BY created_at DESC",
        )
        .bind(year_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Insert new recommendation
    pub async fn insert(&self, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO recommendations (book_id, family_member_id, year_id, notes, rating)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING *",
        )
        .bind(self.book_id)
        .bind(self.family_member_id)
        .bind(self.year_id)
        .bind(&self.notes)
        .bind(self.rating)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Update notes and rating
    pub async fn update(id: Uuid, notes: Option<&str>, rating: Option<i32>, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "UPDATE recommendations
             SET notes = $2,
                 rating = $3,
                 updated_at = now()
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(notes)
        .bind(rating)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Delete recommendation
    pub async fn delete(id: Uuid, pool: &PgPool) -> Result<()> {
        sqlx::query("DELETE FROM recommendations WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }
}

impl RecommendationDetail {
    /// All recommendations with display fields, newest first
    pub async fn find_all(pool: &PgPool) -> Result<Vec<Self>> {
        let query = format!("{DETAIL_SELECT} ORDER BY r.created_at DESC");
        sqlx::query_as::<_, Self>(&query)
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }

    /// Recommendations for one academic year with display fields, newest first
    pub async fn find_by_year(year_id: Uuid, pool: &PgPool) -> Result<Vec<Self>> {
        let query = format!("{DETAIL_SELECT} WHERE r.year_id = $1 ORDER BY r.created_at DESC");
        sqlx::query_as::<_, Self>(&query)
            .bind(year_id)
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }
}
