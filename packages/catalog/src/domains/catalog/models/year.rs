use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Academic year model - SQL persistence layer
///
/// `academic_year` is the display label, e.g. "2025-2026". At most one year
/// is active at a time; new recommendations default to it.
#[derive(sqlx::FromRow, Debug, Clone, Serialize, Deserialize)]
pub struct Year {
    pub id: Uuid,
    pub academic_year: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Year {
    /// All years, newest first
    pub async fn find_all(pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM years ORDER BY academic_year DESC")
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }

    /// Find year by ID
    pub async fn find_by_id(id: Uuid, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM years WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// The currently active year, if one is set
    pub async fn find_active(pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM years WHERE is_active = true")
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }
}
