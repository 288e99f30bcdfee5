use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Family member model - SQL persistence layer
///
/// The roster is the allow-list for the whole application: a login with no
/// row here gets no access. `auth_user_id` is null until the member's first
/// successful sign-in links them to the external auth service; both it and
/// `email` are unique.
#[derive(sqlx::FromRow, Debug, Clone, Serialize, Deserialize)]
pub struct FamilyMember {
    pub id: Uuid,
    pub auth_user_id: Option<String>,
    pub email: String,
    pub name: String,
    pub avatar_url: Option<String>,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl FamilyMember {
    /// Find member by ID
    pub async fn find_by_id(id: Uuid, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM family_members WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// All members, ordered by name
    pub async fn find_all(pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM family_members ORDER BY name")
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }

    /// Member linked to an external auth user id
    pub async fn find_by_auth_user_id(auth_user_id: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM family_members WHERE auth_user_id = $1")
            .bind(auth_user_id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Pre-registered member by email (unique)
    pub async fn find_by_email(email: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM family_members WHERE email = $1")
            .bind(email)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Record the external user id on a not-yet-linked member.
    ///
    /// Conditional single-row update: returns None when the row is already
    /// linked, so a concurrent link from another device cannot be overwritten.
    pub async fn link_auth_user(
        id: Uuid,
        auth_user_id: &str,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "UPDATE family_members
             SET auth_user_id = $2
             WHERE id = $1
               AND auth_user_id IS NULL
             RETURNING *",
        )
        .bind(id)
        .bind(auth_user_id)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }
}
