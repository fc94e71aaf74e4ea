//! Creation store.
//!
//! Append-only: rows are never updated after insert except for the
//! `likes` array, which is toggled in a single statement so concurrent
//! taps stay consistent.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::creation::{Creation, NewCreation};

/// Storage seam for creations
#[async_trait]
pub trait CreationStore: Send + Sync {
    /// Insert a new creation, never overwriting an existing row
    async fn append(&self, new: NewCreation) -> Result<Creation>;

    /// All creations owned by a user, newest first
    async fn list_by_owner(&self, user_id: &str) -> Result<Vec<Creation>>;

    /// All published creations (the community feed), newest first
    async fn list_published(&self) -> Result<Vec<Creation>>;

    /// Idempotent per-(creation, user) like toggle, returning the updated row
    async fn toggle_like(&self, id: Uuid, user_id: &str) -> Result<Creation>;
}

/// Postgres-backed creation store
pub struct PgCreationStore {
    db: PgPool,
}

impl PgCreationStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CreationStore for PgCreationStore {
    async fn append(&self, new: NewCreation) -> Result<Creation> {
        let creation = sqlx::query_as::<_, Creation>(
            r#"
            INSERT INTO creations (user_id, prompt, content, type, publish)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, prompt, content, type, publish, likes, created_at
            "#,
        )
        .bind(&new.user_id)
        .bind(&new.prompt)
        .bind(&new.content)
        .bind(new.kind)
        .bind(new.publish)
        .fetch_one(&self.db)
        .await?;

        Ok(creation)
    }

    async fn list_by_owner(&self, user_id: &str) -> Result<Vec<Creation>> {
        let creations = sqlx::query_as::<_, Creation>(
            r#"
            SELECT id, user_id, prompt, content, type, publish, likes, created_at
            FROM creations
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(creations)
    }

    async fn list_published(&self) -> Result<Vec<Creation>> {
        let creations = sqlx::query_as::<_, Creation>(
            r#"
            SELECT id, user_id, prompt, content, type, publish, likes, created_at
            FROM creations
            WHERE publish = true
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(creations)
    }

    async fn toggle_like(&self, id: Uuid, user_id: &str) -> Result<Creation> {
        sqlx::query_as::<_, Creation>(
            r#"
            UPDATE creations
            SET likes = CASE
                WHEN $2::text = ANY(likes) THEN array_remove(likes, $2::text)
                ELSE array_append(likes, $2::text)
            END
            WHERE id = $1
            RETURNING id, user_id, prompt, content, type, publish, likes, created_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Creation not found".to_string()))
    }
}
