use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::Todo;

/// Data access for the `todos` collection. Every read or mutation of an
/// individual record filters by id AND owner in the same query, so a
/// non-owned record is indistinguishable from an absent one.
pub struct TodoStore {
    pool: PgPool,
}

impl TodoStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, owner: Uuid, text: &str) -> Result<Todo, DatabaseError> {
        let todo = sqlx::query_as::<_, Todo>(
            r#"
            INSERT INTO todos (id, text, owner)
            VALUES ($1, $2, $3)
            RETURNING id, text, completed, completed_at, owner, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(text)
        .bind(owner)
        .fetch_one(&self.pool)
        .await?;

        Ok(todo)
    }

    /// All todos owned by the caller, in insertion order.
    pub async fn list_by_owner(&self, owner: Uuid) -> Result<Vec<Todo>, DatabaseError> {
        let todos = sqlx::query_as::<_, Todo>(
            r#"
            SELECT id, text, completed, completed_at, owner, created_at, updated_at
            FROM todos
            WHERE owner = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        Ok(todos)
    }

    pub async fn find_owned(&self, id: Uuid, owner: Uuid) -> Result<Option<Todo>, DatabaseError> {
        let todo = sqlx::query_as::<_, Todo>(
            r#"
            SELECT id, text, completed, completed_at, owner, created_at, updated_at
            FROM todos
            WHERE id = $1 AND owner = $2
            "#,
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;

        Ok(todo)
    }

    /// Partial update. `completed_at` is only touched when `completed` is
    /// part of the update; the handler decides its value from the transition.
    pub async fn update_owned(
        &self,
        id: Uuid,
        owner: Uuid,
        text: Option<&str>,
        completed: Option<bool>,
        completed_at: Option<i64>,
    ) -> Result<Option<Todo>, DatabaseError> {
        let todo = sqlx::query_as::<_, Todo>(
            r#"
            UPDATE todos
            SET text = COALESCE($3, text),
                completed = COALESCE($4, completed),
                completed_at = CASE WHEN $4 IS NULL THEN completed_at ELSE $5 END,
                updated_at = now()
            WHERE id = $1 AND owner = $2
            RETURNING id, text, completed, completed_at, owner, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(owner)
        .bind(text)
        .bind(completed)
        .bind(completed_at)
        .fetch_optional(&self.pool)
        .await?;

        Ok(todo)
    }

    /// Remove a record and hand back its last representation.
    pub async fn delete_owned(&self, id: Uuid, owner: Uuid) -> Result<Option<Todo>, DatabaseError> {
        let todo = sqlx::query_as::<_, Todo>(
            r#"
            DELETE FROM todos
            WHERE id = $1 AND owner = $2
            RETURNING id, text, completed, completed_at, owner, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;

        Ok(todo)
    }
}
