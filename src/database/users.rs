use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{AuthToken, User};

/// Data access for the `users` collection.
pub struct UserStore {
    pool: PgPool,
}

impl UserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new user with an empty token list. A unique violation on the
    /// email index surfaces through `DatabaseError::is_unique_violation`.
    pub async fn insert(&self, email: &str, password_hash: &str) -> Result<User, DatabaseError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, email, password_hash, tokens)
            VALUES ($1, $2, $3, '[]'::jsonb)
            RETURNING id, email, password_hash, tokens, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, tokens, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Resolve a user by id, requiring that the exact token string is still
    /// present in their stored token list. A revoked token resolves nothing
    /// even when its signature is valid.
    pub async fn find_by_id_with_token(
        &self,
        id: Uuid,
        token: &str,
    ) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, tokens, created_at, updated_at
            FROM users
            WHERE id = $1 AND tokens @> $2::jsonb
            "#,
        )
        .bind(id)
        .bind(json!([{ "kind": "auth", "token": token }]))
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Append a token to the user's list (multi-device login).
    pub async fn push_token(&self, id: Uuid, token: &AuthToken) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            UPDATE users
            SET tokens = tokens || $2::jsonb, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(json!([token]))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Remove one exact token string from the user's list. Removing a token
    /// that is already gone is not an error.
    pub async fn pull_token(&self, id: Uuid, token: &str) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            UPDATE users
            SET tokens = COALESCE(
                    (SELECT jsonb_agg(t)
                     FROM jsonb_array_elements(tokens) AS t
                     WHERE t->>'token' <> $2),
                    '[]'::jsonb),
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(token)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
