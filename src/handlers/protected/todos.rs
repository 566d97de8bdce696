use axum::{
    extract::{Extension, Path},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::manager::DatabaseManager;
use crate::database::models::Todo;
use crate::database::TodoStore;
use crate::error::ApiError;
use crate::middleware::AuthSession;

#[derive(Debug, Deserialize)]
pub struct CreateTodoRequest {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTodoRequest {
    pub text: Option<String>,
    pub completed: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct TodoBody {
    pub todo: Todo,
}

#[derive(Debug, Serialize)]
pub struct TodoListBody {
    pub todos: Vec<Todo>,
}

/// Malformed ids resolve to NotFound, same as absent or non-owned records.
/// A 400 here would reveal which id strings are syntactically plausible.
fn parse_todo_id(id: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(id).map_err(|_| ApiError::NotFound)
}

/// POST /todos - create a todo owned by the caller
pub async fn collection_post(
    Extension(session): Extension<AuthSession>,
    Json(payload): Json<CreateTodoRequest>,
) -> Result<Json<Todo>, ApiError> {
    let text = payload.text.trim();
    if text.is_empty() {
        return Err(ApiError::field_error("text", "must not be empty"));
    }

    let pool = DatabaseManager::pool().await?;
    let todo = TodoStore::new(pool).insert(session.user.id, text).await?;

    Ok(Json(todo))
}

/// GET /todos - list the caller's todos
pub async fn collection_get(
    Extension(session): Extension<AuthSession>,
) -> Result<Json<TodoListBody>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let todos = TodoStore::new(pool).list_by_owner(session.user.id).await?;

    Ok(Json(TodoListBody { todos }))
}

/// GET /todos/:id - show a single todo
pub async fn record_get(
    Extension(session): Extension<AuthSession>,
    Path(id): Path<String>,
) -> Result<Json<TodoBody>, ApiError> {
    let id = parse_todo_id(&id)?;

    let pool = DatabaseManager::pool().await?;
    let todo = TodoStore::new(pool)
        .find_owned(id, session.user.id)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(TodoBody { todo }))
}

/// PATCH /todos/:id - partial update
///
/// Completion state drives the timestamp: flipping to completed stamps the
/// current time, flipping to incomplete clears it no matter what the client
/// sent, and an update that leaves `completed` out leaves the stamp alone.
pub async fn record_patch(
    Extension(session): Extension<AuthSession>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateTodoRequest>,
) -> Result<Json<TodoBody>, ApiError> {
    let id = parse_todo_id(&id)?;

    let text = match &payload.text {
        Some(text) => {
            let text = text.trim();
            if text.is_empty() {
                return Err(ApiError::field_error("text", "must not be empty"));
            }
            Some(text.to_string())
        }
        None => None,
    };

    let completed_at = match payload.completed {
        Some(true) => Some(Utc::now().timestamp_millis()),
        _ => None,
    };

    let pool = DatabaseManager::pool().await?;
    let todo = TodoStore::new(pool)
        .update_owned(
            id,
            session.user.id,
            text.as_deref(),
            payload.completed,
            completed_at,
        )
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(TodoBody { todo }))
}

/// DELETE /todos/:id - remove a todo and return its last state
pub async fn record_delete(
    Extension(session): Extension<AuthSession>,
    Path(id): Path<String>,
) -> Result<Json<TodoBody>, ApiError> {
    let id = parse_todo_id(&id)?;

    let pool = DatabaseManager::pool().await?;
    let todo = TodoStore::new(pool)
        .delete_owned(id, session.user.id)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(TodoBody { todo }))
}
