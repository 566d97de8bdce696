use axum::{extract::Extension, http::StatusCode, Json};

use crate::database::manager::DatabaseManager;
use crate::database::models::PublicUser;
use crate::database::UserStore;
use crate::error::ApiError;
use crate::middleware::AuthSession;

/// GET /users/me - current authenticated identity
pub async fn whoami(Extension(session): Extension<AuthSession>) -> Json<PublicUser> {
    Json(session.user.public())
}

/// DELETE /users/me/token - revoke the presented token
///
/// Removes exactly the token this request authenticated with; tokens from
/// other logins are untouched. Idempotent: a token already gone still
/// answers 200.
pub async fn logout(Extension(session): Extension<AuthSession>) -> Result<StatusCode, ApiError> {
    let pool = DatabaseManager::pool().await?;
    UserStore::new(pool)
        .pull_token(session.user.id, &session.token)
        .await?;

    Ok(StatusCode::OK)
}
