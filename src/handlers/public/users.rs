use axum::{response::IntoResponse, Json};
use serde::Deserialize;
use validator::Validate;

use crate::auth::{self, password};
use crate::database::manager::DatabaseManager;
use crate::database::models::AuthToken;
use crate::database::UserStore;
use crate::error::ApiError;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 6, message = "must be at least 6 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub password: String,
}

/// POST /users - register a new account
///
/// Validates the payload, stores the user with a salted password hash and an
/// empty token list, then logs the new account straight in: a fresh token is
/// appended to the list and returned in the `x-auth` response header.
pub async fn register(
    Json(mut payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload.email = payload.email.trim().to_string();
    payload.validate()?;

    let pool = DatabaseManager::pool().await?;
    let users = UserStore::new(pool);

    let password_hash = password::hash_password(&payload.password)?;
    let user = users.insert(&payload.email, &password_hash).await?;

    let token = auth::generate_token(user.id)?;
    users.push_token(user.id, &AuthToken::auth(token.clone())).await?;

    Ok(([("x-auth", token)], Json(user.public())))
}

/// POST /users/login - authenticate and receive a new auth token
///
/// A missing user and a wrong password produce the same error, so the
/// response never confirms whether an email is registered. Each login
/// appends its own token; sessions on other devices stay valid.
pub async fn login(Json(payload): Json<LoginRequest>) -> Result<impl IntoResponse, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let users = UserStore::new(pool);

    let user = users
        .find_by_email(payload.email.trim())
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    if !password::verify_password(&payload.password, &user.password_hash)? {
        return Err(ApiError::InvalidCredentials);
    }

    let token = auth::generate_token(user.id)?;
    users.push_token(user.id, &AuthToken::auth(token.clone())).await?;

    Ok(([("x-auth", token)], Json(user.public())))
}
