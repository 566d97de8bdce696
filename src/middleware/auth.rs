use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::auth;
use crate::database::manager::DatabaseManager;
use crate::database::models::User;
use crate::database::UserStore;
use crate::error::ApiError;

/// Authenticated request context: the resolved user plus the exact token
/// string the request presented, for later revocation.
#[derive(Clone, Debug)]
pub struct AuthSession {
    pub user: User,
    pub token: String,
}

/// Token authentication middleware for protected routes.
///
/// Verifies the `x-auth` header signature, then resolves the user with the
/// token still present in their stored list. Both checks must pass; the
/// second is what makes logout effective, since the codec alone cannot
/// expire a token. Any failure ends the request with an empty-bodied 401.
pub async fn require_auth(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = headers
        .get("x-auth")
        .and_then(|value| value.to_str().ok())
        .ok_or(ApiError::Unauthorized)?;

    let user_id = auth::verify_token(token).map_err(|_| ApiError::Unauthorized)?;

    let pool = DatabaseManager::pool().await?;
    let user = UserStore::new(pool)
        .find_by_id_with_token(user_id, token)
        .await?
        .ok_or(ApiError::Unauthorized)?;

    request.extensions_mut().insert(AuthSession {
        user,
        token: token.to_string(),
    });

    Ok(next.run(request).await)
}
