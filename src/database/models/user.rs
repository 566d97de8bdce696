use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// One revocable session credential on a user record. A user holds zero or
/// more at once (one per logged-in device).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthToken {
    pub kind: String,
    pub token: String,
}

impl AuthToken {
    pub fn auth(token: impl Into<String>) -> Self {
        Self {
            kind: "auth".to_string(),
            token: token.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,

    #[serde(skip_serializing)] // never send password hash in API responses
    pub password_hash: String,

    #[serde(skip_serializing)] // token list is server-side state
    pub tokens: Json<Vec<AuthToken>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The only user fields ever exposed over the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub email: String,
}

impl User {
    pub fn public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            email: self.email.clone(),
        }
    }
}
