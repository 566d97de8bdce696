use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config;

pub mod password;

/// Role marker baked into every auth token. Tokens with any other value are
/// rejected even when the signature checks out.
const ACCESS_AUTH: &str = "auth";

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub access: String,
    // Unique per issuance, so two logins in the same second still produce
    // distinct token strings and revoke independently.
    pub jti: Uuid,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_id: Uuid) -> Self {
        Self {
            sub: user_id,
            access: ACCESS_AUTH.to_string(),
            jti: Uuid::new_v4(),
            iat: chrono::Utc::now().timestamp(),
        }
    }
}

#[derive(Debug)]
pub enum TokenError {
    Generation(String),
    Invalid,
    MissingSecret,
}

impl std::fmt::Display for TokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenError::Generation(msg) => write!(f, "token generation error: {}", msg),
            TokenError::Invalid => write!(f, "invalid token"),
            TokenError::MissingSecret => write!(f, "token secret not configured"),
        }
    }
}

impl std::error::Error for TokenError {}

/// Sign an opaque auth token binding the given user id.
///
/// The token carries no expiry; revocation happens by removing the token
/// string from the user's stored token list.
pub fn generate_token(user_id: Uuid) -> Result<String, TokenError> {
    let secret = &config::config().security.token_secret;

    if secret.is_empty() {
        return Err(TokenError::MissingSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    let header = Header::default();

    encode(&header, &Claims::new(user_id), &encoding_key)
        .map_err(|e| TokenError::Generation(e.to_string()))
}

/// Verify a token and extract the user id it binds.
///
/// Fails on signature mismatch, malformed structure, decoding error, or a
/// wrong role marker. Expiry is not validated since tokens carry none.
pub fn verify_token(token: &str) -> Result<Uuid, TokenError> {
    let secret = &config::config().security.token_secret;

    if secret.is_empty() {
        return Err(TokenError::MissingSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::default();
    validation.validate_exp = false;
    validation.required_spec_claims.clear();

    let token_data =
        decode::<Claims>(token, &decoding_key, &validation).map_err(|_| TokenError::Invalid)?;

    if token_data.claims.access != ACCESS_AUTH {
        return Err(TokenError::Invalid);
    }

    Ok(token_data.claims.sub)
}
