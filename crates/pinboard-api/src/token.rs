use jsonwebtoken::{
    DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use thiserror::Error;

use pinboard_types::api::Claims;

/// Signing algorithm is fixed at HS256; only the secret and lifetime are
/// configurable.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token is malformed or its signature is invalid")]
    Invalid,
    #[error("token has expired")]
    Expired,
}

pub fn issue(secret: &str, ttl_minutes: i64, user_id: i64) -> anyhow::Result<String> {
    let claims = Claims {
        user_id,
        exp: (chrono::Utc::now() + chrono::Duration::minutes(ttl_minutes)).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

pub fn verify(secret: &str, token: &str) -> Result<i64, TokenError> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Invalid,
    })?;

    Ok(data.claims.user_id)
}
