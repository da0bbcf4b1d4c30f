use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::{Json, extract::State};

use pinboard_types::api::{LoginRequest, TokenResponse};

use crate::AppState;
use crate::error::ApiError;
use crate::token;

/// POST /login — verify credentials and mint an access token. Unknown email
/// and wrong password are indistinguishable to the caller.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let user = state
        .db
        .get_user_by_email(&req.email)?
        .ok_or(ApiError::Unauthorized)?;

    let parsed_hash = PasswordHash::new(&user.password).map_err(|e| {
        ApiError::Internal(anyhow::anyhow!(
            "stored hash unreadable for user {}: {}",
            user.id,
            e
        ))
    })?;

    Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed_hash)
        .map_err(|_| ApiError::Unauthorized)?;

    let access_token = token::issue(&state.jwt_secret, state.token_expire_minutes, user.id)?;

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}
