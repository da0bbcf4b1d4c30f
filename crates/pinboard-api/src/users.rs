use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use pinboard_types::api::CreateUserRequest;

use crate::AppState;
use crate::convert;
use crate::error::ApiError;

pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_email(&req.email)?;
    if req.password.len() < 8 {
        return Err(ApiError::Validation(
            "password must be at least 8 characters".to_string(),
        ));
    }

    if state.db.get_user_by_email(&req.email)?.is_some() {
        return Err(ApiError::Conflict(format!(
            "user with email: {} already exists",
            req.email
        )));
    }

    // Argon2id with a fresh random salt; the plaintext never leaves this
    // handler.
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(req.password.as_bytes(), &salt)
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("password hashing failed: {}", e)))?
        .to_string();

    let row = state.db.create_user(&req.email, &password_hash)?;

    Ok((StatusCode::CREATED, Json(convert::user_from_row(row))))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let row = state
        .db
        .get_user_by_id(id)?
        .ok_or_else(|| ApiError::NotFound(format!("user with id: {} not found", id)))?;

    Ok(Json(convert::user_from_row(row)))
}

/// Structural check only: one '@', non-empty local part, dotted domain.
fn validate_email(email: &str) -> Result<(), ApiError> {
    let ok = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    };

    if ok {
        Ok(())
    } else {
        Err(ApiError::Validation(format!(
            "'{}' is not a valid email address",
            email
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::validate_email;

    #[test]
    fn accepts_plain_addresses() {
        assert!(validate_email("user@example.com").is_ok());
        assert!(validate_email("a.b+c@sub.example.org").is_ok());
    }

    #[test]
    fn rejects_malformed_addresses() {
        for bad in ["", "plain", "@example.com", "user@", "user@nodot", "user@.com", "a b@x.com"] {
            assert!(validate_email(bad).is_err(), "should reject {:?}", bad);
        }
    }
}
