use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use pinboard_types::models::User;

use crate::AppState;
use crate::convert;
use crate::error::ApiError;
use crate::token;

/// Resolved identity of an authenticated caller.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Viewer identity for endpoints that also serve anonymous callers.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<User>);

/// Extract and verify the bearer token, then resolve it against the user
/// store. Both middlewares share this; they differ only in what a failed
/// authentication means.
fn authenticate(state: &AppState, req: &Request) -> Result<User, ApiError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(ApiError::Unauthorized)?;

    let raw = auth_header
        .strip_prefix("Bearer ")
        .ok_or(ApiError::Unauthorized)?;

    let user_id = token::verify(&state.jwt_secret, raw).map_err(|_| ApiError::Unauthorized)?;

    // Tokens are never revoked, but the user they name must still exist.
    let row = state
        .db
        .get_user_by_id(user_id)?
        .ok_or(ApiError::Unauthorized)?;

    Ok(convert::user_from_row(row))
}

pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = authenticate(&state, &req)?;
    req.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(req).await)
}

/// Same verification as `require_auth`, but a missing or invalid token makes
/// the caller anonymous instead of failing the request.
pub async fn optional_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let viewer = match authenticate(&state, &req) {
        Ok(user) => Some(user),
        Err(ApiError::Unauthorized) => None,
        Err(e) => return Err(e),
    };
    req.extensions_mut().insert(MaybeUser(viewer));
    Ok(next.run(req).await)
}
