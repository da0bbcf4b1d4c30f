use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;

use pinboard_types::api::VoteRequest;

use crate::AppState;
use crate::error::ApiError;
use crate::middleware::CurrentUser;

/// POST /vote — dir = 1 casts the caller's vote, dir = 0 removes it. At most
/// one vote per (post, user).
pub async fn cast_vote(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(req): Json<VoteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.dir != 0 && req.dir != 1 {
        return Err(ApiError::Validation(format!(
            "dir must be 0 or 1, got {}",
            req.dir
        )));
    }

    if state.db.get_post(req.post_id)?.is_none() {
        return Err(ApiError::NotFound(format!(
            "post with id: {} not found",
            req.post_id
        )));
    }

    if req.dir == 1 {
        if state.db.vote_exists(req.post_id, user.id)? {
            return Err(ApiError::Conflict(format!(
                "user {} has already voted on post {}",
                user.id, req.post_id
            )));
        }
        state.db.insert_vote(req.post_id, user.id)?;

        Ok((
            StatusCode::CREATED,
            Json(json!({ "detail": "successfully added vote" })),
        ))
    } else {
        if !state.db.vote_exists(req.post_id, user.id)? {
            return Err(ApiError::NotFound("vote does not exist".to_string()));
        }
        state.db.delete_vote(req.post_id, user.id)?;

        Ok((
            StatusCode::CREATED,
            Json(json!({ "detail": "successfully deleted vote" })),
        ))
    }
}
