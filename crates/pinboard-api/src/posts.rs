use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;

use pinboard_types::api::{PostPayload, PostWithVotes};
use pinboard_types::models::Post;

use crate::AppState;
use crate::convert;
use crate::error::ApiError;
use crate::middleware::{CurrentUser, MaybeUser};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub search: String,
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub skip: u32,
}

fn default_limit() -> u32 {
    10
}

pub async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
    Extension(MaybeUser(_viewer)): Extension<MaybeUser>,
) -> Result<Json<Vec<PostWithVotes>>, ApiError> {
    // Run the blocking aggregate query off the async runtime
    let db = state.clone();
    let search = query.search;
    let limit = query.limit.min(100);
    let skip = query.skip;

    let rows = tokio::task::spawn_blocking(move || db.db.list_posts(&search, limit, skip))
        .await
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("spawn_blocking join error: {}", e)))??;

    let posts = rows.into_iter().map(convert::post_with_votes).collect();
    Ok(Json(posts))
}

pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Extension(MaybeUser(_viewer)): Extension<MaybeUser>,
) -> Result<Json<PostWithVotes>, ApiError> {
    let row = state
        .db
        .get_post_with_votes(id)?
        .ok_or_else(|| ApiError::NotFound(format!("post with id: {} not found", id)))?;

    Ok(Json(convert::post_with_votes(row)))
}

pub async fn create_post(
    State(state): State<AppState>,
    Extension(CurrentUser(owner)): Extension<CurrentUser>,
    Json(payload): Json<PostPayload>,
) -> Result<impl IntoResponse, ApiError> {
    // owner_id comes from the verified token, never from the payload.
    let row = state
        .db
        .insert_post(&payload.title, &payload.content, payload.published, owner.id)?;

    Ok((StatusCode::CREATED, Json(convert::post_from_row(row, owner))))
}

pub async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    Json(payload): Json<PostPayload>,
) -> Result<Json<Post>, ApiError> {
    let existing = state
        .db
        .get_post(id)?
        .ok_or_else(|| ApiError::NotFound(format!("post with id: {} not found", id)))?;

    if existing.owner_id != actor.id {
        return Err(ApiError::Forbidden);
    }

    let row = state
        .db
        .update_post(id, &payload.title, &payload.content, payload.published)?;

    Ok(Json(convert::post_from_row(row, actor)))
}

pub async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
) -> Result<StatusCode, ApiError> {
    let existing = state
        .db
        .get_post(id)?
        .ok_or_else(|| ApiError::NotFound(format!("post with id: {} not found", id)))?;

    if existing.owner_id != actor.id {
        return Err(ApiError::Forbidden);
    }

    state.db.delete_post(id)?;

    Ok(StatusCode::NO_CONTENT)
}
