use serde::{Deserialize, Serialize};

use crate::models::Post;

// -- JWT Claims --

/// JWT claims carried by every access token. Canonical definition lives here
/// in pinboard-types so the token service and the middleware agree on the
/// wire format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i64,
    pub exp: usize,
}

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

// -- Posts --

/// Body for both POST /posts and PUT /posts/{id}. The owner is always taken
/// from the authenticated caller, never from the payload.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PostPayload {
    pub title: String,
    pub content: String,
    #[serde(default = "default_published")]
    pub published: bool,
}

fn default_published() -> bool {
    true
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PostWithVotes {
    pub post: Post,
    pub votes: i64,
}

// -- Votes --

/// dir = 1 casts a vote, dir = 0 removes one. Any other value is rejected.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VoteRequest {
    pub post_id: i64,
    pub dir: i64,
}
