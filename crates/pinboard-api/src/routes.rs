use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
};

use crate::middleware::{optional_auth, require_auth};
use crate::{AppState, auth, posts, users, votes};

/// Assemble the full HTTP surface. Read endpoints carry the optional-auth
/// layer so anonymous callers are still served; mutating endpoints require a
/// resolved user.
pub fn router(state: AppState) -> Router {
    let public = Router::new()
        .route("/login", post(auth::login))
        .route("/users", post(users::create_user))
        .route("/users/{id}", get(users::get_user))
        .with_state(state.clone());

    let read = Router::new()
        .route("/posts", get(posts::list_posts))
        .route("/posts/{id}", get(posts::get_post))
        .layer(from_fn_with_state(state.clone(), optional_auth))
        .with_state(state.clone());

    let protected = Router::new()
        .route("/posts", post(posts::create_post))
        .route("/posts/{id}", put(posts::update_post))
        .route("/posts/{id}", delete(posts::delete_post))
        .route("/vote", post(votes::cast_vote))
        .layer(from_fn_with_state(state.clone(), require_auth))
        .with_state(state);

    Router::new().merge(public).merge(read).merge(protected)
}
