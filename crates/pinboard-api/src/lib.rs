pub mod auth;
mod convert;
pub mod error;
pub mod middleware;
pub mod posts;
pub mod routes;
pub mod token;
pub mod users;
pub mod votes;

use std::sync::Arc;

use pinboard_db::Database;

pub type AppState = Arc<AppStateInner>;

/// Everything the handlers need, built once in main and injected through
/// axum state. No globals.
pub struct AppStateInner {
    pub db: Database,
    pub jwt_secret: String,
    pub token_expire_minutes: i64,
}
