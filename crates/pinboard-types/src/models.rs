use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Public view of a user. The password hash never leaves the database layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub published: bool,
    pub owner_id: i64,
    pub created_at: DateTime<Utc>,
    pub owner: User,
}
