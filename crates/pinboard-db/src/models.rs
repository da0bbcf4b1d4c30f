/// Database row types — these map directly to SQLite rows.
/// Distinct from the pinboard-types API models to keep the DB layer
/// independent.

#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: i64,
    pub email: String,
    pub password: String,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct PostRow {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub published: bool,
    pub owner_id: i64,
    pub created_at: String,
}

/// One row of the aggregate post listing: the post, its owner's public
/// columns, and the vote count from the grouped LEFT JOIN.
#[derive(Debug, Clone)]
pub struct PostVoteRow {
    pub post: PostRow,
    pub owner_email: String,
    pub owner_created_at: String,
    pub votes: i64,
}
