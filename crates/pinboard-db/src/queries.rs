use crate::Database;
use crate::models::{PostRow, PostVoteRow, UserRow};
use anyhow::{Result, anyhow};
use rusqlite::Connection;

/// Aggregate listing query: one row per post with its vote count. COUNT over
/// the LEFT JOIN column yields 0 for posts without votes. Grouping happens
/// before LIMIT/OFFSET so pagination operates over posts, not votes, and the
/// ORDER BY keeps pagination deterministic.
const POST_VOTES_SELECT: &str = "
    SELECT p.id, p.title, p.content, p.published, p.owner_id, p.created_at,
           u.email, u.created_at,
           COUNT(v.post_id) AS votes
    FROM posts p
    JOIN users u ON u.id = p.owner_id
    LEFT JOIN votes v ON v.post_id = p.id";

impl Database {
    // -- Users --

    pub fn create_user(&self, email: &str, password_hash: &str) -> Result<UserRow> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO users (email, password) VALUES (?1, ?2)",
                (email, password_hash),
            )?;
            let id = conn.last_insert_rowid();
            query_user_by_id(conn, id)?.ok_or_else(|| anyhow!("user {} vanished after insert", id))
        })
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_email(conn, email))
    }

    pub fn get_user_by_id(&self, id: i64) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_id(conn, id))
    }

    // -- Posts --

    pub fn insert_post(
        &self,
        title: &str,
        content: &str,
        published: bool,
        owner_id: i64,
    ) -> Result<PostRow> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO posts (title, content, published, owner_id) VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![title, content, published, owner_id],
            )?;
            let id = conn.last_insert_rowid();
            query_post(conn, id)?.ok_or_else(|| anyhow!("post {} vanished after insert", id))
        })
    }

    pub fn get_post(&self, id: i64) -> Result<Option<PostRow>> {
        self.with_conn(|conn| query_post(conn, id))
    }

    pub fn update_post(
        &self,
        id: i64,
        title: &str,
        content: &str,
        published: bool,
    ) -> Result<PostRow> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "UPDATE posts SET title = ?1, content = ?2, published = ?3 WHERE id = ?4",
                rusqlite::params![title, content, published, id],
            )?;
            query_post(conn, id)?.ok_or_else(|| anyhow!("post {} vanished after update", id))
        })
    }

    pub fn delete_post(&self, id: i64) -> Result<()> {
        self.with_conn_mut(|conn| {
            // Votes reference the post; drop them with it.
            conn.execute("DELETE FROM votes WHERE post_id = ?1", [id])?;
            conn.execute("DELETE FROM posts WHERE id = ?1", [id])?;
            Ok(())
        })
    }

    /// Paginated vote-count listing with a case-sensitive substring title
    /// filter. An empty search string matches every post.
    pub fn list_posts(&self, search: &str, limit: u32, offset: u32) -> Result<Vec<PostVoteRow>> {
        self.with_conn(|conn| {
            let sql = format!(
                "{POST_VOTES_SELECT}
                 WHERE (?1 = '' OR instr(p.title, ?1) > 0)
                 GROUP BY p.id
                 ORDER BY p.id ASC
                 LIMIT ?2 OFFSET ?3"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(rusqlite::params![search, limit, offset], post_vote_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Same aggregation restricted to a single post id.
    pub fn get_post_with_votes(&self, id: i64) -> Result<Option<PostVoteRow>> {
        self.with_conn(|conn| {
            let sql = format!(
                "{POST_VOTES_SELECT}
                 WHERE p.id = ?1
                 GROUP BY p.id"
            );
            let mut stmt = conn.prepare(&sql)?;
            let row = stmt.query_row([id], post_vote_from_row).optional()?;
            Ok(row)
        })
    }

    // -- Votes --

    pub fn vote_exists(&self, post_id: i64, user_id: i64) -> Result<bool> {
        self.with_conn(|conn| {
            let found: Option<i64> = conn
                .query_row(
                    "SELECT 1 FROM votes WHERE post_id = ?1 AND user_id = ?2",
                    [post_id, user_id],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(found.is_some())
        })
    }

    pub fn insert_vote(&self, post_id: i64, user_id: i64) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO votes (post_id, user_id) VALUES (?1, ?2)",
                [post_id, user_id],
            )?;
            Ok(())
        })
    }

    pub fn delete_vote(&self, post_id: i64, user_id: i64) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "DELETE FROM votes WHERE post_id = ?1 AND user_id = ?2",
                [post_id, user_id],
            )?;
            Ok(())
        })
    }
}

fn query_user_by_email(conn: &Connection, email: &str) -> Result<Option<UserRow>> {
    let mut stmt =
        conn.prepare("SELECT id, email, password, created_at FROM users WHERE email = ?1")?;

    let row = stmt
        .query_row([email], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                email: row.get(1)?,
                password: row.get(2)?,
                created_at: row.get(3)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn query_user_by_id(conn: &Connection, id: i64) -> Result<Option<UserRow>> {
    let mut stmt =
        conn.prepare("SELECT id, email, password, created_at FROM users WHERE id = ?1")?;

    let row = stmt
        .query_row([id], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                email: row.get(1)?,
                password: row.get(2)?,
                created_at: row.get(3)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn query_post(conn: &Connection, id: i64) -> Result<Option<PostRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, title, content, published, owner_id, created_at FROM posts WHERE id = ?1",
    )?;

    let row = stmt
        .query_row([id], |row| {
            Ok(PostRow {
                id: row.get(0)?,
                title: row.get(1)?,
                content: row.get(2)?,
                published: row.get(3)?,
                owner_id: row.get(4)?,
                created_at: row.get(5)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn post_vote_from_row(row: &rusqlite::Row<'_>) -> std::result::Result<PostVoteRow, rusqlite::Error> {
    Ok(PostVoteRow {
        post: PostRow {
            id: row.get(0)?,
            title: row.get(1)?,
            content: row.get(2)?,
            published: row.get(3)?,
            owner_id: row.get(4)?,
            created_at: row.get(5)?,
        },
        owner_email: row.get(6)?,
        owner_created_at: row.get(7)?,
        votes: row.get(8)?,
    })
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
