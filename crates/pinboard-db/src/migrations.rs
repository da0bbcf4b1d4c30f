use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            email       TEXT NOT NULL UNIQUE,
            password    TEXT NOT NULL,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS posts (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            title       TEXT NOT NULL,
            content     TEXT NOT NULL,
            published   INTEGER NOT NULL DEFAULT 1,
            owner_id    INTEGER NOT NULL REFERENCES users(id),
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_posts_owner
            ON posts(owner_id);

        -- A row is an active vote; removing a vote deletes the row.
        CREATE TABLE IF NOT EXISTS votes (
            post_id     INTEGER NOT NULL REFERENCES posts(id),
            user_id     INTEGER NOT NULL REFERENCES users(id),
            PRIMARY KEY (post_id, user_id)
        );

        CREATE INDEX IF NOT EXISTS idx_votes_post
            ON votes(post_id);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
