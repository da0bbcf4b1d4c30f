//! Row-to-API conversions shared by the handlers.

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::warn;

use pinboard_db::models::{PostRow, PostVoteRow, UserRow};
use pinboard_types::api::PostWithVotes;
use pinboard_types::models::{Post, User};

pub(crate) fn parse_created_at(raw: &str, what: &str, id: i64) -> DateTime<Utc> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| {
            // SQLite stores timestamps as "YYYY-MM-DD HH:MM:SS" without
            // timezone. Parse as naive UTC and convert.
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            warn!("Corrupt created_at '{}' on {} {}: {}", raw, what, id, e);
            DateTime::default()
        })
}

pub(crate) fn user_from_row(row: UserRow) -> User {
    let created_at = parse_created_at(&row.created_at, "user", row.id);
    User {
        id: row.id,
        email: row.email,
        created_at,
    }
}

pub(crate) fn post_from_row(row: PostRow, owner: User) -> Post {
    let created_at = parse_created_at(&row.created_at, "post", row.id);
    Post {
        id: row.id,
        title: row.title,
        content: row.content,
        published: row.published,
        owner_id: row.owner_id,
        created_at,
        owner,
    }
}

pub(crate) fn post_with_votes(row: PostVoteRow) -> PostWithVotes {
    let owner = User {
        id: row.post.owner_id,
        email: row.owner_email,
        created_at: parse_created_at(&row.owner_created_at, "user", row.post.owner_id),
    };
    let votes = row.votes;
    PostWithVotes {
        post: post_from_row(row.post, owner),
        votes,
    }
}
