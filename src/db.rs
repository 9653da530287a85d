use serde::Serialize;
use sqlx::SqlitePool;

/// A person's public handle, keyed by the identity provider's stable id.
/// Created lazily on the first handle save; upserts keep it at one row per
/// person. There is no delete path.
#[derive(Debug, sqlx::FromRow)]
pub struct Profile {
    pub id: String,
    pub username: String,

    // unique: id
    // unique: username
}

/// One received message. `target_profile_id` is pinned at insert and never
/// updated, so renaming a handle leaves old advice where it was delivered;
/// `target_username` is only a readable copy. `from_name` is null whenever
/// the sender chose anonymity.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct Advice {
    pub id: String,
    pub target_username: String,
    pub target_profile_id: Option<String>,
    pub content: String,
    pub from_name: Option<String>,
    pub is_anonymous: bool,
    pub created_at: String,
}

pub async fn init(db_pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS profiles (
            id TEXT PRIMARY KEY,
            username TEXT NOT NULL UNIQUE
        )",
    )
    .execute(db_pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS advice (
            id TEXT PRIMARY KEY,
            target_username TEXT NOT NULL,
            target_profile_id TEXT,
            content TEXT NOT NULL,
            from_name TEXT,
            is_anonymous INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        )",
    )
    .execute(db_pool)
    .await?;

    Ok(())
}
