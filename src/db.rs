use sqlx::SqlitePool;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS link_rooms (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    room_id TEXT NOT NULL UNIQUE,
    room_name TEXT,
    room_description TEXT,
    locked INTEGER NOT NULL DEFAULT 0,
    user_id TEXT,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS links (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    link_room_id INTEGER NOT NULL REFERENCES link_rooms(id),
    url TEXT NOT NULL,
    note TEXT
);

CREATE TABLE IF NOT EXISTS users (
    uuid TEXT PRIMARY KEY,
    email TEXT NOT NULL UNIQUE,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS auth_tokens (
    token TEXT PRIMARY KEY,
    email TEXT NOT NULL,
    expires_at INTEGER NOT NULL
);
"#;

pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(SCHEMA).execute(pool).await?;
    Ok(())
}

/// A published collection. Immutable once written.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LinkRoomRow {
    pub id: i64,
    pub room_id: String,
    pub room_name: Option<String>,
    pub room_description: Option<String>,
    pub locked: bool,
    pub user_id: Option<String>,
    pub created_at: String,
}

/// One URL entry inside a room.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LinkRow {
    pub id: i64,
    pub link_room_id: i64,
    pub url: String,
    pub note: Option<String>,
}
