use sqlx::SqlitePool;

use super::codec::RoomIdCodec;
use crate::error::Error;

#[derive(Debug, Default, Clone)]
pub struct RoomMeta {
    pub name: Option<String>,
    pub description: Option<String>,
    pub owner_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLink {
    pub url: String,
    pub note: Option<String>,
}

/// Publish a room: allocate the next id, mint its public code, write the
/// room row and its links. Runs in one transaction so the allocated id
/// cannot be stolen by a concurrent publish and a failed link insert does
/// not leave an orphaned room behind.
pub async fn publish(
    pool: &SqlitePool,
    codec: &RoomIdCodec,
    meta: RoomMeta,
    links: &[NewLink],
) -> Result<String, Error> {
    if links.is_empty() {
        return Err(Error::EmptyRoom);
    }

    let mut tx = pool.begin().await?;

    let (max_id,): (i64,) = sqlx::query_as("SELECT COALESCE(MAX(id), 0) FROM link_rooms")
        .fetch_one(&mut *tx)
        .await
        .map_err(|err| Error::IdAllocation(err.to_string()))?;
    let room_id = max_id + 1;
    let public_id = codec.encode(room_id as u64)?;

    sqlx::query(
        "INSERT INTO link_rooms (id,room_id,room_name,room_description,locked,user_id) \
         VALUES (?,?,?,?,?,?)",
    )
    .bind(room_id)
    .bind(&public_id)
    .bind(&meta.name)
    .bind(&meta.description)
    .bind(false)
    .bind(&meta.owner_id)
    .execute(&mut *tx)
    .await?;

    for link in links {
        sqlx::query("INSERT INTO links (link_room_id,url,note) VALUES (?,?,?)")
            .bind(room_id)
            .bind(&link.url)
            .bind(&link.note)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;

    tracing::info!(room_id, %public_id, links = links.len(), "published room");
    Ok(public_id)
}
