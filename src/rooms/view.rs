use axum::{
    debug_handler,
    extract::{Path, State},
    response::{Html, IntoResponse, Response},
};
use futures_util::future::join_all;
use sqlx::SqlitePool;

use super::{card, codec::RoomIdCodec};
use crate::db::{LinkRoomRow, LinkRow};
use crate::error::Error;
use crate::ogp::OgpResolver;
use crate::{include_res, res, AppResult, AppState};

#[derive(Debug)]
pub struct RoomView {
    pub public_id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub links: Vec<LinkRow>,
}

/// Read path: shape-check the public id before touching the store, then an
/// exact match on `room_id`.
pub async fn load_room(
    pool: &SqlitePool,
    codec: &RoomIdCodec,
    public_id: &str,
) -> Result<RoomView, Error> {
    if !codec.is_valid(public_id) {
        return Err(Error::RoomNotFound);
    }

    let Some(room) =
        sqlx::query_as::<_, LinkRoomRow>("SELECT * FROM link_rooms WHERE room_id=?")
            .bind(public_id)
            .fetch_optional(pool)
            .await?
    else {
        return Err(Error::RoomNotFound);
    };

    let links = sqlx::query_as::<_, LinkRow>("SELECT * FROM links WHERE link_room_id=? ORDER BY id")
        .bind(room.id)
        .fetch_all(pool)
        .await?;

    Ok(RoomView {
        public_id: room.room_id,
        name: room.room_name,
        description: room.room_description,
        links,
    })
}

#[debug_handler(state = AppState)]
pub(crate) async fn room(
    Path(public_id): Path<String>,
    State(db_pool): State<SqlitePool>,
    State(codec): State<RoomIdCodec>,
    State(resolver): State<OgpResolver>,
) -> AppResult<Response> {
    let view = match load_room(&db_pool, &codec, &public_id).await {
        Ok(view) => view,
        Err(Error::RoomNotFound) => return res::sorry("room"),
        Err(err) => return Err(err.into()),
    };

    // every link resolves independently; one failure degrades only its card
    let cards = join_all(
        view.links
            .iter()
            .map(|link| resolver.resolve(&link.url, link.note.clone())),
    )
    .await;

    let cards_html = if cards.is_empty() {
        r#"<p class="empty">This room has no links.</p>"#.to_owned()
    } else {
        cards.iter().map(card::render).collect()
    };

    let body = include_res!(str, "/pages/room.html")
        .replace("{public_id}", &card::escape(&view.public_id))
        .replace(
            "{room_name}",
            &card::escape(view.name.as_deref().unwrap_or("Untitled Room")),
        )
        .replace(
            "{room_description}",
            &card::escape(view.description.as_deref().unwrap_or("")),
        )
        .replace("{count}", &view.links.len().to_string())
        .replace("{cards}", &cards_html);

    Ok(Html(body).into_response())
}
