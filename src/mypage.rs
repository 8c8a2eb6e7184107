use axum::{
    debug_handler,
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};
use sqlx::SqlitePool;
use tower_sessions::Session;

use crate::db::LinkRoomRow;
use crate::rooms::card::escape;
use crate::session::{USER_EMAIL, USER_ID};
use crate::{include_res, AppResult, AppState};

#[debug_handler(state = AppState)]
pub async fn mypage(State(db_pool): State<SqlitePool>, session: Session) -> AppResult<Response> {
    let Some(user_id) = session.get::<String>(USER_ID).await? else {
        return Ok(Redirect::to("/login?return_url=/mypage").into_response());
    };
    let email = session.get::<String>(USER_EMAIL).await?.unwrap_or_default();

    let rooms = sqlx::query_as::<_, LinkRoomRow>(
        "SELECT * FROM link_rooms WHERE user_id=? ORDER BY created_at DESC, id DESC",
    )
    .bind(&user_id)
    .fetch_all(&db_pool)
    .await?;

    let room_items: String = if rooms.is_empty() {
        r#"<p class="empty">No rooms yet. Add some links and publish your first room.</p>"#
            .to_owned()
    } else {
        rooms
            .iter()
            .map(|room| {
                include_res!(str, "/pages/room_item.html")
                    .replace("{public_id}", &escape(&room.room_id))
                    .replace(
                        "{name}",
                        &escape(room.room_name.as_deref().unwrap_or("Untitled Room")),
                    )
                    .replace(
                        "{description}",
                        &escape(room.room_description.as_deref().unwrap_or("No description")),
                    )
                    .replace("{created_at}", &escape(&room.created_at))
            })
            .collect()
    };

    let body = include_res!(str, "/pages/mypage.html")
        .replace("{email}", &escape(&email))
        .replace("{count}", &rooms.len().to_string())
        .replace("{room_items}", &room_items);

    Ok(Html(body).into_response())
}
