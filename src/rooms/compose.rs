use axum::{
    debug_handler,
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use futures_util::future::join_all;
use serde::Deserialize;
use sqlx::SqlitePool;
use tower_sessions::Session;

use super::{card, codec::RoomIdCodec, publish};
use crate::error::Error;
use crate::ogp::OgpResolver;
use crate::session::{PendingLink, PENDING_LINKS, USER_ID};
use crate::{include_res, AppResult, AppState};

const DEFAULT_ROOM_NAME: &str = "OGP Link Generator";

#[derive(Debug, Deserialize)]
pub(crate) struct AddLinkForm {
    url: String,
    memo: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PublishForm {
    room_name: Option<String>,
    room_description: Option<String>,
}

#[debug_handler(state = AppState)]
pub(crate) async fn compose_page(
    State(resolver): State<OgpResolver>,
    session: Session,
) -> AppResult<Response> {
    let pending: Vec<PendingLink> = session.get(PENDING_LINKS).await?.unwrap_or_default();
    render_compose(&resolver, &pending, None).await
}

#[debug_handler(state = AppState)]
pub(crate) async fn add_link(
    State(resolver): State<OgpResolver>,
    session: Session,
    Form(AddLinkForm { url, memo }): Form<AddLinkForm>,
) -> AppResult<Response> {
    let mut pending: Vec<PendingLink> = session.get(PENDING_LINKS).await?.unwrap_or_default();

    let url = url.trim().to_owned();
    if url.is_empty() {
        return render_compose(&resolver, &pending, Some("Enter a URL to add.")).await;
    }

    pending.push(PendingLink {
        url,
        note: memo.map(|memo| memo.trim().to_owned()).filter(|memo| !memo.is_empty()),
    });
    session.insert(PENDING_LINKS, &pending).await?;

    Ok(Redirect::to("/new").into_response())
}

#[debug_handler(state = AppState)]
pub(crate) async fn publish_room(
    State(db_pool): State<SqlitePool>,
    State(codec): State<RoomIdCodec>,
    State(resolver): State<OgpResolver>,
    session: Session,
    Form(PublishForm {
        room_name,
        room_description,
    }): Form<PublishForm>,
) -> AppResult<Response> {
    let pending: Vec<PendingLink> = session.get(PENDING_LINKS).await?.unwrap_or_default();
    let links: Vec<publish::NewLink> = pending
        .iter()
        .map(|link| publish::NewLink {
            url: link.url.clone(),
            note: link.note.clone(),
        })
        .collect();

    let meta = publish::RoomMeta {
        name: room_name
            .map(|name| name.trim().to_owned())
            .filter(|name| !name.is_empty())
            .or_else(|| Some(DEFAULT_ROOM_NAME.to_owned())),
        description: room_description
            .map(|description| description.trim().to_owned())
            .filter(|description| !description.is_empty()),
        owner_id: session.get::<String>(USER_ID).await?,
    };

    match publish::publish(&db_pool, &codec, meta, &links).await {
        Ok(public_id) => {
            let _: Option<Vec<PendingLink>> = session.remove(PENDING_LINKS).await?;
            Ok(Redirect::to(&format!("/{public_id}")).into_response())
        }
        Err(Error::EmptyRoom) => {
            render_compose(&resolver, &pending, Some("There are no links to publish.")).await
        }
        Err(err) => Err(err.into()),
    }
}

async fn render_compose(
    resolver: &OgpResolver,
    pending: &[PendingLink],
    error: Option<&str>,
) -> AppResult<Response> {
    let cards = join_all(
        pending
            .iter()
            .map(|link| resolver.resolve(&link.url, link.note.clone())),
    )
    .await;

    let cards_html: String = cards.iter().map(card::render).collect();
    let error_block = error
        .map(|message| format!(r#"<p class="error">{}</p>"#, card::escape(message)))
        .unwrap_or_default();
    let publish_block = if pending.is_empty() {
        String::new()
    } else {
        include_res!(str, "/pages/publish_form.html").replace("{count}", &pending.len().to_string())
    };

    let body = include_res!(str, "/pages/compose.html")
        .replace("{error_block}", &error_block)
        .replace("{publish_block}", &publish_block)
        .replace("{cards}", &cards_html);

    Ok(Html(body).into_response())
}
