pub(crate) mod card;
mod compose;
pub mod codec;
pub mod publish;
pub mod view;

use axum::{
    routing::{get, post},
    Router,
};

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/new", get(compose::compose_page))
        .route("/new/add", post(compose::add_link))
        .route("/new/publish", post(compose::publish_room))
        .route("/{public_id}", get(view::room))
}
