pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod mypage;
pub mod ogp;
pub mod res;
pub mod rooms;
pub mod session;

use std::ops::Deref;

use axum::{
    extract::FromRef,
    response::{Html, IntoResponse},
};
use sqlx::SqlitePool;

pub use config::Config;
pub use error::{AppError, AppResult, Error};

#[derive(Clone, FromRef)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub codec: rooms::codec::RoomIdCodec,
    pub resolver: ogp::OgpResolver,
    pub config: Config,
}

pub struct Markdown<T>(pub T);

impl<T> IntoResponse for Markdown<T>
where
    T: Deref<Target = str>,
{
    fn into_response(self) -> axum::response::Response {
        let mut html_output = String::new();
        pulldown_cmark::html::push_html(&mut html_output, pulldown_cmark::Parser::new(&self.0));
        Html(html_output).into_response()
    }
}
