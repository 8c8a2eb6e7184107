use axum::{debug_handler, extract::Query, response::Redirect};
use serde::Deserialize;
use tower_sessions::Session;

use crate::session::{USER_EMAIL, USER_ID};
use crate::AppResult;

#[derive(Deserialize)]
pub(crate) struct LogoutQuery {
    pub(crate) return_url: Option<String>,
}

/// Drops the identity from the session. An unpublished compose draft
/// survives sign-out.
#[debug_handler]
pub(crate) async fn logout(
    Query(LogoutQuery { return_url }): Query<LogoutQuery>,
    session: Session,
) -> AppResult<Redirect> {
    session.remove::<String>(USER_ID).await?;
    session.remove::<String>(USER_EMAIL).await?;
    Ok(Redirect::to(return_url.as_deref().unwrap_or("/")))
}
