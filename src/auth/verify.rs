use axum::{
    debug_handler,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use sqlx::SqlitePool;
use tower_sessions::Session;

use super::find_or_create_user;
use crate::session::{RETURN_URL, USER_EMAIL, USER_ID};
use crate::{include_res, AppResult, AppState};

#[derive(Deserialize)]
pub(crate) struct VerifyQuery {
    pub(crate) token: Option<String>,
}

#[debug_handler(state = AppState)]
pub(crate) async fn verify(
    State(db_pool): State<SqlitePool>,
    session: Session,
    Query(VerifyQuery { token }): Query<VerifyQuery>,
) -> AppResult<Response> {
    let Some(token) = token else {
        return failed();
    };

    let Some((email, expires_at)) =
        sqlx::query_as::<_, (String, i64)>("SELECT email,expires_at FROM auth_tokens WHERE token=?")
            .bind(&token)
            .fetch_optional(&db_pool)
            .await?
    else {
        return failed();
    };

    // single use, spent even when expired
    sqlx::query("DELETE FROM auth_tokens WHERE token=?")
        .bind(&token)
        .execute(&db_pool)
        .await?;

    if expires_at < time::OffsetDateTime::now_utc().unix_timestamp() {
        return failed();
    }

    let user_id = find_or_create_user(&db_pool, &email).await?;
    session.insert(USER_ID, &user_id).await?;
    session.insert(USER_EMAIL, &email).await?;
    tracing::info!("welcome u/{user_id}");

    let return_url: Option<String> = session.remove(RETURN_URL).await?;
    Ok(Redirect::to(return_url.as_deref().unwrap_or("/mypage")).into_response())
}

fn failed() -> AppResult<Response> {
    Ok((
        StatusCode::UNAUTHORIZED,
        Html(include_res!(str, "/pages/auth_failed.html")),
    )
        .into_response())
}
