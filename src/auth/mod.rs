mod login;
mod logout;
mod verify;

use axum::{
    routing::get,
    Router,
};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", get(login::login_page).post(login::send_link))
        .route("/auth/verify", get(verify::verify))
        .route("/logout", get(logout::logout))
}

pub(crate) async fn find_or_create_user(
    db_pool: &SqlitePool,
    email: &str,
) -> Result<String, sqlx::Error> {
    if let Some((uuid,)) = sqlx::query_as::<_, (String,)>("SELECT uuid FROM users WHERE email=?")
        .bind(email)
        .fetch_optional(db_pool)
        .await?
    {
        return Ok(uuid);
    }

    let uuid = Uuid::now_v7().to_string();
    tracing::info!("adding user {uuid} for {email}");
    sqlx::query("INSERT INTO users (uuid,email) VALUES (?,?)")
        .bind(&uuid)
        .bind(email)
        .execute(db_pool)
        .await?;
    Ok(uuid)
}
