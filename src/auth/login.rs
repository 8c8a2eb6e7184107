use axum::{
    debug_handler,
    extract::{Query, State},
    response::{Html, IntoResponse, Response},
    Form,
};
use rand::{distr::Alphanumeric, Rng};
use serde::Deserialize;
use sqlx::SqlitePool;
use tower_sessions::Session;

use crate::session::RETURN_URL;
use crate::{include_res, AppResult, AppState, Config};

const TOKEN_TTL: time::Duration = time::Duration::minutes(15);

#[derive(Deserialize)]
pub(crate) struct LoginQuery {
    pub(crate) return_url: Option<String>,
}

#[derive(Deserialize)]
pub(crate) struct LoginForm {
    email: String,
}

#[debug_handler]
pub(crate) async fn login_page(
    Query(LoginQuery { return_url }): Query<LoginQuery>,
    session: Session,
) -> AppResult<Response> {
    if let Some(return_url) = return_url {
        session.insert(RETURN_URL, return_url).await?;
    }
    Ok(Html(include_res!(str, "/pages/login.html")).into_response())
}

#[debug_handler(state = AppState)]
pub(crate) async fn send_link(
    State(db_pool): State<SqlitePool>,
    State(config): State<Config>,
    Form(LoginForm { email }): Form<LoginForm>,
) -> AppResult<Response> {
    let email = email.trim().to_ascii_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Ok(Html(
            include_res!(str, "/pages/login.html")
                .replace("<!--error-->", r#"<p class="error">Enter a valid email address.</p>"#),
        )
        .into_response());
    }

    let token: String = rand::rng()
        .sample_iter(Alphanumeric)
        .take(32)
        .map(char::from)
        .collect();
    let expires_at = (time::OffsetDateTime::now_utc() + TOKEN_TTL).unix_timestamp();

    sqlx::query("INSERT INTO auth_tokens (token,email,expires_at) VALUES (?,?,?)")
        .bind(&token)
        .bind(&email)
        .bind(expires_at)
        .execute(&db_pool)
        .await?;

    deliver_link(
        &email,
        &format!("{}/auth/verify?token={token}", config.public_base_url),
    );

    Ok(Html(include_res!(str, "/pages/link_sent.html").replace("{email}", &email)).into_response())
}

/// Delivery seam. A real mailer plugs in here; this deployment logs the
/// link so operators can hand it out.
fn deliver_link(email: &str, link: &str) {
    tracing::info!("magic link for {email}: {link}");
}
