use axum::{debug_handler, response::IntoResponse, routing::get, Router};
use linkrooms::ogp::OgpResolver;
use linkrooms::rooms::codec::RoomIdCodec;
use linkrooms::{auth, db, include_res, mypage, ogp, res, rooms, AppState, Config, Markdown};
use sqlx::sqlite::SqlitePoolOptions;
use tower_sessions::{cookie::SameSite, Expiry, MemoryStore, SessionManagerLayer};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("linkrooms=info,tower_http=warn")),
        )
        .init();

    let config = Config::from_env();

    let db_pool = SqlitePoolOptions::new()
        .max_connections(16)
        .connect(&config.database_url)
        .await?;
    db::init_schema(&db_pool).await?;

    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::hours(2)));

    let client = reqwest::Client::new();
    let app_state = AppState {
        resolver: OgpResolver::from_config(client, &config),
        codec: RoomIdCodec::new()?,
        db_pool,
        config: config.clone(),
    };

    let app = Router::new()
        .route("/", get(landing))
        .route("/style.css", get(res::stylesheet))
        .route("/mypage", get(mypage::mypage))
        .merge(auth::router())
        .merge(rooms::router())
        .nest("/api", ogp::router())
        .with_state(app_state)
        .layer(session_layer);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("listening on {}", config.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}

#[debug_handler]
async fn landing() -> impl IntoResponse {
    Markdown(include_res!(str, "/pages/landing.md"))
}
