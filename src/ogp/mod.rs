pub mod extract;
pub mod fetch;
pub mod resolve;

use axum::{debug_handler, extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

use crate::{AppResult, AppState};

pub use extract::extract;
pub use fetch::{default_proxies, Envelope, ProxyEndpoint, ProxyFetcher};
pub use resolve::{OgpCard, OgpResolver};

/// Resolved display metadata for one URL. Computed per render, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OgpRecord {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub site_name: Option<String>,
    /// The page's own `og:url` annotation when present, else the URL that
    /// was requested.
    pub source_url: String,
}

/// Wire shape of the trusted fetch endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OgpPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_name: Option<String>,
}

impl OgpPayload {
    pub fn into_record(self, requested_url: &str) -> OgpRecord {
        OgpRecord {
            title: non_empty(self.title),
            description: non_empty(self.description),
            image: non_empty(self.image),
            site_name: non_empty(self.site_name),
            source_url: requested_url.to_owned(),
        }
    }
}

impl From<OgpRecord> for OgpPayload {
    fn from(record: OgpRecord) -> Self {
        OgpPayload {
            title: record.title,
            description: record.description,
            image: record.image,
            site_name: record.site_name,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[derive(Deserialize)]
pub(crate) struct OgpFetchBody {
    url: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/ogp", post(ogp_fetch))
        .layer(CorsLayer::permissive())
}

#[debug_handler(state = AppState)]
async fn ogp_fetch(
    State(resolver): State<OgpResolver>,
    Json(OgpFetchBody { url }): Json<OgpFetchBody>,
) -> AppResult<Json<OgpPayload>> {
    let record = resolver.try_resolve(&url).await?;
    Ok(Json(record.into()))
}
