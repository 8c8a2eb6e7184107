use serde_json::json;

use super::{extract, OgpPayload, OgpRecord, ProxyFetcher};
use crate::error::Error;
use crate::Config;

/// Outcome of resolving one URL. Both variants are valid, displayable
/// results; `Degraded` carries just enough to still render a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OgpCard {
    Complete {
        record: OgpRecord,
        note: Option<String>,
    },
    Degraded {
        source_url: String,
        note: Option<String>,
    },
}

#[derive(Clone)]
enum Backend {
    /// Fetch through the public relay chain, extract locally.
    Direct(ProxyFetcher),
    /// Delegate fetch+extract to a trusted endpoint.
    Delegated { endpoint: String },
}

#[derive(Clone)]
pub struct OgpResolver {
    client: reqwest::Client,
    backend: Backend,
}

impl OgpResolver {
    pub fn direct(client: reqwest::Client) -> Self {
        let fetcher = ProxyFetcher::new(client.clone());
        Self::with_fetcher(client, fetcher)
    }

    pub fn with_fetcher(client: reqwest::Client, fetcher: ProxyFetcher) -> Self {
        Self {
            client,
            backend: Backend::Direct(fetcher),
        }
    }

    pub fn delegated(client: reqwest::Client, endpoint: String) -> Self {
        Self {
            client,
            backend: Backend::Delegated { endpoint },
        }
    }

    pub fn from_config(client: reqwest::Client, config: &Config) -> Self {
        match &config.ogp_fetch_endpoint {
            Some(endpoint) => Self::delegated(client, endpoint.clone()),
            None => Self::direct(client),
        }
    }

    /// Resolve or fail. Used by the trusted endpoint, where the caller
    /// wants the cause.
    pub async fn try_resolve(&self, url: &str) -> Result<OgpRecord, Error> {
        match &self.backend {
            Backend::Direct(fetcher) => {
                let html = fetcher.fetch_html(url).await?;
                Ok(extract(&html, url))
            }
            Backend::Delegated { endpoint } => {
                let payload: OgpPayload = self
                    .client
                    .post(endpoint)
                    .json(&json!({ "url": url }))
                    .send()
                    .await?
                    .error_for_status()?
                    .json()
                    .await?;
                Ok(payload.into_record(url))
            }
        }
    }

    /// Resolve a URL for display. Never fails: any failure degrades to a
    /// bare link that still carries the note.
    pub async fn resolve(&self, url: &str, note: Option<String>) -> OgpCard {
        match self.try_resolve(url).await {
            Ok(record) => OgpCard::Complete { record, note },
            Err(err) => {
                tracing::warn!("failed to fetch OGP for {url}: {err}");
                OgpCard::Degraded {
                    source_url: url.to_owned(),
                    note,
                }
            }
        }
    }
}
