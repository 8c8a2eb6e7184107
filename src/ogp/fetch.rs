//! Sequential fallback across public CORS-relay endpoints. First success
//! wins; intermediate failures are only kept as the "last error" reported
//! when the whole chain is exhausted. No retries, no backoff.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::error::Error;

/// Matches JS `encodeURIComponent`: everything but alphanumerics and
/// `- _ . ! ~ * ' ( )` is escaped.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// How a relay wraps the fetched document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Envelope {
    /// The response body is the HTML itself.
    Raw,
    /// A JSON envelope with the HTML under a `contents` field.
    JsonContents,
}

#[derive(Debug, Clone)]
pub struct ProxyEndpoint {
    pub name: &'static str,
    pub prefix: String,
    pub encode_target: bool,
    pub envelope: Envelope,
}

impl ProxyEndpoint {
    pub fn url_for(&self, target: &str) -> String {
        if self.encode_target {
            format!("{}{}", self.prefix, utf8_percent_encode(target, COMPONENT))
        } else {
            format!("{}{}", self.prefix, target)
        }
    }
}

pub fn default_proxies() -> Vec<ProxyEndpoint> {
    vec![
        ProxyEndpoint {
            name: "corsproxy.io",
            prefix: "https://corsproxy.io/?".to_owned(),
            encode_target: true,
            envelope: Envelope::Raw,
        },
        ProxyEndpoint {
            name: "allorigins.win",
            prefix: "https://api.allorigins.win/get?url=".to_owned(),
            encode_target: true,
            envelope: Envelope::JsonContents,
        },
        ProxyEndpoint {
            name: "cors-anywhere",
            prefix: "https://cors-anywhere.herokuapp.com/".to_owned(),
            encode_target: false,
            envelope: Envelope::Raw,
        },
    ]
}

#[derive(Clone)]
pub struct ProxyFetcher {
    client: reqwest::Client,
    proxies: Vec<ProxyEndpoint>,
}

impl ProxyFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self::with_proxies(client, default_proxies())
    }

    pub fn with_proxies(client: reqwest::Client, proxies: Vec<ProxyEndpoint>) -> Self {
        Self { client, proxies }
    }

    /// Try each relay in order and return the first non-empty HTML body.
    pub async fn fetch_html(&self, target: &str) -> Result<String, Error> {
        let mut last_error = String::new();

        for proxy in &self.proxies {
            let proxy_url = proxy.url_for(target);

            let response = match self.client.get(&proxy_url).send().await {
                Ok(response) => response,
                Err(err) => {
                    tracing::debug!("proxy {} errored: {err}", proxy.name);
                    last_error = err.to_string();
                    continue;
                }
            };

            if !response.status().is_success() {
                tracing::debug!("proxy {} returned {}", proxy.name, response.status());
                last_error = format!("Failed to fetch from {proxy_url}");
                continue;
            }

            let html = match proxy.envelope {
                Envelope::JsonContents => match response.json::<serde_json::Value>().await {
                    Ok(body) => body
                        .get("contents")
                        .and_then(|contents| contents.as_str())
                        .unwrap_or_default()
                        .to_owned(),
                    Err(err) => {
                        last_error = err.to_string();
                        continue;
                    }
                },
                Envelope::Raw => match response.text().await {
                    Ok(text) => text,
                    Err(err) => {
                        last_error = err.to_string();
                        continue;
                    }
                },
            };

            // an empty body is not a success, but not an error worth keeping either
            if !html.is_empty() {
                return Ok(html);
            }
        }

        Err(Error::AllProxiesFailed { last: last_error })
    }
}
