use reqwest::{Certificate, Client, Proxy, Url};
use serde::Serialize;
use std::path::Path;
use std::time::Duration;

use crate::config::{AMAZON_ORIGIN, DirectApiCredentials, ProxyCredentials};
use crate::error::SearchError;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

#[derive(Debug, Serialize)]
struct UnlockRequest<'a> {
    url: &'a str,
    format: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    zone: Option<&'a str>,
}

enum Transport {
    /// POST the target URL to an unlocker API endpoint.
    Direct {
        endpoint: String,
        api_key: String,
        zone: Option<String>,
    },
    /// GET the target URL through the unblocking proxy.
    Proxy,
}

/// Fetches Amazon search pages through Bright Data. One attempt per call.
pub struct ProxyFetcher {
    client: Client,
    transport: Transport,
    origin: String,
}

impl ProxyFetcher {
    pub fn direct(creds: &DirectApiCredentials, timeout: Duration) -> Result<Self, SearchError> {
        Url::parse(&creds.endpoint).map_err(|e| {
            SearchError::MissingCredentials(format!(
                "BRIGHTDATA_ENDPOINT is not a valid URL: {e}"
            ))
        })?;

        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| SearchError::UpstreamError(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            transport: Transport::Direct {
                endpoint: creds.endpoint.clone(),
                api_key: creds.api_key.clone(),
                zone: creds.zone.clone(),
            },
            origin: AMAZON_ORIGIN.to_string(),
        })
    }

    pub fn proxied(
        creds: &ProxyCredentials,
        ca_cert_path: Option<&Path>,
        timeout: Duration,
    ) -> Result<Self, SearchError> {
        let proxy_url = format!("http://{}:{}", creds.host, creds.port);
        let proxy = Proxy::all(&proxy_url)
            .map_err(|e| {
                SearchError::MissingCredentials(format!("invalid proxy address {proxy_url}: {e}"))
            })?
            .basic_auth(&creds.username, &creds.password);

        let mut builder = Client::builder()
            .proxy(proxy)
            .user_agent(USER_AGENT)
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .timeout(timeout)
            .connect_timeout(CONNECT_TIMEOUT);

        if let Some(path) = ca_cert_path {
            builder = builder.add_root_certificate(load_certificate(path)?);
        }

        let client = builder
            .build()
            .map_err(|e| SearchError::UpstreamError(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            transport: Transport::Proxy,
            origin: AMAZON_ORIGIN.to_string(),
        })
    }

    /// Points searches at another storefront origin, e.g. a regional domain.
    pub fn with_origin(mut self, origin: &str) -> Self {
        self.origin = origin.trim_end_matches('/').to_string();
        self
    }

    /// The public Amazon search page for `query`.
    pub fn search_url(query: &str) -> Result<Url, SearchError> {
        search_url_at(AMAZON_ORIGIN, query)
    }

    pub async fn fetch(&self, query: &str) -> Result<String, SearchError> {
        let target = search_url_at(&self.origin, query)?;

        let request = match &self.transport {
            Transport::Direct {
                endpoint,
                api_key,
                zone,
            } => {
                log::info!("fetching {target} via unlocker API");
                self.client
                    .post(endpoint)
                    .bearer_auth(api_key)
                    .json(&UnlockRequest {
                        url: target.as_str(),
                        format: "raw",
                        zone: zone.as_deref(),
                    })
            }
            Transport::Proxy => {
                log::info!("fetching {target} via proxy");
                self.client
                    .get(target.clone())
                    .header(
                        "Accept",
                        "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
                    )
                    .header("Accept-Language", "en-US,en;q=0.9")
            }
        };

        let response = request.send().await.map_err(classify)?;
        let status = response.status();
        log::debug!("upstream responded with {status}");

        if !status.is_success() {
            return Err(SearchError::UpstreamError(format!(
                "upstream returned status {status}"
            )));
        }

        let body = response.text().await.map_err(classify)?;
        log::info!("fetched {} bytes for query '{query}'", body.len());
        Ok(body)
    }
}

fn search_url_at(origin: &str, query: &str) -> Result<Url, SearchError> {
    Url::parse_with_params(&format!("{origin}/s"), &[("k", query)])
        .map_err(|e| SearchError::InvalidRequest(format!("cannot build search URL: {e}")))
}

fn load_certificate(path: &Path) -> Result<Certificate, SearchError> {
    let pem = std::fs::read(path).map_err(|e| {
        SearchError::MissingCredentials(format!(
            "Bright Data CA certificate not readable at '{}': {e}",
            path.display()
        ))
    })?;
    Certificate::from_pem(&pem).map_err(|e| {
        SearchError::MissingCredentials(format!(
            "Bright Data CA certificate at '{}' is invalid: {e}",
            path.display()
        ))
    })
}

fn classify(err: reqwest::Error) -> SearchError {
    if err.is_timeout() {
        SearchError::UpstreamError("request to upstream timed out".to_string())
    } else if err.is_connect() {
        SearchError::UpstreamError(format!("could not connect to upstream: {err}"))
    } else {
        SearchError::UpstreamError(format!("upstream request failed: {err}"))
    }
}
