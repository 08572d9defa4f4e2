use crate::agent;
use crate::config::{Config, DataSource};
use crate::data_models::{Product, SearchRequest, SearchResponse};
use crate::error::SearchError;
use crate::extractor;
use crate::fetcher::ProxyFetcher;
use crate::mock_data::mock_products;
use crate::normalizer;

/// Drives one search from raw parameters to a response.
///
/// Holds only the read-only process configuration, so a single instance can
/// serve any number of concurrent requests.
pub struct SearchService {
    config: Config,
}

impl SearchService {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Validates raw query parameters and runs the search.
    pub async fn handle(
        &self,
        raw_query: Option<&str>,
        raw_limit: Option<&str>,
    ) -> Result<SearchResponse, SearchError> {
        let request = SearchRequest::parse(raw_query, raw_limit)?;
        self.search(&request).await
    }

    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, SearchError> {
        let source = DataSource::resolve(&self.config)?;

        let mut items = match &source {
            DataSource::Mock => {
                log::info!("serving mock products for '{}'", request.query);
                mock_products()
            }
            DataSource::DirectApi(creds) => {
                let fetcher = ProxyFetcher::direct(creds, self.config.timeout)?;
                Self::fetch_live(&fetcher, request).await?
            }
            DataSource::Proxy(creds) => {
                let fetcher = ProxyFetcher::proxied(
                    creds,
                    self.config.ca_cert_path.as_deref(),
                    self.config.timeout,
                )?;
                Self::fetch_live(&fetcher, request).await?
            }
        };

        items.truncate(request.limit);
        let agent_answer = agent::summarize(&items, &request.query);

        Ok(SearchResponse::new(
            request.query.clone(),
            items,
            agent_answer,
        ))
    }

    async fn fetch_live(
        fetcher: &ProxyFetcher,
        request: &SearchRequest,
    ) -> Result<Vec<Product>, SearchError> {
        let html = fetcher.fetch(&request.query).await?;
        let raw = extractor::extract(&html, request.limit)?;
        let extracted = raw.len();

        let products: Vec<Product> = raw.iter().filter_map(normalizer::normalize).collect();
        if products.len() < extracted {
            log::warn!(
                "dropped {} of {} cards without a title or product link",
                extracted - products.len(),
                extracted
            );
        }
        Ok(products)
    }
}
