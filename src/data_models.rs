use serde::{Deserialize, Serialize};

use crate::error::SearchError;

/// Where a product record came from.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    BrightData,
    Mock,
}

/// Canonical product record shared by every stage after extraction.
///
/// `title` is never empty and `url` is always an absolute product URL; the
/// remaining fields are independently nullable.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Product {
    pub title: String,
    pub price: Option<f64>,
    pub currency: Option<String>,
    pub rating: Option<f64>,
    pub reviews_count: Option<u64>,
    pub url: String,
    pub image: Option<String>,
    pub source: Source,
}

/// Price fragments as they appear on a result card.
///
/// Amazon splits prices into symbol, whole and fraction spans and also keeps a
/// screen-reader copy of the full string; any of them may be missing.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct RawPrice {
    pub text: Option<String>,
    pub symbol: Option<String>,
    pub whole: Option<String>,
    pub fraction: Option<String>,
}

impl RawPrice {
    pub fn from_text(text: impl Into<String>) -> RawPrice {
        RawPrice {
            text: Some(text.into()),
            ..RawPrice::default()
        }
    }

    /// Joins the split parts into one price string, falling back to the full
    /// text when there is no whole-number part.
    pub fn compose(&self) -> Option<String> {
        let whole = self
            .whole
            .as_deref()
            .map(|w| w.trim().trim_end_matches(['.', ',']).trim())
            .filter(|w| !w.is_empty());

        match whole {
            Some(whole) => {
                let mut composed = self.symbol.as_deref().unwrap_or("").trim().to_string();
                composed.push_str(whole);
                if let Some(fraction) = self.fraction.as_deref().map(str::trim) {
                    if !fraction.is_empty() {
                        composed.push('.');
                        composed.push_str(fraction);
                    }
                }
                Some(composed)
            }
            None => self
                .text
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string),
        }
    }
}

/// Unvalidated fields pulled out of one result card. Absent fields stay `None`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct RawProduct {
    pub title: Option<String>,
    pub price: RawPrice,
    pub rating: Option<String>,
    pub reviews_count: Option<String>,
    pub href: Option<String>,
    pub image: Option<String>,
}

/// A validated search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub limit: usize,
}

impl SearchRequest {
    pub const DEFAULT_LIMIT: usize = 10;
    pub const MAX_LIMIT: usize = 50;

    pub fn new(query: &str, limit: usize) -> Result<SearchRequest, SearchError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SearchError::InvalidRequest(
                "Missing required parameter: q".to_string(),
            ));
        }
        if !(1..=Self::MAX_LIMIT).contains(&limit) {
            return Err(SearchError::InvalidRequest(format!(
                "limit must be between 1 and {}, got {limit}",
                Self::MAX_LIMIT
            )));
        }
        Ok(SearchRequest {
            query: query.to_string(),
            limit,
        })
    }

    /// Validates raw query-string values. A missing or blank `limit` takes the
    /// default.
    pub fn parse(
        raw_query: Option<&str>,
        raw_limit: Option<&str>,
    ) -> Result<SearchRequest, SearchError> {
        let query = raw_query.unwrap_or("");
        let Some(raw) = raw_limit.map(str::trim).filter(|l| !l.is_empty()) else {
            return Self::new(query, Self::DEFAULT_LIMIT);
        };
        let limit = raw.parse::<i64>().map_err(|_| {
            SearchError::InvalidRequest(format!("limit must be an integer, got '{raw}'"))
        })?;
        let limit = usize::try_from(limit).map_err(|_| {
            SearchError::InvalidRequest(format!(
                "limit must be between 1 and {}, got {limit}",
                Self::MAX_LIMIT
            ))
        })?;
        Self::new(query, limit)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SearchResponse {
    pub query: String,
    pub count: usize,
    pub items: Vec<Product>,
    pub agent_answer: String,
}

impl SearchResponse {
    pub fn new(query: String, items: Vec<Product>, agent_answer: String) -> SearchResponse {
        SearchResponse {
            query,
            count: items.len(),
            items,
            agent_answer,
        }
    }
}
