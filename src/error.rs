/// Every way a search request can fail.
///
/// Sub-stages return these unchanged; only the HTTP boundary translates them
/// into status codes.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// Bad or missing query parameters.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Live mode was required but no usable upstream credentials are configured.
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    /// Transport failure, timeout, or non-success status from the proxy.
    #[error("Upstream error: {0}")]
    UpstreamError(String),

    /// The fetched document is not a recognizable result page.
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl SearchError {
    /// Stable machine-readable name, used in error payloads and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            SearchError::InvalidRequest(_) => "invalid_request",
            SearchError::MissingCredentials(_) => "missing_credentials",
            SearchError::UpstreamError(_) => "upstream_error",
            SearchError::ParseError(_) => "parse_error",
        }
    }
}
