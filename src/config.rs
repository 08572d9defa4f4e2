use dotenvy::dotenv;
use once_cell::sync::Lazy;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::SearchError;

pub const AMAZON_ORIGIN: &str = "https://www.amazon.com";

const DEFAULT_PROXY_HOST: &str = "brd.superproxy.io";
const DEFAULT_PROXY_PORT: u16 = 22225;
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

pub static CONFIG: Lazy<Config> = Lazy::new(|| {
    dotenv().ok(); // Load .env file if present
    Config::from_env()
});

/// How the data source is picked when a request arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Use credentials when present, otherwise fall back to mock data.
    Auto,
    /// Always serve mock data.
    Mock,
    /// Always hit the upstream; missing credentials are an error.
    Live,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub zone: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub proxy_host: String,
    pub proxy_port: u16,
    pub ca_cert_path: Option<PathBuf>,
    pub timeout: Duration,
    pub mode: SearchMode,
    pub bind_addr: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            endpoint: None,
            api_key: None,
            zone: None,
            username: None,
            password: None,
            proxy_host: DEFAULT_PROXY_HOST.to_string(),
            proxy_port: DEFAULT_PROXY_PORT,
            ca_cert_path: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            mode: SearchMode::Auto,
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Config {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Config
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mode = match get("SEARCH_MODE").map(|m| m.to_lowercase()).as_deref() {
            None | Some("auto") => SearchMode::Auto,
            Some("mock") => SearchMode::Mock,
            Some("live") => SearchMode::Live,
            Some(other) => {
                log::warn!("unknown SEARCH_MODE '{other}', using auto");
                SearchMode::Auto
            }
        };

        Config {
            endpoint: get("BRIGHTDATA_ENDPOINT"),
            api_key: get("BRIGHTDATA_API_KEY"),
            zone: get("BRIGHTDATA_ZONE"),
            username: get("BRIGHTDATA_USERNAME"),
            password: get("BRIGHTDATA_PASSWORD"),
            proxy_host: get("BRIGHTDATA_PROXY_HOST")
                .unwrap_or_else(|| DEFAULT_PROXY_HOST.to_string()),
            proxy_port: parse_or_default(
                "BRIGHTDATA_PROXY_PORT",
                get("BRIGHTDATA_PROXY_PORT"),
                DEFAULT_PROXY_PORT,
            ),
            ca_cert_path: get("BRIGHTDATA_CA_CERT_PATH").map(PathBuf::from),
            timeout: Duration::from_secs(parse_or_default(
                "BRIGHTDATA_TIMEOUT_SECS",
                get("BRIGHTDATA_TIMEOUT_SECS"),
                DEFAULT_TIMEOUT_SECS,
            )),
            mode,
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
        }
    }
}

fn parse_or_default<T>(key: &str, raw: Option<String>, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display,
{
    match raw {
        None => default,
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            log::warn!("invalid {key} '{raw}', using {default}");
            default
        }),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectApiCredentials {
    pub endpoint: String,
    pub api_key: String,
    pub zone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyCredentials {
    pub username: String,
    pub password: String,
    pub host: String,
    pub port: u16,
}

/// Where products for a request come from, decided once per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    DirectApi(DirectApiCredentials),
    Proxy(ProxyCredentials),
    Mock,
}

impl DataSource {
    pub fn resolve(config: &Config) -> Result<DataSource, SearchError> {
        if config.mode == SearchMode::Mock {
            return Ok(DataSource::Mock);
        }

        if let (Some(endpoint), Some(api_key)) = (&config.endpoint, &config.api_key) {
            return Ok(DataSource::DirectApi(DirectApiCredentials {
                endpoint: endpoint.clone(),
                api_key: api_key.clone(),
                zone: config.zone.clone(),
            }));
        }

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            return Ok(DataSource::Proxy(ProxyCredentials {
                username: username.clone(),
                password: password.clone(),
                host: config.proxy_host.clone(),
                port: config.proxy_port,
            }));
        }

        match config.mode {
            SearchMode::Live => Err(SearchError::MissingCredentials(
                "Bright Data credentials not configured. Set BRIGHTDATA_ENDPOINT and \
                 BRIGHTDATA_API_KEY, or BRIGHTDATA_USERNAME and BRIGHTDATA_PASSWORD."
                    .to_string(),
            )),
            _ => Ok(DataSource::Mock),
        }
    }
}
