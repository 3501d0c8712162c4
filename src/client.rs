use crate::error::ApiError;
use crate::model::{ServiceStatus, StatisticsSnapshot, parse_statistics, parse_status};
use reqwest::Url;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, HeaderValue};
use std::fmt;

const USER_AGENT: &str = concat!("pihole-stats/", env!("CARGO_PKG_VERSION"));

/// The four `api.php` actions this tool knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Summary,
    Status,
    Enable,
    Disable,
}

impl Endpoint {
    /// Key-only query parameter selecting the action.
    pub fn query_key(&self) -> &'static str {
        match self {
            Self::Summary => "summary",
            Self::Status => "status",
            Self::Enable => "enable",
            Self::Disable => "disable",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.query_key())
    }
}

/// Something that can perform one authenticated call against an endpoint
/// and hand back the raw body.
pub trait Transport {
    fn fetch(&self, endpoint: Endpoint) -> Result<Vec<u8>, ApiError>;

    fn summary(&self) -> Result<StatisticsSnapshot, ApiError> {
        parse_statistics(&self.fetch(Endpoint::Summary)?)
    }

    fn status(&self) -> Result<ServiceStatus, ApiError> {
        parse_status(&self.fetch(Endpoint::Status)?)
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    api_url: Url,
    http: Client,
    api_token: String,
}

impl ApiClient {
    /// `base_url` is the admin console URL (e.g. `http://pi.hole/admin`);
    /// requests go to `<base_url>/api.php`.
    pub fn new(base_url: &str, api_token: &str) -> Result<Self, ApiError> {
        let api_url = Url::parse(&format!("{}/api.php", base_url.trim_end_matches('/')))
            .map_err(|source| ApiError::InvalidUrl {
                url: base_url.to_string(),
                source,
            })?;
        let http = Client::builder()
            .user_agent(HeaderValue::from_static(USER_AGENT))
            .build()
            .map_err(|source| ApiError::Transport {
                context: "building HTTP client".into(),
                source,
            })?;

        Ok(Self {
            api_url,
            http,
            api_token: api_token.to_string(),
        })
    }

    pub fn endpoint_url(&self, endpoint: Endpoint) -> Url {
        let mut url = self.api_url.clone();
        url.query_pairs_mut()
            .append_key_only(endpoint.query_key())
            .append_pair("auth", &self.api_token);
        url
    }
}

impl Transport for ApiClient {
    fn fetch(&self, endpoint: Endpoint) -> Result<Vec<u8>, ApiError> {
        log::debug!("GET {} ({})", self.api_url, endpoint);

        let response = self
            .http
            .get(self.endpoint_url(endpoint))
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|source| ApiError::Transport {
                context: format!("sending {endpoint} request"),
                source: source.without_url(),
            })?;

        log::trace!("{} answered {}", endpoint, response.status());
        let body = response.bytes().map_err(|source| ApiError::Transport {
            context: format!("reading {endpoint} response body"),
            source: source.without_url(),
        })?;
        Ok(body.to_vec())
    }
}
