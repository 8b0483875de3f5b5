//! Typed consumer of the search endpoint, for dashboards and the terminal browser.

pub mod render;
pub mod session;

use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::errors::ErrorBody;
use crate::models::{Direction, NavigationResponse};

pub use session::{BrowseSession, Debouncer, RequestSequencer, SessionOutcome, Ticket};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid base url: {0}")]
    Url(#[from] url::ParseError),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("{error} ({status}): {details}")]
    Api {
        status: StatusCode,
        error: String,
        details: String,
    },
}

/// Anything that can answer a company search the way the HTTP endpoint does.
#[async_trait]
pub trait CompanySearch: Send + Sync {
    async fn search_companies(
        &self,
        term: Option<&str>,
        direction: Option<Direction>,
    ) -> Result<Vec<NavigationResponse>, ClientError>;
}

#[derive(Clone)]
pub struct DashboardClient {
    http: reqwest::Client,
    search_url: Url,
}

impl DashboardClient {
    /// `base_url` is the server root, e.g. `http://localhost:5001`.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: &str) -> Result<Self, ClientError> {
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(Self {
            http,
            search_url: base.join("api/companies/search")?,
        })
    }

    pub fn search_url(&self) -> &Url {
        &self.search_url
    }
}

#[async_trait]
impl CompanySearch for DashboardClient {
    async fn search_companies(
        &self,
        term: Option<&str>,
        direction: Option<Direction>,
    ) -> Result<Vec<NavigationResponse>, ClientError> {
        let mut params: Vec<(&str, &str)> = Vec::new();
        if let Some(term) = term.filter(|t| !t.is_empty()) {
            params.push(("term", term));
        }
        if let Some(direction) = direction {
            params.push(("direction", direction.as_str()));
        }

        debug!("GET {} {:?}", self.search_url, params);

        let response = self
            .http
            .get(self.search_url.clone())
            .query(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let body = serde_json::from_str::<ErrorBody>(&text).unwrap_or(ErrorBody {
                error: status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string(),
                details: text,
            });
            return Err(ClientError::Api {
                status,
                error: body.error,
                details: body.details,
            });
        }

        Ok(response.json::<Vec<NavigationResponse>>().await?)
    }
}
