use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use shared::{
    domain::Fact,
    error::FetchOutcome,
    protocol::{ApiErrorBody, CategoryQuery, FreeTextQuery, SearchResponse},
};
use tracing::{debug, warn};
use url::Url;

use crate::error::FactsClientError;

pub const DEFAULT_API_BASE_URL: &str = "https://api.chucknorris.io/";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Where the coordinator gets its facts from.
///
/// Implementations must resolve every call to exactly one [`FetchOutcome`];
/// timeouts and transport faults are theirs to normalize.
#[async_trait]
pub trait FactsDataSource: Send + Sync {
    async fn fetch_by_free_text(&self, query: &str) -> FetchOutcome<Vec<Fact>>;
    async fn fetch_by_category(&self, category: &str) -> FetchOutcome<Vec<Fact>>;
    async fn fetch_random(&self) -> FetchOutcome<Vec<Fact>>;
    async fn fetch_categories(&self) -> FetchOutcome<Vec<String>>;
}

pub struct HttpFactsDataSource {
    http: Client,
    base_url: Url,
}

impl HttpFactsDataSource {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FactsClientError> {
        let http = Client::builder().timeout(timeout).build()?;
        Self::with_client(http, base_url)
    }

    pub fn with_client(http: Client, base_url: &str) -> Result<Self, FactsClientError> {
        let mut base_url = Url::parse(base_url).map_err(|source| {
            FactsClientError::InvalidBaseUrl {
                url: base_url.to_string(),
                source,
            }
        })?;
        if base_url.cannot_be_a_base() {
            return Err(FactsClientError::OpaqueBaseUrl(base_url.to_string()));
        }
        // Url::join drops the last segment unless the path ends with '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn get_json<T, Q>(&self, path: &str, query: Option<&Q>) -> FetchOutcome<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let url = match self.base_url.join(path) {
            Ok(url) => url,
            Err(err) => {
                warn!(path, error = %err, "facts: could not build request url");
                return FetchOutcome::ServerError;
            }
        };

        let mut request = self.http.get(url.clone());
        if let Some(query) = query {
            request = request.query(query);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => return transport_failure(&url, &err),
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.json::<ApiErrorBody>().await.ok();
            warn!(
                url = %url,
                status = status.as_u16(),
                api_message = body.as_ref().and_then(|b| b.message.as_deref()).unwrap_or(""),
                "facts: API rejected request"
            );
            return FetchOutcome::ApiError {
                status_code: status.as_u16(),
            };
        }

        match response.json::<T>().await {
            Ok(body) => {
                debug!(url = %url, status = status.as_u16(), "facts: response decoded");
                FetchOutcome::Success(body)
            }
            Err(err) if err.is_decode() => {
                warn!(url = %url, error = %err, "facts: response body did not decode");
                FetchOutcome::ServerError
            }
            Err(err) => transport_failure(&url, &err),
        }
    }
}

fn transport_failure<T>(url: &Url, err: &reqwest::Error) -> FetchOutcome<T> {
    if err.is_timeout() || err.is_connect() || err.is_request() || err.is_body() {
        warn!(url = %url, error = %err, "facts: connection lost");
        FetchOutcome::ConnectionError
    } else {
        warn!(url = %url, error = %err, "facts: unexpected transport failure");
        FetchOutcome::ServerError
    }
}

#[async_trait]
impl FactsDataSource for HttpFactsDataSource {
    async fn fetch_by_free_text(&self, query: &str) -> FetchOutcome<Vec<Fact>> {
        self.get_json::<SearchResponse, _>("jokes/search", Some(&FreeTextQuery { query }))
            .await
            .map(|page| page.result)
    }

    async fn fetch_by_category(&self, category: &str) -> FetchOutcome<Vec<Fact>> {
        self.get_json::<Fact, _>("jokes/random", Some(&CategoryQuery { category }))
            .await
            .map(|fact| vec![fact])
    }

    async fn fetch_random(&self) -> FetchOutcome<Vec<Fact>> {
        self.get_json::<Fact, ()>("jokes/random", None)
            .await
            .map(|fact| vec![fact])
    }

    async fn fetch_categories(&self) -> FetchOutcome<Vec<String>> {
        self.get_json::<Vec<String>, ()>("jokes/categories", None).await
    }
}
