use thiserror::Error;

#[derive(Debug, Error)]
pub enum FactsClientError {
    #[error("invalid facts API base url '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("facts API base url '{0}' cannot carry a path")]
    OpaqueBaseUrl(String),
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}
