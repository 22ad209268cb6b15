use thiserror::Error;

/// Result of one fetch against the facts API.
///
/// Every failure mode is normalized into one of these variants before it
/// leaves a data source, so callers never see a transport error directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome<T> {
    Success(T),
    ApiError { status_code: u16 },
    ConnectionError,
    ServerError,
}

impl<T> FetchOutcome<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> FetchOutcome<U> {
        match self {
            Self::Success(data) => FetchOutcome::Success(f(data)),
            Self::ApiError { status_code } => FetchOutcome::ApiError { status_code },
            Self::ConnectionError => FetchOutcome::ConnectionError,
            Self::ServerError => FetchOutcome::ServerError,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Short tag used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Success(_) => "success",
            Self::ApiError { .. } => "api_error",
            Self::ConnectionError => "connection_error",
            Self::ServerError => "server_error",
        }
    }

    pub fn into_result(self) -> Result<T, FetchFailure> {
        match self {
            Self::Success(data) => Ok(data),
            Self::ApiError { status_code } => Err(FetchFailure::Api { status_code }),
            Self::ConnectionError => Err(FetchFailure::Connection),
            Self::ServerError => Err(FetchFailure::Server),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FetchFailure {
    #[error("facts API answered with status {status_code}")]
    Api { status_code: u16 },
    #[error("lost connection to the facts API")]
    Connection,
    #[error("facts API returned an unreadable response")]
    Server,
}
