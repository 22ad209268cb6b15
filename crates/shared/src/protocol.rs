use serde::{Deserialize, Serialize};

use crate::domain::Fact;

/// Body of `GET /jokes/search`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub total: u32,
    pub result: Vec<Fact>,
}

/// Error body the API sends alongside non-2xx statuses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FreeTextQuery<'a> {
    pub query: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryQuery<'a> {
    pub category: &'a str,
}
