use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListError {
    #[error("network error: {0}")]
    Network(String),
    #[error("{0}")]
    Server(String),
}

#[derive(Deserialize, Default)]
struct DocumentsEnvelope {
    #[serde(default)]
    data: Option<DocumentsData>,
}

#[derive(Deserialize, Default)]
struct DocumentsData {
    #[serde(default)]
    documents: Vec<String>,
}

/// Fetches the labels of all documents available for querying.
#[derive(Debug, Clone)]
pub struct DocumentListClient {
    endpoint: String,
    request_timeout: Duration,
}

impl DocumentListClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            request_timeout: Duration::from_secs(30),
        }
    }

    pub async fn list(&self) -> Result<Vec<String>, ListError> {
        let client = reqwest::Client::builder()
            .timeout(self.request_timeout)
            .build()
            .map_err(|err| ListError::Network(err.to_string()))?;
        let response = client
            .get(format!("{}/documents", self.endpoint))
            .send()
            .await
            .map_err(|err| ListError::Network(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ListError::Server(status.to_string()));
        }

        let envelope: DocumentsEnvelope = response
            .json()
            .await
            .map_err(|err| ListError::Network(err.to_string()))?;
        Ok(envelope.data.unwrap_or_default().documents)
    }
}
