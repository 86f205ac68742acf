use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::{QueryError, QueryFailureKind, QueryResponse, SourceSnippet};

/// Placeholder answer text when the endpoint settles successfully but the
/// payload carries no usable answer field.
pub const FALLBACK_ANSWER: &str = "No answer provided";

const FALLBACK_DOCUMENT_LABEL: &str = "Document";

#[derive(Debug, Clone)]
pub struct QuerySettings {
    pub endpoint: String,
    pub connect_timeout: Duration,
    /// Transport-level bound on the whole call; the controller keeps its own
    /// deadline on top of this.
    pub request_timeout: Duration,
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(60),
        }
    }
}

#[async_trait::async_trait]
pub trait QueryClient: Send + Sync {
    /// Asks one question against a fixed document scope. Resolves to exactly
    /// one outcome; triggering `cancel` aborts the call cooperatively.
    async fn ask(
        &self,
        question: &str,
        scope: &[String],
        cancel: &CancellationToken,
    ) -> Result<QueryResponse, QueryError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestQueryClient {
    settings: QuerySettings,
}

#[derive(Serialize)]
struct QueryRequestBody<'a> {
    question: &'a str,
    documents: &'a [String],
}

#[derive(Deserialize, Default)]
struct QueryEnvelope {
    #[serde(default)]
    data: Option<QueryData>,
}

#[derive(Deserialize, Default)]
struct QueryData {
    answer: Option<String>,
    #[serde(default)]
    sources: Vec<SourceEntry>,
}

#[derive(Deserialize)]
struct SourceEntry {
    content: Option<String>,
    #[serde(default)]
    metadata: SourceMetadata,
}

#[derive(Deserialize, Default)]
struct SourceMetadata {
    source: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    message: Option<String>,
}

impl ReqwestQueryClient {
    pub fn new(settings: QuerySettings) -> Self {
        Self { settings }
    }

    fn build_client(&self) -> Result<reqwest::Client, QueryError> {
        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .build()
            .map_err(|err| QueryError::new(QueryFailureKind::Network, err.to_string()))
    }

    async fn ask_inner(&self, question: &str, scope: &[String]) -> Result<QueryResponse, QueryError> {
        let client = self.build_client()?;
        let response = client
            .post(format!("{}/query", self.settings.endpoint))
            .json(&QueryRequestBody {
                question,
                documents: scope,
            })
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_reqwest_error)?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorEnvelope>(&body)
                .ok()
                .and_then(|envelope| envelope.message);
            return Err(QueryError::new(
                QueryFailureKind::Server { message },
                status.to_string(),
            ));
        }

        let envelope: QueryEnvelope = serde_json::from_slice(&body).map_err(|err| {
            QueryError::new(QueryFailureKind::Server { message: None }, err.to_string())
        })?;
        Ok(response_from_envelope(envelope))
    }
}

fn response_from_envelope(envelope: QueryEnvelope) -> QueryResponse {
    let data = envelope.data.unwrap_or_default();
    QueryResponse {
        answer: data
            .answer
            .unwrap_or_else(|| FALLBACK_ANSWER.to_string()),
        sources: data
            .sources
            .into_iter()
            .map(|entry| SourceSnippet {
                content: entry.content.unwrap_or_default(),
                document: entry
                    .metadata
                    .source
                    .unwrap_or_else(|| FALLBACK_DOCUMENT_LABEL.to_string()),
            })
            .collect(),
    }
}

#[async_trait::async_trait]
impl QueryClient for ReqwestQueryClient {
    async fn ask(
        &self,
        question: &str,
        scope: &[String],
        cancel: &CancellationToken,
    ) -> Result<QueryResponse, QueryError> {
        tokio::select! {
            _ = cancel.cancelled() => {
                Err(QueryError::new(QueryFailureKind::Cancelled, "aborted by caller"))
            }
            result = self.ask_inner(question, scope) => result,
        }
    }
}

fn map_reqwest_error(err: reqwest::Error) -> QueryError {
    if err.is_timeout() {
        return QueryError::new(QueryFailureKind::Timeout, err.to_string());
    }
    QueryError::new(QueryFailureKind::Network, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::{response_from_envelope, QueryEnvelope, FALLBACK_ANSWER};

    #[test]
    fn missing_data_falls_back_to_placeholder_answer() {
        let response = response_from_envelope(QueryEnvelope::default());
        assert_eq!(response.answer, FALLBACK_ANSWER);
        assert!(response.sources.is_empty());
    }

    #[test]
    fn missing_source_metadata_gets_generic_label() {
        let envelope: QueryEnvelope = serde_json::from_str(
            r#"{"data":{"answer":"ok","sources":[{"content":"snippet"}]}}"#,
        )
        .unwrap();
        let response = response_from_envelope(envelope);
        assert_eq!(response.sources.len(), 1);
        assert_eq!(response.sources[0].document, "Document");
        assert_eq!(response.sources[0].content, "snippet");
    }
}
