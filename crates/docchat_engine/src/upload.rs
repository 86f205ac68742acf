use std::path::Path;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use thiserror::Error;

/// Size ceiling enforced before any bytes leave the machine.
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct UploadSettings {
    pub endpoint: String,
    pub max_bytes: u64,
    pub allowed_extensions: Vec<String>,
    pub request_timeout: Duration,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8000".to_string(),
            max_bytes: MAX_UPLOAD_BYTES,
            allowed_extensions: vec!["pdf".to_string(), "txt".to_string(), "csv".to_string()],
            request_timeout: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("Only PDF, TXT, and CSV files are allowed")]
    UnsupportedKind,
    #[error("File size exceeds {limit_mb}MB limit")]
    TooLarge { limit_mb: u64 },
    #[error("{message}")]
    Server { message: String },
    #[error("failed to read file: {0}")]
    Io(String),
    #[error("network error: {0}")]
    Network(String),
}

#[derive(Deserialize)]
struct UploadEnvelope {
    message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ReqwestUploadClient {
    settings: UploadSettings,
}

impl ReqwestUploadClient {
    pub fn new(settings: UploadSettings) -> Self {
        Self { settings }
    }

    /// Validates locally, then sends the file as multipart form data.
    /// Validation failures return without any network round trip.
    pub async fn upload(&self, path: &Path) -> Result<String, UploadError> {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or(UploadError::UnsupportedKind)?
            .to_string();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .ok_or(UploadError::UnsupportedKind)?;
        if !self
            .settings
            .allowed_extensions
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(&extension))
        {
            return Err(UploadError::UnsupportedKind);
        }

        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|err| UploadError::Io(err.to_string()))?;
        if metadata.len() > self.settings.max_bytes {
            return Err(UploadError::TooLarge {
                limit_mb: self.settings.max_bytes / 1024 / 1024,
            });
        }

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|err| UploadError::Io(err.to_string()))?;
        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(mime_for_extension(&extension))
            .map_err(|err| UploadError::Network(err.to_string()))?;
        let form = Form::new().part("file", part);

        let client = reqwest::Client::builder()
            .timeout(self.settings.request_timeout)
            .build()
            .map_err(|err| UploadError::Network(err.to_string()))?;
        let response = client
            .post(format!("{}/upload", self.settings.endpoint))
            .multipart(form)
            .send()
            .await
            .map_err(|err| UploadError::Network(err.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| UploadError::Network(err.to_string()))?;
        let message = serde_json::from_slice::<UploadEnvelope>(&body)
            .ok()
            .and_then(|envelope| envelope.message);

        if !status.is_success() {
            return Err(UploadError::Server {
                message: message.unwrap_or_else(|| "Failed to upload file".to_string()),
            });
        }
        Ok(message.unwrap_or_else(|| "File uploaded successfully!".to_string()))
    }
}

fn mime_for_extension(extension: &str) -> &'static str {
    match extension {
        "pdf" => "application/pdf",
        "csv" => "text/csv",
        _ => "text/plain",
    }
}
