use std::time::Duration;

use futures_util::StreamExt;
use grocery_logging::grocery_debug;
use reqwest::header::{HeaderMap, CONTENT_TYPE};

use crate::decode::decode_text;
use crate::http::{build_client, map_reqwest_error, success_or_status};
use crate::{ApiError, FailureKind};

const EXPORT_SUFFIX: &str = "/export?format=txt";

#[derive(Debug, Clone)]
pub struct DocumentSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl Default for DocumentSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_bytes: 1024 * 1024,
        }
    }
}

/// Plain-text export URL of a shared document.
///
/// `.../d/{id}/edit#heading` becomes `.../d/{id}/export?format=txt`; a URL
/// without `/edit` gets the export suffix appended.
pub fn export_url(doc_url: &str) -> String {
    let doc_url = doc_url.trim();
    match edit_segment(doc_url) {
        Some(idx) => format!("{}{EXPORT_SUFFIX}", &doc_url[..idx]),
        None => format!("{}{EXPORT_SUFFIX}", doc_url.trim_end_matches('/')),
    }
}

/// Byte offset of an `/edit` path segment; `/editorial` does not count.
fn edit_segment(url: &str) -> Option<usize> {
    url.match_indices("/edit").map(|(idx, _)| idx).find(|idx| {
        matches!(
            url[idx + "/edit".len()..].chars().next(),
            None | Some('?' | '#' | '/')
        )
    })
}

#[async_trait::async_trait]
pub trait DocumentSource: Send + Sync {
    async fn fetch_document(&self, url: &str) -> Result<String, ApiError>;
}

/// Downloads a document's plain-text export.
#[derive(Debug, Clone)]
pub struct ReqwestDocumentSource {
    client: reqwest::Client,
    settings: DocumentSettings,
}

impl ReqwestDocumentSource {
    pub fn new(settings: DocumentSettings) -> Result<Self, ApiError> {
        let client = build_client(
            settings.connect_timeout,
            settings.request_timeout,
            HeaderMap::new(),
        )?;
        Ok(Self { client, settings })
    }

    fn too_large(&self, actual: u64) -> ApiError {
        ApiError::new(
            FailureKind::TooLarge {
                max_bytes: self.settings.max_bytes,
                actual: Some(actual),
            },
            "document too large",
        )
    }
}

#[async_trait::async_trait]
impl DocumentSource for ReqwestDocumentSource {
    async fn fetch_document(&self, url: &str) -> Result<String, ApiError> {
        let export = export_url(url);
        let parsed = reqwest::Url::parse(&export)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))?;
        grocery_debug!("GET {}", parsed);

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let response = success_or_status(response).await?;

        if let Some(len) = response.content_length() {
            if len > self.settings.max_bytes {
                return Err(self.too_large(len));
            }
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = (bytes.len() + chunk.len()) as u64;
            if next_len > self.settings.max_bytes {
                return Err(self.too_large(next_len));
            }
            bytes.extend_from_slice(&chunk);
        }

        decode_text(&bytes, content_type.as_deref())
            .map(|decoded| decoded.text)
            .map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))
    }
}
