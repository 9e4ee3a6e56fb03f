use std::time::Duration;

use grocery_logging::{grocery_debug, grocery_warn};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;

use crate::http::{build_client, map_reqwest_error, secret_header, success_or_status};
use crate::{ApiError, FailureKind};

#[derive(Debug, Clone)]
pub struct TranslateSettings {
    pub api_url: String,
    pub api_key: Option<String>,
    pub source_lang: String,
    pub target_lang: String,
    pub request_timeout: Duration,
}

impl Default for TranslateSettings {
    fn default() -> Self {
        Self {
            api_url: "https://api-free.deepl.com/v2/translate".to_string(),
            api_key: None,
            source_lang: "ES".to_string(),
            target_lang: "EN".to_string(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

#[async_trait::async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str) -> Result<String, ApiError>;
}

/// Translation through the DeepL REST API.
#[derive(Debug, Clone)]
pub struct DeeplTranslator {
    client: reqwest::Client,
    settings: TranslateSettings,
}

#[derive(Debug, Deserialize)]
struct DeeplResponse {
    translations: Vec<DeeplTranslation>,
}

#[derive(Debug, Deserialize)]
struct DeeplTranslation {
    text: String,
}

impl DeeplTranslator {
    /// A missing key is not fatal here; every `translate` call then fails.
    pub fn new(settings: TranslateSettings) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        if let Some(key) = settings.api_key.as_deref().filter(|key| !key.is_empty()) {
            headers.insert(AUTHORIZATION, secret_header(format!("DeepL-Auth-Key {key}"))?);
        }
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded"),
        );
        let client = build_client(Duration::from_secs(10), settings.request_timeout, headers)?;
        Ok(Self { client, settings })
    }
}

#[async_trait::async_trait]
impl Translator for DeeplTranslator {
    async fn translate(&self, text: &str) -> Result<String, ApiError> {
        if self.settings.api_key.as_deref().map_or(true, str::is_empty) {
            return Err(ApiError::new(
                FailureKind::InvalidRequest,
                "no translation api key configured",
            ));
        }
        let url = reqwest::Url::parse(&self.settings.api_url)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))?;
        let body = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("text", text)
            .append_pair("source_lang", &self.settings.source_lang)
            .append_pair("target_lang", &self.settings.target_lang)
            .finish();
        grocery_debug!("POST {} chars={}", url, text.chars().count());

        let response = self
            .client
            .post(url)
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let parsed: DeeplResponse = success_or_status(response)
            .await?
            .json()
            .await
            .map_err(map_reqwest_error)?;
        parsed
            .translations
            .into_iter()
            .next()
            .map(|translation| translation.text)
            .ok_or_else(|| ApiError::new(FailureKind::MissingField("translations"), "empty"))
    }
}

/// Translates `text`, handing back the input unchanged when translation fails.
pub async fn translate_or_original(translator: &dyn Translator, text: &str) -> String {
    match translator.translate(text).await {
        Ok(translated) => translated,
        Err(err) => {
            grocery_warn!("translation failed, keeping original text: {}", err);
            text.to_string()
        }
    }
}
