//! External translation provider interface and the DeepL implementation.

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

/// Errors from the external translation provider.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Transport-level failure (connection, timeout, TLS).
    #[error("translation request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider answered with a non-success status (quota, auth, ...).
    #[error("provider returned {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The provider answered 200 but with no translation payload.
    #[error("provider response contained no translations")]
    EmptyResponse,
}

/// A text-batch translation service.
///
/// One call translates one delimited text blob into `target_lang`. The
/// provider is free to detect the source language when `source_lang` is
/// `None`.
pub trait Translator {
    /// Translate `text` into `target_lang`.
    fn translate(
        &self,
        text: &str,
        source_lang: Option<&str>,
        target_lang: &str,
    ) -> impl Future<Output = Result<String, ProviderError>> + Send;
}

/// DeepL REST API client.
///
/// Uses the v2 `/translate` endpoint with a `DeepL-Auth-Key` header.
#[derive(Debug, Clone)]
pub struct DeepLTranslator {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
}

const DEEPL_FREE_ENDPOINT: &str = "https://api-free.deepl.com/v2/translate";

#[derive(Serialize)]
struct TranslateRequest<'a> {
    text: Vec<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    source_lang: Option<String>,
    target_lang: String,
}

#[derive(Deserialize)]
struct TranslateResponse {
    translations: Vec<TranslationItem>,
}

#[derive(Deserialize)]
struct TranslationItem {
    text: String,
}

impl DeepLTranslator {
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            endpoint: DEEPL_FREE_ENDPOINT.to_string(),
        }
    }

    /// Override the API endpoint (paid-tier host, or a test server).
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

impl Translator for DeepLTranslator {
    async fn translate(
        &self,
        text: &str,
        source_lang: Option<&str>,
        target_lang: &str,
    ) -> Result<String, ProviderError> {
        let request = TranslateRequest {
            text: vec![text],
            // DeepL expects upper-case language codes.
            source_lang: source_lang.map(str::to_uppercase),
            target_lang: target_lang.to_uppercase(),
        };

        tracing::debug!(target_lang = %target_lang, "Sending translation request");

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("DeepL-Auth-Key {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%status, "Provider returned an error");
            return Err(ProviderError::Api { status, body });
        }

        let parsed: TranslateResponse = response.json().await?;
        let mut items = parsed.translations.into_iter();
        match items.next() {
            Some(item) => Ok(item.text),
            None => Err(ProviderError::EmptyResponse),
        }
    }
}
