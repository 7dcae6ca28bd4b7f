//! Session-scoped machine translation of Portuguese answers.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{OraculumError, Result};
use crate::locale::Locale;

pub const DEFAULT_TRANSLATE_ENDPOINT: &str = "https://api.mymemory.translated.net/get";

/// Text containing any of these is returned untranslated
pub const EXCEPTIONS: &[&str] = &[
    "Oraculum Belém",
    "Oráculo Belém",
    "Belém",
    "COP 30",
    "Theatro da Paz",
    "Ver-o-Peso",
    "Mangal das Garças",
    "Tacacá",
    "Maniçoba",
    "Açaí",
    "G1",
    "SAMU",
    "Ibis",
];

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslateResponse {
    response_status: serde_json::Value,
    response_data: Option<ResponseData>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseData {
    translated_text: String,
}

/// Translator over the MyMemory API with a per-session cache
pub struct Translator {
    client: Client,
    endpoint: String,
    cache: Mutex<HashMap<(String, Locale), String>>,
}

impl Default for Translator {
    fn default() -> Self {
        Self::new(DEFAULT_TRANSLATE_ENDPOINT)
    }
}

impl Translator {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .connect_timeout(Duration::from_secs(5))
                .timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_default(),
            endpoint: endpoint.into(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Translate Portuguese `text` into `locale`.
    ///
    /// Never fails: on any error the original text is returned.
    pub async fn translate(&self, text: &str, locale: Locale) -> String {
        if locale.is_default() || text.is_empty() {
            return text.to_string();
        }

        let key = (text.to_string(), locale);
        if let Some(hit) = self.lock().get(&key) {
            return hit.clone();
        }
        if EXCEPTIONS.iter().any(|term| text.contains(term)) {
            debug!("Protected term present, skipping translation");
            return text.to_string();
        }

        match self.fetch(text, locale).await {
            Ok(translated) => {
                self.lock().insert(key, translated.clone());
                translated
            }
            Err(err) => {
                warn!(error = %err, "Translation failed");
                text.to_string()
            }
        }
    }

    pub fn cached(&self) -> usize {
        self.lock().len()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    async fn fetch(&self, text: &str, locale: Locale) -> Result<String> {
        let langpair = format!("pt|{}", locale.code());
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("q", text), ("langpair", langpair.as_str())])
            .send()
            .await
            .map_err(OraculumError::translation)?;

        if !response.status().is_success() {
            return Err(OraculumError::translation(format!("HTTP status {}", response.status())));
        }

        let parsed: TranslateResponse = response.json().await.map_err(OraculumError::translation)?;
        // MyMemory reports the status either as a number or as a string
        let ok = match &parsed.response_status {
            serde_json::Value::Number(n) => n.as_u64() == Some(200),
            serde_json::Value::String(s) => s == "200",
            _ => false,
        };
        match parsed.response_data {
            Some(data) if ok => Ok(data.translated_text),
            _ => Err(OraculumError::translation(format!(
                "rejected with status {}",
                parsed.response_status
            ))),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<(String, Locale), String>> {
        self.cache.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::get, Json, Router};
    use serde_json::json;

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/get", addr)
    }

    #[tokio::test]
    async fn fetch_failures_are_translation_errors() {
        let err = Translator::new("http://127.0.0.1:9/get")
            .fetch("Boa noite", Locale::En)
            .await
            .unwrap_err();
        assert!(matches!(err, OraculumError::TranslationFailed(_)), "{err}");

        let endpoint = serve(Router::new().route(
            "/get",
            get(|| async { Json(json!({"responseStatus": "403", "responseData": null})) }),
        ))
        .await;
        let err = Translator::new(endpoint)
            .fetch("Boa noite", Locale::Es)
            .await
            .unwrap_err();
        assert!(matches!(err, OraculumError::TranslationFailed(_)), "{err}");
        assert_eq!(err.to_string(), "Translation failed: rejected with status \"403\"");
    }
}
