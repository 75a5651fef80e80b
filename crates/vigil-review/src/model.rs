use std::time::Duration;

use async_trait::async_trait;

use vigil_core::{ModelConfig, VigilError};

use crate::capabilities::TextGenerator;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Gemini `generateContent` client implementing [`TextGenerator`].
///
/// Works with any endpoint exposing the Generative Language API shape:
/// request `{"contents":[{"parts":[{"text": …}]}]}`, response text at
/// `candidates[0].content.parts[0].text`.
///
/// # Examples
///
/// ```
/// use vigil_core::ModelConfig;
/// use vigil_review::model::GeminiClient;
///
/// let config = ModelConfig {
///     api_key: Some("test-key".into()),
///     ..ModelConfig::default()
/// };
/// let client = GeminiClient::new(&config).unwrap();
/// assert_eq!(client.model(), "gemini-2.0-flash");
/// ```
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiClient {
    /// Create a new model client from configuration.
    ///
    /// The underlying HTTP client carries a 120-second timeout so a hung
    /// upstream surfaces as [`VigilError::Model`] instead of stalling the
    /// pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`VigilError::Config`] if no API key is configured, or
    /// [`VigilError::Model`] if the HTTP client cannot be built.
    pub fn new(config: &ModelConfig) -> Result<Self, VigilError> {
        let api_key = config.api_key.clone().ok_or_else(|| {
            VigilError::Config(
                "GEMINI_API_KEY not set. Set [model].api_key or the GEMINI_API_KEY env var".into(),
            )
        })?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| VigilError::Model(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            http,
            api_key,
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: config.model.clone(),
        })
    }

    /// Return the model name from the configuration.
    pub fn model(&self) -> &str {
        &self.model
    }

    async fn generate_text(&self, prompt: &str) -> Result<String, VigilError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        let body = serde_json::json!({
            "contents": [{
                "parts": [{ "text": prompt }]
            }]
        });

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| VigilError::Model(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(VigilError::Model(format!(
                "model API error {status}: {body_text}"
            )));
        }

        let response_body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| VigilError::Model(format!("failed to parse response: {e}")))?;

        extract_text(&response_body)
            .map(str::to_string)
            .ok_or_else(|| {
                VigilError::Model(format!("unexpected response structure: {response_body}"))
            })
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, VigilError> {
        self.generate_text(prompt).await
    }
}

/// Pull the generated text out of a `generateContent` response body.
fn extract_text(body: &serde_json::Value) -> Option<&str> {
    body.get("candidates")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.get(0))
        .and_then(|p| p.get("text"))
        .and_then(|t| t.as_str())
}
