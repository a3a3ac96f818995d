use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::http_client::HttpClientTrait;
use crate::domain::{DomainError, LanguageModel, Message, MessageRole};

const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

const PROVIDER: &str = "gemini";

/// Google Gemini `generateContent` model.
///
/// System messages become the top-level `systemInstruction`; the assistant
/// role is sent as `"model"`.
#[derive(Debug)]
pub struct GeminiProvider<C: HttpClientTrait> {
    client: C,
    api_key: String,
    base_url: String,
    model: String,
}

impl<C: HttpClientTrait> GeminiProvider<C> {
    pub fn new(client: C, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self::with_base_url(client, api_key, model, DEFAULT_GEMINI_BASE_URL)
    }

    pub fn with_base_url(
        client: C,
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        }
    }

    fn generate_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![
            ("x-goog-api-key", self.api_key.as_str()),
            ("Content-Type", "application/json"),
        ]
    }

    fn build_request(&self, messages: &[Message], temperature: f32) -> Value {
        let system: Vec<&str> = messages
            .iter()
            .filter(|m| m.role == MessageRole::System)
            .map(Message::content_text)
            .collect();

        // Gemini rejects consecutive turns with the same role, so merge them
        let mut contents: Vec<(&'static str, Vec<Value>)> = Vec::new();
        for message in messages.iter().filter(|m| m.role != MessageRole::System) {
            let role = match message.role {
                MessageRole::Assistant => "model",
                _ => "user",
            };
            let part = serde_json::json!({ "text": message.content_text() });

            match contents.last_mut() {
                Some((last_role, parts)) if *last_role == role => parts.push(part),
                _ => contents.push((role, vec![part])),
            }
        }

        let contents: Vec<Value> = contents
            .into_iter()
            .map(|(role, parts)| serde_json::json!({ "role": role, "parts": parts }))
            .collect();

        let mut body = serde_json::json!({
            "contents": contents,
            "generationConfig": { "temperature": temperature },
        });

        if !system.is_empty() {
            body["systemInstruction"] = serde_json::json!({
                "parts": [{ "text": system.join("\n\n") }]
            });
        }

        body
    }

    fn parse_response(&self, json: Value) -> Result<String, DomainError> {
        let Some(candidate) = json["candidates"].as_array().and_then(|c| c.first()) else {
            let reason = json["promptFeedback"]["blockReason"]
                .as_str()
                .unwrap_or("no candidates returned");
            return Err(DomainError::provider(
                PROVIDER,
                format!("Empty response: {}", reason),
            ));
        };

        let text: String = candidate["content"]["parts"]
            .as_array()
            .map(|parts| parts.iter().filter_map(|p| p["text"].as_str()).collect())
            .unwrap_or_default();

        if let Some(usage) = json.get("usageMetadata") {
            debug!(
                prompt_tokens = usage["promptTokenCount"].as_u64().unwrap_or(0),
                completion_tokens = usage["candidatesTokenCount"].as_u64().unwrap_or(0),
                "Gemini usage"
            );
        }

        Ok(text)
    }
}

#[async_trait]
impl<C: HttpClientTrait> LanguageModel for GeminiProvider<C> {
    async fn generate(&self, messages: &[Message], temperature: f32) -> Result<String, DomainError> {
        let url = self.generate_url();
        let body = self.build_request(messages, temperature);
        let response = self
            .client
            .post_json(&url, self.headers(), &body)
            .await
            .map_err(|e| e.for_provider(PROVIDER))?;

        self.parse_response(response)
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }

    fn model(&self) -> &str {
        &self.model
    }
}
