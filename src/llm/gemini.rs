use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use super::provider::LlmProvider;
use super::types::GenerateRequest;
use crate::core::config::GeminiSettings;
use crate::core::errors::ApiError;
use crate::core::upstream::{call_with_policy, CallPolicy};

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Clone)]
pub struct GeminiProvider {
    base_url: String,
    model: String,
    api_key: String,
    client: Client,
    policy: CallPolicy,
}

impl GeminiProvider {
    pub fn new(base_url: String, model: String, api_key: String, policy: CallPolicy) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            api_key,
            client: Client::new(),
            policy,
        }
    }

    pub fn from_settings(settings: &GeminiSettings) -> Result<Self, ApiError> {
        let api_key = settings
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                ApiError::Internal(
                    "Gemini API key is not configured (set GEMINI_API_KEY or gemini.api_key)"
                        .to_string(),
                )
            })?;

        Ok(Self::new(
            settings.base_url.clone(),
            settings.model.clone(),
            api_key.to_string(),
            CallPolicy::new(settings.timeout_secs, settings.max_retries),
        ))
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    async fn generate_once(&self, body: &Value) -> Result<String, ApiError> {
        let res = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(ApiError::upstream)?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(ApiError::Upstream(format!(
                "Gemini error ({}): {}",
                status, text
            )));
        }

        let payload: Value = res.json().await.map_err(ApiError::upstream)?;
        extract_candidate_text(&payload)
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, request: GenerateRequest) -> Result<String, ApiError> {
        let body = build_request_body(&request);
        let body = &body;
        call_with_policy("gemini", self.policy, move || self.generate_once(body)).await
    }
}

pub(crate) fn build_request_body(request: &GenerateRequest) -> Value {
    let mut body = json!({
        "contents": [{
            "role": "user",
            "parts": [{ "text": request.prompt }]
        }]
    });

    if let Some(obj) = body.as_object_mut() {
        if !request.safety_settings.is_empty() {
            obj.insert("safetySettings".to_string(), json!(request.safety_settings));
        }

        let mut generation = serde_json::Map::new();
        if let Some(temperature) = request.temperature {
            generation.insert("temperature".to_string(), json!(temperature));
        }
        if let Some(max_tokens) = request.max_output_tokens {
            generation.insert("maxOutputTokens".to_string(), json!(max_tokens));
        }
        if !generation.is_empty() {
            obj.insert("generationConfig".to_string(), Value::Object(generation));
        }
    }

    body
}

/// Concatenates the text parts of the first candidate.
pub(crate) fn extract_candidate_text(payload: &Value) -> Result<String, ApiError> {
    let Some(candidate) = payload["candidates"].as_array().and_then(|c| c.first()) else {
        let reason = payload["promptFeedback"]["blockReason"]
            .as_str()
            .unwrap_or("no candidates returned");
        return Err(ApiError::Upstream(format!(
            "Gemini returned no answer: {}",
            reason
        )));
    };

    let text: String = candidate["content"]["parts"]
        .as_array()
        .map(|parts| {
            parts
                .iter()
                .filter_map(|part| part["text"].as_str())
                .collect()
        })
        .unwrap_or_default();

    if text.is_empty() {
        let reason = candidate["finishReason"].as_str().unwrap_or("empty response");
        return Err(ApiError::Upstream(format!(
            "Gemini returned no text: {}",
            reason
        )));
    }

    Ok(text)
}
