use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};

use super::extractor::extract_structured_object;
use super::prompts::make_intent_prompt;
use crate::core::config::GeminiSettings;
use crate::core::errors::ApiError;
use crate::llm::{GenerateRequest, HarmBlockThreshold, HarmCategory, LlmProvider};

/// Structured reading of a free-text query. Absent fields are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QueryIntent {
    pub medicine_name: String,
    pub medicine_composition: String,
    pub disease: String,
}

impl QueryIntent {
    /// Reads the three known keys; missing or non-string values become empty.
    pub fn from_object(object: &Map<String, Value>) -> Self {
        let field = |key: &str| {
            object
                .get(key)
                .and_then(Value::as_str)
                .map(|v| v.trim().to_string())
                .unwrap_or_default()
        };

        Self {
            medicine_name: field("medicine_name"),
            medicine_composition: field("medicine_composition"),
            disease: field("disease"),
        }
    }

    pub fn has_disease(&self) -> bool {
        !self.disease.is_empty()
    }
}

/// First hop: asks the model to classify the query, then decodes its answer.
pub struct IntentInterpreter {
    llm: Arc<dyn LlmProvider>,
    settings: Option<GeminiSettings>,
}

impl IntentInterpreter {
    pub fn new(llm: Arc<dyn LlmProvider>, settings: Option<GeminiSettings>) -> Self {
        Self { llm, settings }
    }

    pub async fn interpret(&self, query: &str) -> Result<QueryIntent, ApiError> {
        let mut request = GenerateRequest::new(make_intent_prompt(query))
            .with_safety(HarmCategory::DangerousContent, HarmBlockThreshold::BlockNone);
        if let Some(settings) = &self.settings {
            request = request.with_config(settings);
        }

        let output = self.llm.generate(request).await?;
        let object = extract_structured_object(&output).map_err(|err| {
            tracing::warn!("Could not decode intent from {}: {}", self.llm.name(), err);
            tracing::debug!("Raw intent output: {}", output);
            ApiError::from(err)
        })?;

        Ok(QueryIntent::from_object(&object))
    }
}
