use std::sync::Arc;

use serde_json::{Map, Value};

use super::prompts::make_answer_prompt;
use crate::core::config::GeminiSettings;
use crate::core::errors::ApiError;
use crate::llm::{GenerateRequest, LlmProvider};

/// Records summarised into the answer prompt, whatever the retrieval limit.
pub const CONTEXT_RECORD_CAP: usize = 5;

const MISSING: &str = "N/A";

fn field_text(record: &Map<String, Value>, key: &str) -> String {
    match record.get(key) {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Null) | None => MISSING.to_string(),
        Some(other) => other.to_string(),
    }
}

/// One `- Name: ..., Composition: ..., Uses: ...` line per record, capped.
pub fn summarize_records(records: &[Map<String, Value>]) -> Vec<String> {
    records
        .iter()
        .take(CONTEXT_RECORD_CAP)
        .map(|record| {
            format!(
                "- Name: {}, Composition: {}, Uses: {}",
                field_text(record, "medicine_name"),
                field_text(record, "composition"),
                field_text(record, "uses")
            )
        })
        .collect()
}

/// Second hop: turns the query and retrieved records into a prose answer.
pub struct AnswerSynthesizer {
    llm: Arc<dyn LlmProvider>,
    settings: Option<GeminiSettings>,
}

impl AnswerSynthesizer {
    pub fn new(llm: Arc<dyn LlmProvider>, settings: Option<GeminiSettings>) -> Self {
        Self { llm, settings }
    }

    pub async fn synthesize(
        &self,
        query: &str,
        records: &[Map<String, Value>],
    ) -> Result<String, ApiError> {
        let lines = summarize_records(records);
        let mut request = GenerateRequest::new(make_answer_prompt(query, &lines));
        if let Some(settings) = &self.settings {
            request = request.with_config(settings);
        }
        self.llm.generate(request).await
    }
}
