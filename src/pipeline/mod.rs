//! Query → intent → retrieval → answer.
//!
//! `AnswerPipeline` wires the two model calls around the retrieval router.
//! Each request runs independently; the only shared state is the read-only
//! catalog and the thread-safe provider clients.

pub mod extractor;
pub mod intent;
pub mod prompts;
pub mod retrieval;
pub mod synthesizer;

use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::catalog::CatalogStore;
use crate::core::config::GeminiSettings;
use crate::core::errors::ApiError;
use crate::llm::LlmProvider;
use crate::vector::VectorStore;

pub use extractor::{extract_structured_object, ExtractError};
pub use intent::{IntentInterpreter, QueryIntent};
pub use retrieval::{RetrievalResult, RetrievalRouter, RetrievalSource};
pub use synthesizer::AnswerSynthesizer;

/// Body of a successful `/answer` response.
#[derive(Debug, Clone, Serialize)]
pub struct AnswerPayload {
    /// Every retrieved record, not just the ones summarised for the model.
    pub data: Vec<Map<String, Value>>,
    pub gemini_answer: String,
}

pub struct AnswerPipeline {
    interpreter: IntentInterpreter,
    router: RetrievalRouter,
    synthesizer: AnswerSynthesizer,
}

impl AnswerPipeline {
    pub fn new(
        llm: Arc<dyn LlmProvider>,
        vectors: Arc<dyn VectorStore>,
        catalog: Arc<CatalogStore>,
        settings: Option<GeminiSettings>,
    ) -> Self {
        Self {
            interpreter: IntentInterpreter::new(llm.clone(), settings.clone()),
            router: RetrievalRouter::new(catalog, vectors),
            synthesizer: AnswerSynthesizer::new(llm, settings),
        }
    }

    pub async fn answer(&self, text: &str, limit: usize) -> Result<AnswerPayload, ApiError> {
        let intent = self.interpreter.interpret(text).await?;
        tracing::info!(
            "Intent: name='{}', composition='{}', disease='{}'",
            intent.medicine_name,
            intent.medicine_composition,
            intent.disease
        );

        let retrieval = self.router.retrieve(&intent, limit).await?;
        tracing::info!(
            "Retrieved {} records via {} search",
            retrieval.records.len(),
            retrieval.source.as_str()
        );

        let answer = self.synthesizer.synthesize(text, &retrieval.records).await?;

        Ok(AnswerPayload {
            data: retrieval.records,
            gemini_answer: answer,
        })
    }
}
