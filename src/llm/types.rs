use serde::{Deserialize, Serialize};

use crate::core::config::GeminiSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HarmCategory {
    #[serde(rename = "HARM_CATEGORY_HARASSMENT")]
    Harassment,
    #[serde(rename = "HARM_CATEGORY_HATE_SPEECH")]
    HateSpeech,
    #[serde(rename = "HARM_CATEGORY_SEXUALLY_EXPLICIT")]
    SexuallyExplicit,
    #[serde(rename = "HARM_CATEGORY_DANGEROUS_CONTENT")]
    DangerousContent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HarmBlockThreshold {
    BlockNone,
    BlockOnlyHigh,
    BlockMediumAndAbove,
    BlockLowAndAbove,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetySetting {
    pub category: HarmCategory,
    pub threshold: HarmBlockThreshold,
}

/// One text-completion call: a single prompt plus optional overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    pub prompt: String,
    pub safety_settings: Vec<SafetySetting>,
    pub temperature: Option<f64>,
    pub max_output_tokens: Option<u32>,
}

impl GenerateRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            safety_settings: Vec::new(),
            temperature: None,
            max_output_tokens: None,
        }
    }

    pub fn with_safety(mut self, category: HarmCategory, threshold: HarmBlockThreshold) -> Self {
        self.safety_settings.retain(|s| s.category != category);
        self.safety_settings.push(SafetySetting {
            category,
            threshold,
        });
        self
    }

    pub fn with_config(mut self, settings: &GeminiSettings) -> Self {
        self.temperature = settings.temperature.or(self.temperature);
        self.max_output_tokens = settings.max_output_tokens.or(self.max_output_tokens);
        self
    }
}
