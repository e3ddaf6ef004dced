//! Locates and decodes the structured-data island in free-form model output.
//!
//! Only the first `{ ... }` span is considered, ending at the first `}` after
//! the opening brace. Objects containing nested objects or arrays of objects
//! are therefore cut short and fail to decode; the intent prompt only asks
//! for a flat object of three strings.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::core::errors::ApiError;

#[derive(Debug, Error, PartialEq)]
pub enum ExtractError {
    #[error("no JSON object found in model output")]
    NoStructuredDataFound,
    #[error("invalid JSON object in model output: {0}")]
    MalformedStructuredData(String),
}

impl From<ExtractError> for ApiError {
    fn from(err: ExtractError) -> Self {
        ApiError::IntentDecode(err.to_string())
    }
}

/// Returns the first brace-delimited span, braces included.
///
/// The span may cross line breaks, so a model that pretty-prints its object
/// over several lines still yields one span. A stray `{` earlier in the text
/// is not skipped: the span starts there even when its `}` is on a later line.
pub fn find_object_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let len = text[start..].find('}')?;
    Some(&text[start..=start + len])
}

pub fn extract_structured_object(text: &str) -> Result<Map<String, Value>, ExtractError> {
    let span = find_object_span(text).ok_or(ExtractError::NoStructuredDataFound)?;
    match serde_json::from_str::<Value>(span) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ExtractError::MalformedStructuredData(
            "expected a JSON object".to_string(),
        )),
        Err(err) => Err(ExtractError::MalformedStructuredData(err.to_string())),
    }
}
