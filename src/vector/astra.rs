use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Map, Value};

use super::store::{VectorQuery, VectorStore};
use crate::core::config::AstraSettings;
use crate::core::errors::ApiError;
use crate::core::upstream::{call_with_policy, CallPolicy};

const TOKEN_HEADER: &str = "Token";

/// Astra DB Data API collection, queried with server-side `$vectorize`.
#[derive(Clone)]
pub struct AstraStore {
    collection_url: String,
    token: String,
    client: Client,
    policy: CallPolicy,
}

impl AstraStore {
    pub fn new(
        endpoint: &str,
        keyspace: &str,
        collection: &str,
        token: String,
        policy: CallPolicy,
    ) -> Self {
        let collection_url = format!(
            "{}/api/json/v1/{}/{}",
            endpoint.trim_end_matches('/'),
            keyspace,
            collection
        );
        Self {
            collection_url,
            token,
            client: Client::new(),
            policy,
        }
    }

    pub fn from_settings(settings: &AstraSettings) -> Result<Self, ApiError> {
        let endpoint = non_empty(settings.endpoint.as_deref()).ok_or_else(|| {
            ApiError::Internal(
                "Astra endpoint is not configured (set ASTRA_DB_API_ENDPOINT or astra.endpoint)"
                    .to_string(),
            )
        })?;
        let token = non_empty(settings.token.as_deref()).ok_or_else(|| {
            ApiError::Internal(
                "Astra token is not configured (set ASTRA_DB_APPLICATION_TOKEN or astra.token)"
                    .to_string(),
            )
        })?;

        Ok(Self::new(
            endpoint,
            &settings.keyspace,
            &settings.collection,
            token.to_string(),
            CallPolicy::new(settings.timeout_secs, settings.max_retries),
        ))
    }

    pub fn collection_url(&self) -> &str {
        &self.collection_url
    }

    async fn find_once(&self, body: &Value) -> Result<Vec<Map<String, Value>>, ApiError> {
        let res = self
            .client
            .post(&self.collection_url)
            .header(TOKEN_HEADER, &self.token)
            .json(body)
            .send()
            .await
            .map_err(ApiError::upstream)?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(ApiError::Upstream(format!(
                "Astra find error ({}): {}",
                status, text
            )));
        }

        let payload: Value = res.json().await.map_err(ApiError::upstream)?;
        parse_find_response(payload)
    }
}

#[async_trait]
impl VectorStore for AstraStore {
    fn name(&self) -> &str {
        "astra"
    }

    async fn find(&self, query: VectorQuery) -> Result<Vec<Map<String, Value>>, ApiError> {
        let body = build_find_command(&query);
        let body = &body;
        call_with_policy("astra", self.policy, move || self.find_once(body)).await
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

pub(crate) fn build_find_command(query: &VectorQuery) -> Value {
    let mut find = json!({
        "filter": query.filter,
        "sort": { "$vectorize": query.vectorize },
        "options": {
            "limit": query.limit,
            "includeSimilarity": query.include_similarity
        }
    });

    if query.include_vectorize {
        if let Some(obj) = find.as_object_mut() {
            obj.insert("projection".to_string(), json!({ "$vectorize": true }));
        }
    }

    json!({ "find": find })
}

pub(crate) fn parse_find_response(payload: Value) -> Result<Vec<Map<String, Value>>, ApiError> {
    if let Some(errors) = payload.get("errors").and_then(|e| e.as_array()) {
        if !errors.is_empty() {
            let messages: Vec<&str> = errors
                .iter()
                .filter_map(|e| e.get("message").and_then(|m| m.as_str()))
                .collect();
            return Err(ApiError::Upstream(format!(
                "Astra find failed: {}",
                messages.join("; ")
            )));
        }
    }

    let Some(Value::Array(documents)) = payload
        .get("data")
        .and_then(|data| data.get("documents"))
        .cloned()
    else {
        return Err(ApiError::Upstream(
            "Astra find response is missing data.documents".to_string(),
        ));
    };

    Ok(documents
        .into_iter()
        .filter_map(|doc| match doc {
            Value::Object(map) => Some(map),
            _ => None,
        })
        .collect())
}
