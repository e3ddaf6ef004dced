#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::core::errors::ApiError;
    use crate::llm::gemini::{build_request_body, extract_candidate_text};
    use crate::llm::types::{GenerateRequest, HarmBlockThreshold, HarmCategory};

    #[test]
    fn request_body_carries_prompt_and_safety_overrides() {
        let request = GenerateRequest::new("Prompt: x\nInput: fever\n\n")
            .with_safety(HarmCategory::DangerousContent, HarmBlockThreshold::BlockNone);

        let body = build_request_body(&request);

        assert_eq!(
            body,
            json!({
                "contents": [{
                    "role": "user",
                    "parts": [{ "text": "Prompt: x\nInput: fever\n\n" }]
                }],
                "safetySettings": [{
                    "category": "HARM_CATEGORY_DANGEROUS_CONTENT",
                    "threshold": "BLOCK_NONE"
                }]
            })
        );
    }

    #[test]
    fn request_body_omits_empty_overrides_and_maps_generation_config() {
        let mut request = GenerateRequest::new("hello");
        request.temperature = Some(0.2);
        request.max_output_tokens = Some(512);

        let body = build_request_body(&request);

        assert!(body.get("safetySettings").is_none());
        assert_eq!(
            body["generationConfig"],
            json!({ "temperature": 0.2, "maxOutputTokens": 512 })
        );
    }

    #[test]
    fn candidate_text_parts_are_concatenated() {
        let payload = json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{ "text": "```json\n" }, { "text": "{\"disease\": \"Fever\"}\n```" }]
                },
                "finishReason": "STOP"
            }]
        });

        assert_eq!(
            extract_candidate_text(&payload).unwrap(),
            "```json\n{\"disease\": \"Fever\"}\n```"
        );
    }

    #[test]
    fn blocked_prompt_is_an_upstream_error() {
        let payload = json!({ "promptFeedback": { "blockReason": "SAFETY" } });

        match extract_candidate_text(&payload) {
            Err(ApiError::Upstream(msg)) => assert!(msg.contains("SAFETY")),
            other => panic!("expected upstream error, got {:?}", other),
        }
    }

    #[test]
    fn candidate_without_text_is_an_upstream_error() {
        let payload = json!({ "candidates": [{ "finishReason": "RECITATION" }] });

        match extract_candidate_text(&payload) {
            Err(ApiError::Upstream(msg)) => assert!(msg.contains("RECITATION")),
            other => panic!("expected upstream error, got {:?}", other),
        }
    }

    async fn serve(app: axum::Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn provider(base_url: String, timeout_ms: u64) -> crate::llm::gemini::GeminiProvider {
        crate::llm::gemini::GeminiProvider::new(
            base_url,
            "gemini-test".to_string(),
            "test-key".to_string(),
            crate::core::upstream::CallPolicy {
                timeout: std::time::Duration::from_millis(timeout_ms),
                max_retries: 0,
            },
        )
    }

    #[tokio::test]
    async fn generate_posts_to_model_endpoint_with_key() {
        use axum::http::{HeaderMap, Uri};
        use axum::Json;
        use crate::llm::provider::LlmProvider;

        let base = serve(axum::Router::new().fallback(
            |uri: Uri, headers: HeaderMap, Json(body): Json<serde_json::Value>| async move {
                let key = headers
                    .get("x-goog-api-key")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                Json(json!({
                    "candidates": [{
                        "content": { "parts": [
                            { "text": format!("{} {} ", uri.path(), key) },
                            { "text": body["contents"][0]["parts"][0]["text"].clone() }
                        ]}
                    }]
                }))
            },
        ))
        .await;

        let text = provider(base, 2000)
            .generate(GenerateRequest::new("hello"))
            .await
            .unwrap();

        assert_eq!(text, "/models/gemini-test:generateContent test-key hello");
    }

    #[tokio::test]
    async fn error_status_is_an_upstream_error() {
        use axum::http::StatusCode;
        use crate::llm::provider::LlmProvider;

        let base = serve(axum::Router::new().fallback(|| async {
            (StatusCode::INTERNAL_SERVER_ERROR, "quota exhausted")
        }))
        .await;

        match provider(base, 2000).generate(GenerateRequest::new("hi")).await {
            Err(ApiError::Upstream(msg)) => {
                assert!(msg.contains("500"));
                assert!(msg.contains("quota exhausted"));
            }
            other => panic!("expected upstream error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn stalled_server_is_a_timeout() {
        use crate::llm::provider::LlmProvider;

        let base = serve(axum::Router::new().fallback(|| async {
            tokio::time::sleep(std::time::Duration::from_secs(10)).await;
            "late"
        }))
        .await;

        let result = provider(base, 150).generate(GenerateRequest::new("hi")).await;
        assert!(matches!(result, Err(ApiError::UpstreamTimeout(_))));
    }

    #[tokio::test]
    #[ignore]
    async fn test_live_gemini_connection() {
        use crate::core::upstream::CallPolicy;
        use crate::llm::gemini::GeminiProvider;
        use crate::llm::provider::LlmProvider;

        let api_key = std::env::var("GEMINI_API_KEY").expect("GEMINI_API_KEY not set");
        let provider = GeminiProvider::new(
            crate::core::config::defaults::DEFAULT_GEMINI_BASE_URL.to_string(),
            "gemini-1.5-flash".to_string(),
            api_key,
            CallPolicy::new(30, 0),
        );

        let res = provider.generate(GenerateRequest::new("Say hello")).await;
        match res {
            Ok(response) => println!("Gemini Response: {}", response),
            Err(e) => panic!("Failed to reach Gemini: {}", e),
        }
    }
}
