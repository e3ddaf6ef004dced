use serde_json::{json, Value};

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

pub fn default_config() -> Value {
    json!({
        "server": {
            "host": "0.0.0.0",
            "port": 8000,
            "cors_allowed_origins": []
        },
        "gemini": {
            "model": "gemini-1.5-flash",
            "base_url": DEFAULT_GEMINI_BASE_URL,
            "timeout_secs": 30,
            "max_retries": 0
        },
        "astra": {
            "keyspace": "default_keyspace",
            "collection": "test",
            "timeout_secs": 30,
            "max_retries": 0
        },
        "catalog": {
            "source": "new_output_with_uuid.json"
        },
        "retrieval": {
            "default_limit": 20,
            "max_limit": 100
        }
    })
}
