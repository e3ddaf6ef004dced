use serde_json::{Map, Value};

use super::ConfigError;

pub fn validate_config(config: &Value) -> Result<(), ConfigError> {
    let root = config
        .as_object()
        .ok_or_else(|| config_type_error("root", "object"))?;

    if let Some(server) = expect_optional_object(root, "server")? {
        validate_optional_string_field(server, "server.host", "host")?;
        validate_u64_field(server, "server.port", "port", 0, 65535)?;
        validate_string_array_field(
            server,
            "server.cors_allowed_origins",
            "cors_allowed_origins",
        )?;
    }

    if let Some(gemini) = expect_optional_object(root, "gemini")? {
        validate_optional_string_field(gemini, "gemini.model", "model")?;
        validate_optional_string_field(gemini, "gemini.base_url", "base_url")?;
        validate_optional_string_field(gemini, "gemini.api_key", "api_key")?;
        validate_u64_field(gemini, "gemini.timeout_secs", "timeout_secs", 1, 600)?;
        validate_u64_field(gemini, "gemini.max_retries", "max_retries", 0, 10)?;
        validate_u64_field(
            gemini,
            "gemini.max_output_tokens",
            "max_output_tokens",
            1,
            1_000_000,
        )?;
        validate_f64_field(gemini, "gemini.temperature", "temperature", 0.0, 2.0)?;
    }

    if let Some(astra) = expect_optional_object(root, "astra")? {
        validate_optional_string_field(astra, "astra.endpoint", "endpoint")?;
        validate_optional_string_field(astra, "astra.token", "token")?;
        validate_optional_string_field(astra, "astra.keyspace", "keyspace")?;
        validate_optional_string_field(astra, "astra.collection", "collection")?;
        validate_u64_field(astra, "astra.timeout_secs", "timeout_secs", 1, 600)?;
        validate_u64_field(astra, "astra.max_retries", "max_retries", 0, 10)?;
    }

    if let Some(catalog) = expect_optional_object(root, "catalog")? {
        validate_required_string_field(catalog, "catalog.source", "source")?;
    }

    if let Some(retrieval) = expect_optional_object(root, "retrieval")? {
        validate_u64_field(
            retrieval,
            "retrieval.default_limit",
            "default_limit",
            1,
            1000,
        )?;
        validate_u64_field(retrieval, "retrieval.max_limit", "max_limit", 1, 1000)?;
        let default_limit = retrieval.get("default_limit").and_then(Value::as_u64);
        let max_limit = retrieval.get("max_limit").and_then(Value::as_u64);
        if let (Some(default_limit), Some(max_limit)) = (default_limit, max_limit) {
            if default_limit > max_limit {
                return Err(ConfigError::Invalid(format!(
                    "Invalid config at 'retrieval.default_limit': must not exceed max_limit ({})",
                    max_limit
                )));
            }
        }
    }

    Ok(())
}

fn expect_optional_object<'a>(
    root: &'a Map<String, Value>,
    key: &str,
) -> Result<Option<&'a Map<String, Value>>, ConfigError> {
    match root.get(key) {
        Some(Value::Object(map)) => Ok(Some(map)),
        Some(_) => Err(config_type_error(key, "object")),
        None => Ok(None),
    }
}

fn validate_u64_field(
    section: &Map<String, Value>,
    path: &str,
    key: &str,
    min: u64,
    max: u64,
) -> Result<(), ConfigError> {
    let Some(value) = section.get(key) else {
        return Ok(());
    };
    let Some(number) = value.as_u64() else {
        return Err(config_type_error(path, "integer"));
    };
    if number < min || number > max {
        return Err(ConfigError::Invalid(format!(
            "Invalid config at '{}': must be between {} and {}",
            path, min, max
        )));
    }
    Ok(())
}

fn validate_f64_field(
    section: &Map<String, Value>,
    path: &str,
    key: &str,
    min: f64,
    max: f64,
) -> Result<(), ConfigError> {
    let Some(value) = section.get(key) else {
        return Ok(());
    };
    let Some(number) = value.as_f64() else {
        return Err(config_type_error(path, "number"));
    };
    if number < min || number > max {
        return Err(ConfigError::Invalid(format!(
            "Invalid config at '{}': must be between {} and {}",
            path, min, max
        )));
    }
    Ok(())
}

fn validate_required_string_field(
    section: &Map<String, Value>,
    path: &str,
    key: &str,
) -> Result<(), ConfigError> {
    let value = section.get(key).ok_or_else(|| {
        ConfigError::Invalid(format!("Invalid config at '{}': value is required", path))
    })?;
    let Some(text) = value.as_str() else {
        return Err(config_type_error(path, "string"));
    };
    if text.trim().is_empty() {
        return Err(ConfigError::Invalid(format!(
            "Invalid config at '{}': value cannot be empty",
            path
        )));
    }
    Ok(())
}

fn validate_optional_string_field(
    section: &Map<String, Value>,
    path: &str,
    key: &str,
) -> Result<(), ConfigError> {
    let Some(value) = section.get(key) else {
        return Ok(());
    };
    if value.is_null() || value.as_str().is_some() {
        return Ok(());
    }
    Err(config_type_error(path, "string"))
}

fn validate_string_array_field(
    section: &Map<String, Value>,
    path: &str,
    key: &str,
) -> Result<(), ConfigError> {
    let Some(value) = section.get(key) else {
        return Ok(());
    };
    let Some(items) = value.as_array() else {
        return Err(config_type_error(path, "array of strings"));
    };
    for (index, item) in items.iter().enumerate() {
        let Some(text) = item.as_str() else {
            return Err(config_type_error(&format!("{}[{}]", path, index), "string"));
        };
        if text.trim().is_empty() {
            return Err(ConfigError::Invalid(format!(
                "Invalid config at '{}[{}]': value cannot be empty",
                path, index
            )));
        }
    }
    Ok(())
}

fn config_type_error(path: &str, expected: &str) -> ConfigError {
    ConfigError::Invalid(format!(
        "Invalid config at '{}': expected {}",
        path, expected
    ))
}
