use std::path::PathBuf;
use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

use super::record::MedicineRecord;
use crate::core::config::AppPaths;

const FETCH_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Error)]
pub enum CatalogLoadError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to fetch catalog from {url}: {message}")]
    Fetch { url: String, message: String },
    #[error("catalog is not valid JSON: {0}")]
    Malformed(String),
    #[error("catalog must be a JSON array of medicine records")]
    NotAnArray,
    #[error("invalid medicine record at index {index}: {reason}")]
    InvalidRecord { index: usize, reason: String },
}

/// Where the catalog document comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogSource {
    File(PathBuf),
    Url(String),
}

impl CatalogSource {
    pub fn resolve(raw: &str, paths: &AppPaths) -> Self {
        let trimmed = raw.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            CatalogSource::Url(trimmed.to_string())
        } else {
            CatalogSource::File(paths.resolve_data_file(trimmed))
        }
    }

    pub async fn load(&self) -> Result<Vec<MedicineRecord>, CatalogLoadError> {
        let contents = match self {
            CatalogSource::File(path) => tokio::fs::read_to_string(path)
                .await
                .map_err(|source| CatalogLoadError::Io {
                    path: path.clone(),
                    source,
                })?,
            CatalogSource::Url(url) => fetch(url).await?,
        };
        parse_catalog(&contents)
    }
}

impl std::fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogSource::File(path) => write!(f, "{}", path.display()),
            CatalogSource::Url(url) => f.write_str(url),
        }
    }
}

async fn fetch(url: &str) -> Result<String, CatalogLoadError> {
    let fetch_error = |message: String| CatalogLoadError::Fetch {
        url: url.to_string(),
        message,
    };

    let client = reqwest::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .map_err(|e| fetch_error(e.to_string()))?;
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| fetch_error(e.to_string()))?;
    let response = response
        .error_for_status()
        .map_err(|e| fetch_error(e.to_string()))?;
    response.text().await.map_err(|e| fetch_error(e.to_string()))
}

/// Decodes the catalog document, rejecting the first record that does not
/// match the schema exactly.
pub fn parse_catalog(contents: &str) -> Result<Vec<MedicineRecord>, CatalogLoadError> {
    let document: Value =
        serde_json::from_str(contents).map_err(|e| CatalogLoadError::Malformed(e.to_string()))?;
    let Value::Array(items) = document else {
        return Err(CatalogLoadError::NotAnArray);
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value::<MedicineRecord>(item).map_err(|e| {
                CatalogLoadError::InvalidRecord {
                    index,
                    reason: e.to_string(),
                }
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record_json(name: &str) -> Value {
        json!({
            "medicine_name": name,
            "composition": "Paracetamol (500mg)",
            "uses": "Fever",
            "sideeffects": "Nausea",
            "image_url": "https://example.com/x.jpg",
            "manufacturer": "Acme",
            "excellent_review_percentage": 50,
            "average_review_percentage": 30,
            "poor_review_percentage": 20,
            "_id": format!("id-{}", name),
            "price": 12.5,
            "packsizelabel": "strip of 10 tablets",
            "type": "allopathy"
        })
    }

    #[test]
    fn parses_records_in_document_order() {
        let doc = json!([record_json("Paracetamol"), record_json("Paraben")]).to_string();
        let records = parse_catalog(&doc).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].medicine_name, "Paracetamol");
        assert_eq!(records[1].medicine_name, "Paraben");
    }

    #[test]
    fn reports_index_of_offending_record() {
        let mut bad = record_json("Broken");
        bad["unexpected"] = json!(true);
        let doc = json!([record_json("Ok"), record_json("Ok2"), bad]).to_string();

        match parse_catalog(&doc) {
            Err(CatalogLoadError::InvalidRecord { index, reason }) => {
                assert_eq!(index, 2);
                assert!(reason.contains("unexpected"));
            }
            other => panic!("expected InvalidRecord, got {:?}", other),
        }
    }

    #[test]
    fn rejects_non_array_and_garbage() {
        assert!(matches!(
            parse_catalog(r#"{"medicine_name": "x"}"#),
            Err(CatalogLoadError::NotAnArray)
        ));
        assert!(matches!(
            parse_catalog("not json"),
            Err(CatalogLoadError::Malformed(_))
        ));
    }

    #[test]
    fn resolves_urls_and_paths() {
        let dir = tempfile::tempdir().unwrap();
        let paths = AppPaths::with_dirs(dir.path().to_path_buf(), dir.path().to_path_buf());

        assert_eq!(
            CatalogSource::resolve("https://cdn.example/meds.json", &paths),
            CatalogSource::Url("https://cdn.example/meds.json".to_string())
        );
        assert_eq!(
            CatalogSource::resolve("meds.json", &paths),
            CatalogSource::File(dir.path().join("meds.json"))
        );
    }

    async fn serve(app: axum::Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn loads_from_url_and_reports_fetch_failures() {
        use axum::routing::get;
        use axum::Json;

        let base = serve(
            axum::Router::new()
                .route(
                    "/meds.json",
                    get(|| async { Json(json!([record_json("Macfast"), record_json("Dolo 650")])) }),
                )
                .route(
                    "/object.json",
                    get(|| async { Json(json!({ "medicine_name": "Macfast" })) }),
                ),
        )
        .await;

        let records = CatalogSource::Url(format!("{}/meds.json", base))
            .load()
            .await
            .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].medicine_name, "Dolo 650");

        let missing = CatalogSource::Url(format!("{}/absent.json", base)).load().await;
        match missing {
            Err(CatalogLoadError::Fetch { url, message }) => {
                assert!(url.ends_with("/absent.json"));
                assert!(message.contains("404"));
            }
            other => panic!("expected Fetch error, got {:?}", other),
        }

        let object = CatalogSource::Url(format!("{}/object.json", base)).load().await;
        assert!(matches!(object, Err(CatalogLoadError::NotAnArray)));
    }

    #[tokio::test]
    async fn loads_from_file_and_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meds.json");
        std::fs::write(&path, json!([record_json("Macfast")]).to_string()).unwrap();

        let records = CatalogSource::File(path).load().await.unwrap();
        assert_eq!(records[0].medicine_name, "Macfast");

        let missing = CatalogSource::File(dir.path().join("absent.json")).load().await;
        assert!(matches!(missing, Err(CatalogLoadError::Io { .. })));
    }
}
