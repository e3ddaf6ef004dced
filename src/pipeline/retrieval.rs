use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::{Map, Value};

use super::intent::QueryIntent;
use crate::catalog::CatalogStore;
use crate::core::errors::ApiError;
use crate::vector::{VectorQuery, VectorStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetrievalSource {
    /// Case-insensitive substring filter over the in-memory catalog.
    Catalog,
    /// Vector similarity search against the external store.
    Similarity,
}

impl RetrievalSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            RetrievalSource::Catalog => "catalog",
            RetrievalSource::Similarity => "similarity",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RetrievalResult {
    pub source: RetrievalSource,
    pub records: Vec<Map<String, Value>>,
}

/// Exact-filter criteria derived from an intent. The disease never filters;
/// it only drives similarity search.
pub fn filter_conditions(intent: &QueryIntent) -> BTreeMap<String, String> {
    let mut conditions = BTreeMap::new();
    if !intent.medicine_name.is_empty() {
        conditions.insert("medicine_name".to_string(), intent.medicine_name.clone());
    }
    if !intent.medicine_composition.is_empty() {
        conditions.insert("composition".to_string(), intent.medicine_composition.clone());
    }
    conditions
}

pub struct RetrievalRouter {
    catalog: Arc<CatalogStore>,
    vectors: Arc<dyn VectorStore>,
}

impl RetrievalRouter {
    pub fn new(catalog: Arc<CatalogStore>, vectors: Arc<dyn VectorStore>) -> Self {
        Self { catalog, vectors }
    }

    /// Similarity search when the intent names a disease, catalog filter
    /// otherwise. At most `limit` records come back; none is not an error.
    pub async fn retrieve(
        &self,
        intent: &QueryIntent,
        limit: usize,
    ) -> Result<RetrievalResult, ApiError> {
        let conditions = filter_conditions(intent);

        if intent.has_disease() {
            let filter: Map<String, Value> = conditions
                .into_iter()
                .map(|(key, value)| (key, Value::String(value)))
                .collect();
            let query = VectorQuery::new(filter, intent.disease.clone(), limit);
            let mut records = self.vectors.find(query).await?;
            records.truncate(limit);
            tracing::info!(
                "Similarity search on {} for '{}' returned {} records",
                self.vectors.name(),
                intent.disease,
                records.len()
            );
            return Ok(RetrievalResult {
                source: RetrievalSource::Similarity,
                records,
            });
        }

        let records: Vec<Map<String, Value>> = self
            .catalog
            .search(&conditions, limit)
            .into_iter()
            .map(|record| record.to_map())
            .collect();
        tracing::info!(
            "Catalog search with {:?} returned {} records",
            conditions,
            records.len()
        );
        Ok(RetrievalResult {
            source: RetrievalSource::Catalog,
            records,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::parse_catalog;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingStore {
        queries: Mutex<Vec<VectorQuery>>,
        documents: Vec<Map<String, Value>>,
    }

    #[async_trait]
    impl VectorStore for RecordingStore {
        fn name(&self) -> &str {
            "recording"
        }

        async fn find(&self, query: VectorQuery) -> Result<Vec<Map<String, Value>>, ApiError> {
            self.queries.lock().unwrap().push(query);
            Ok(self.documents.clone())
        }
    }

    fn record(name: &str, composition: &str) -> Value {
        json!({
            "medicine_name": name,
            "composition": composition,
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

    fn catalog() -> Arc<CatalogStore> {
        let doc = json!([
            record("Paracetamol 500", "Paracetamol (500mg)"),
            record("Macfast 650", "Paracetamol (650mg)"),
            record("Paraben Cream", "Methylparaben"),
        ]);
        Arc::new(CatalogStore::new(parse_catalog(&doc.to_string()).unwrap()))
    }

    fn intent(name: &str, composition: &str, disease: &str) -> QueryIntent {
        QueryIntent {
            medicine_name: name.to_string(),
            medicine_composition: composition.to_string(),
            disease: disease.to_string(),
        }
    }

    #[test]
    fn filter_conditions_skip_empty_fields_and_disease() {
        let conditions = filter_conditions(&intent("Macfast", "", "fever"));
        assert_eq!(conditions.len(), 1);
        assert_eq!(conditions.get("medicine_name").map(String::as_str), Some("Macfast"));

        let conditions = filter_conditions(&intent("", "Paracetamol", ""));
        assert_eq!(
            conditions.get("composition").map(String::as_str),
            Some("Paracetamol")
        );
        assert!(filter_conditions(&intent("", "", "fever")).is_empty());
    }

    #[tokio::test]
    async fn medicine_name_routes_to_catalog_search() {
        let store = Arc::new(RecordingStore::default());
        let router = RetrievalRouter::new(catalog(), store.clone());

        let result = router.retrieve(&intent("Macfast", "", ""), 20).await.unwrap();

        assert_eq!(result.source, RetrievalSource::Catalog);
        assert_eq!(result.records.len(), 1);
        assert_eq!(result.records[0]["medicine_name"], json!("Macfast 650"));
        assert!(store.queries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn catalog_search_is_substring_ordered_and_limited() {
        let store = Arc::new(RecordingStore::default());
        let router = RetrievalRouter::new(catalog(), store);

        let result = router.retrieve(&intent("para", "", ""), 20).await.unwrap();
        let names: Vec<&Value> = result.records.iter().map(|r| &r["medicine_name"]).collect();
        assert_eq!(names, vec![&json!("Paracetamol 500"), &json!("Paraben Cream")]);

        let result = router.retrieve(&intent("para", "", ""), 1).await.unwrap();
        assert_eq!(result.records.len(), 1);
        assert_eq!(result.records[0]["medicine_name"], json!("Paracetamol 500"));
    }

    #[tokio::test]
    async fn disease_routes_to_similarity_search() {
        let store = Arc::new(RecordingStore {
            documents: vec![
                json!({ "medicine_name": "Dolo 650", "$similarity": 0.9 })
                    .as_object()
                    .cloned()
                    .unwrap(),
                json!({ "medicine_name": "Crocin", "$similarity": 0.8 })
                    .as_object()
                    .cloned()
                    .unwrap(),
            ],
            ..Default::default()
        });
        let router = RetrievalRouter::new(catalog(), store.clone());

        let result = router.retrieve(&intent("", "", "fever"), 20).await.unwrap();

        assert_eq!(result.source, RetrievalSource::Similarity);
        assert_eq!(result.records.len(), 2);
        let queries = store.queries.lock().unwrap();
        assert_eq!(queries.len(), 1);
        assert!(queries[0].filter.is_empty());
        assert_eq!(queries[0].vectorize, "fever");
        assert_eq!(queries[0].limit, 20);
        assert!(queries[0].include_similarity);
    }

    #[tokio::test]
    async fn similarity_search_carries_prefilter_and_respects_limit() {
        let documents = (0..5)
            .map(|i| json!({ "medicine_name": format!("m{}", i) }).as_object().cloned().unwrap())
            .collect();
        let store = Arc::new(RecordingStore {
            documents,
            ..Default::default()
        });
        let router = RetrievalRouter::new(catalog(), store.clone());

        let result = router
            .retrieve(&intent("", "Paracetamol", "Cold"), 3)
            .await
            .unwrap();

        assert_eq!(result.records.len(), 3);
        let queries = store.queries.lock().unwrap();
        assert_eq!(queries[0].filter.get("composition"), Some(&json!("Paracetamol")));
        assert_eq!(queries[0].vectorize, "Cold");
    }

    #[tokio::test]
    async fn no_matches_is_empty_not_error() {
        let store = Arc::new(RecordingStore::default());
        let router = RetrievalRouter::new(catalog(), store);

        let result = router.retrieve(&intent("Zzz", "", ""), 20).await.unwrap();
        assert!(result.records.is_empty());
    }
}
