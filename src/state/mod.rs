use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::catalog::{CatalogSource, CatalogStore};
use crate::core::config::{AppPaths, ConfigService, Settings};
use crate::llm::{GeminiProvider, LlmProvider};
use crate::pipeline::AnswerPipeline;
use crate::vector::{AstraStore, VectorStore};

pub mod error;

use error::InitializationError;

/// Application state shared across all routes.
///
/// The catalog is loaded before this is built, so a running server always
/// has one; nothing in here is mutated after startup.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub catalog: Arc<CatalogStore>,
    pub pipeline: Arc<AnswerPipeline>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Initializes the application state.
    ///
    /// This process includes:
    /// 1. Loading and validating configuration
    /// 2. Loading the medicine catalog (fatal on any error)
    /// 3. Building the Gemini and Astra clients
    pub async fn initialize(paths: Arc<AppPaths>) -> Result<Arc<Self>, InitializationError> {
        let config = ConfigService::new(paths.clone());
        let settings = config.load_settings()?;

        let source = CatalogSource::resolve(&settings.catalog.source, &paths);
        tracing::info!("Loading medicine catalog from {}", source);
        let records = source.load().await?;
        let catalog = Arc::new(CatalogStore::new(records));
        tracing::info!("Loaded {} medicine records", catalog.len());

        let llm: Arc<dyn LlmProvider> = Arc::new(
            GeminiProvider::from_settings(&settings.gemini)
                .map_err(|e| InitializationError::Llm(e.into()))?,
        );
        let vectors: Arc<dyn VectorStore> = Arc::new(
            AstraStore::from_settings(&settings.astra)
                .map_err(|e| InitializationError::VectorStore(e.into()))?,
        );

        Ok(Self::from_parts(settings, catalog, llm, vectors))
    }

    /// Assembles state from already-built collaborators.
    pub fn from_parts(
        settings: Settings,
        catalog: Arc<CatalogStore>,
        llm: Arc<dyn LlmProvider>,
        vectors: Arc<dyn VectorStore>,
    ) -> Arc<Self> {
        let pipeline = Arc::new(AnswerPipeline::new(
            llm,
            vectors,
            catalog.clone(),
            Some(settings.gemini.clone()),
        ));

        Arc::new(AppState {
            settings: Arc::new(settings),
            catalog,
            pipeline,
            started_at: Utc::now(),
        })
    }
}
