use crate::assemble::{assemble, ResultRecord};
use crate::metadata::{MetadataRecord, MetadataStore};
use crate::persist::{load_vector_space, ModelPaths};
use crate::ranker::{rank_with, ScoringMode, DEFAULT_TOP_K};
use crate::vectorizer::vectorize;
use crate::VectorSpace;
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;
use std::time::Instant;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchOutcome {
    pub results: Vec<ResultRecord>,
    pub elapsed_secs: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineStats {
    pub total_terms: usize,
    pub total_documents: usize,
    pub total_medicaments: usize,
    pub indexed_medicaments: usize,
    pub model_loaded: bool,
}

/// Query service over a loaded model. Immutable after construction and shared read-only between requests.
#[derive(Debug)]
pub struct SearchEngine {
    space: VectorSpace,
    metadata: MetadataStore,
    mode: ScoringMode,
}

impl SearchEngine {
    pub fn new(space: VectorSpace, metadata: MetadataStore) -> Self {
        Self { space, metadata, mode: ScoringMode::default() }
    }

    pub fn with_mode(mut self, mode: ScoringMode) -> Self {
        self.mode = mode;
        self
    }

    /// Load the model artifacts and the metadata file. Fails if any artifact is missing.
    pub fn load<P: AsRef<Path>, M: AsRef<Path>>(model_dir: P, metadata_path: M) -> Result<Self> {
        let paths = ModelPaths::new(model_dir);
        let space = load_vector_space(&paths).context("loading model artifacts")?;
        let metadata = MetadataStore::load(metadata_path)?;
        Ok(Self::new(space, metadata))
    }

    /// Rank the corpus against `query` and return the best `top_k` results (10 when `top_k` is 0).
    /// Never fails: a query with no known term gives an empty result list.
    pub fn search(&self, query: &str, top_k: usize) -> SearchOutcome {
        let start = Instant::now();
        let k = if top_k == 0 { DEFAULT_TOP_K } else { top_k };
        let query_vector = vectorize(query, self.space.idf());
        if query_vector.is_empty() {
            tracing::debug!(query, "no known term in query");
            return SearchOutcome::default();
        }
        let ranked = rank_with(self.mode, &query_vector, &self.space, k);
        let results = assemble(&ranked, &self.metadata);
        let elapsed_secs = start.elapsed().as_secs_f64();
        tracing::info!(
            query,
            hits = results.len(),
            top = ?results.iter().take(5).map(|r| r.document_id.as_str()).collect::<Vec<_>>(),
            elapsed_secs,
            "search"
        );
        SearchOutcome { results, elapsed_secs }
    }

    pub fn stats(&self) -> EngineStats {
        EngineStats {
            total_terms: self.space.num_terms(),
            total_documents: self.space.num_documents(),
            total_medicaments: self.metadata.len(),
            indexed_medicaments: self.metadata.keyed_len(),
            model_loaded: self.space.num_documents() > 0,
        }
    }

    pub fn metadata(&self) -> &[MetadataRecord] { self.metadata.records() }

    pub fn vector_space(&self) -> &VectorSpace { &self.space }

    pub fn mode(&self) -> ScoringMode { self.mode }
}
