pub mod assemble;
pub mod builder;
pub mod engine;
pub mod index;
pub mod metadata;
pub mod normalizer;
pub mod persist;
pub mod ranker;
pub mod vectorizer;

pub use assemble::ResultRecord;
pub use engine::{EngineStats, SearchEngine, SearchOutcome};
pub use index::{DocId, IdfTable, IndexedDocument, InvertedIndex, SparseVector, Term, VectorSpace};
pub use metadata::{MetadataRecord, MetadataStore};
pub use persist::LoadError;
pub use ranker::{ScoringMode, DEFAULT_TOP_K};
