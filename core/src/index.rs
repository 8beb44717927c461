use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub type Term = String;
pub type DocId = String;

pub type IdfTable = HashMap<Term, f64>;
pub type InvertedIndex = HashMap<Term, Vec<DocId>>;

/// Sparse term -> weight vector. Serialized as a plain map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SparseVector {
    weights: HashMap<Term, f64>,
}

impl SparseVector {
    pub fn new() -> Self { Self::default() }

    pub fn insert(&mut self, term: Term, weight: f64) { self.weights.insert(term, weight); }

    pub fn get(&self, term: &str) -> Option<f64> { self.weights.get(term).copied() }

    pub fn contains(&self, term: &str) -> bool { self.weights.contains_key(term) }

    pub fn len(&self) -> usize { self.weights.len() }

    pub fn is_empty(&self) -> bool { self.weights.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.weights.iter().map(|(t, w)| (t.as_str(), *w))
    }

    pub fn terms(&self) -> impl Iterator<Item = &str> { self.weights.keys().map(String::as_str) }

    /// Euclidean norm over every term of the vector.
    /// Squares are summed in ascending order so the value does not depend on map iteration order.
    pub fn norm(&self) -> f64 {
        let mut squares: Vec<f64> = self.weights.values().map(|w| w * w).collect();
        squares.sort_by(f64::total_cmp);
        squares.into_iter().sum::<f64>().sqrt()
    }
}

impl FromIterator<(Term, f64)> for SparseVector {
    fn from_iter<I: IntoIterator<Item = (Term, f64)>>(iter: I) -> Self {
        Self { weights: iter.into_iter().collect() }
    }
}

impl From<HashMap<Term, f64>> for SparseVector {
    fn from(weights: HashMap<Term, f64>) -> Self { Self { weights } }
}

#[derive(Debug, Clone)]
pub struct IndexedDocument {
    pub id: DocId,
    pub vector: SparseVector,
    /// Norm of `vector`, computed once at load.
    pub norm: f64,
}

/// Precomputed document vectors, IDF table and inverted index. Read-only once built.
#[derive(Debug, Default)]
pub struct VectorSpace {
    documents: Vec<IndexedDocument>, // sorted by id
    positions: HashMap<DocId, usize>,
    idf: IdfTable,
    inverted_index: InvertedIndex,
}

impl VectorSpace {
    pub fn new(vectors: HashMap<DocId, SparseVector>, idf: IdfTable, inverted_index: InvertedIndex) -> Self {
        let mut documents: Vec<IndexedDocument> = vectors
            .into_iter()
            .map(|(id, vector)| {
                let norm = vector.norm();
                IndexedDocument { id, vector, norm }
            })
            .collect();
        documents.sort_by(|a, b| a.id.cmp(&b.id));
        let positions = documents.iter().enumerate().map(|(i, d)| (d.id.clone(), i)).collect();
        Self { documents, positions, idf, inverted_index }
    }

    /// All documents, in ascending identifier order.
    pub fn documents(&self) -> &[IndexedDocument] { &self.documents }

    pub fn document(&self, id: &str) -> Option<&IndexedDocument> {
        self.positions.get(id).map(|&i| &self.documents[i])
    }

    pub fn idf(&self) -> &IdfTable { &self.idf }

    pub fn inverted_index(&self) -> &InvertedIndex { &self.inverted_index }

    pub fn num_documents(&self) -> usize { self.documents.len() }

    /// Number of terms in the inverted index.
    pub fn num_terms(&self) -> usize { self.inverted_index.len() }
}
