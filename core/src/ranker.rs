//! Cosine-similarity ranking of documents against a query vector.
//!
//! Ordering is descending score, then ascending document identifier.

use crate::{DocId, SparseVector, VectorSpace};
use std::cmp::Ordering;
use std::collections::HashSet;

pub const DEFAULT_TOP_K: usize = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScoringMode {
    /// Score every document of the corpus.
    #[default]
    FullScan,
    /// Score only documents the inverted index lists under a query term, then
    /// fill the remaining slots with zero-score documents in identifier order.
    IndexPruned,
}

/// Dot product over the shared terms, or `None` when the vectors share none.
/// Products are summed in term order so the result does not depend on argument order.
fn shared_dot(a: &SparseVector, b: &SparseVector) -> Option<f64> {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let mut products: Vec<(&str, f64)> = small
        .iter()
        .filter_map(|(term, w)| large.get(term).map(|v| (term, w * v)))
        .collect();
    if products.is_empty() {
        return None;
    }
    products.sort_by(|x, y| x.0.cmp(y.0));
    Some(products.into_iter().map(|(_, p)| p).sum())
}

fn cosine_with_norms(a: &SparseVector, a_norm: f64, b: &SparseVector, b_norm: f64) -> f64 {
    let Some(dot) = shared_dot(a, b) else { return 0.0 };
    if a_norm == 0.0 || b_norm == 0.0 {
        return 0.0;
    }
    dot / (a_norm * b_norm)
}

/// Cosine similarity. Norms cover the full vectors, not just the shared terms.
pub fn cosine_similarity(a: &SparseVector, b: &SparseVector) -> f64 {
    cosine_with_norms(a, a.norm(), b, b.norm())
}

fn by_score_then_id(a: &(&str, f64), b: &(&str, f64)) -> Ordering {
    b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0))
}

fn into_owned(scored: Vec<(&str, f64)>) -> Vec<(DocId, f64)> {
    scored.into_iter().map(|(id, score)| (id.to_string(), score)).collect()
}

/// Score every document and keep the best `top_k`.
pub fn rank(query: &SparseVector, space: &VectorSpace, top_k: usize) -> Vec<(DocId, f64)> {
    if query.is_empty() {
        return Vec::new();
    }
    let q_norm = query.norm();
    let mut scored: Vec<(&str, f64)> = space
        .documents()
        .iter()
        .map(|d| (d.id.as_str(), cosine_with_norms(query, q_norm, &d.vector, d.norm)))
        .collect();
    scored.sort_by(by_score_then_id);
    scored.truncate(top_k);
    into_owned(scored)
}

/// Same output as [`rank`] on a model whose inverted index agrees with its
/// document vectors, without scoring documents that share no query term.
pub fn rank_pruned(query: &SparseVector, space: &VectorSpace, top_k: usize) -> Vec<(DocId, f64)> {
    if query.is_empty() || top_k == 0 {
        return Vec::new();
    }
    let q_norm = query.norm();
    let mut candidates: HashSet<&str> = HashSet::new();
    for term in query.terms() {
        if let Some(ids) = space.inverted_index().get(term) {
            candidates.extend(ids.iter().map(String::as_str));
        }
    }
    let mut scored: Vec<(&str, f64)> = candidates
        .into_iter()
        .filter_map(|id| space.document(id))
        .map(|d| (d.id.as_str(), cosine_with_norms(query, q_norm, &d.vector, d.norm)))
        .filter(|(_, score)| *score > 0.0)
        .collect();
    scored.sort_by(by_score_then_id);
    scored.truncate(top_k);

    if scored.len() < top_k {
        let positive: HashSet<&str> = scored.iter().map(|(id, _)| *id).collect();
        let padding = space
            .documents()
            .iter()
            .map(|d| d.id.as_str())
            .filter(|id| !positive.contains(id))
            .take(top_k - scored.len())
            .map(|id| (id, 0.0))
            .collect::<Vec<_>>();
        scored.extend(padding);
    }
    into_owned(scored)
}

pub fn rank_with(mode: ScoringMode, query: &SparseVector, space: &VectorSpace, top_k: usize) -> Vec<(DocId, f64)> {
    match mode {
        ScoringMode::FullScan => rank(query, space, top_k),
        ScoringMode::IndexPruned => rank_pruned(query, space, top_k),
    }
}
